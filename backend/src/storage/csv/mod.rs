//! CSV/YAML directory backend.
//!
//! ```text
//! <data_directory>/
//!   <child-id>/
//!     child.yaml
//!     feedings.csv          id,start,end,feeding_type,amount
//!     sleep.csv             id,start,end,nap
//!     diaper_changes.csv    id,time,wet,solid
//!     medications.csv       id,name,medication_type,dosage,frequency,schedule_times,start_date,end_date,active
//!     medication_doses.csv  id,medication_id,time,given,skipped_reason
//!     timers.csv            id,name,start,active
//! ```
//!
//! Timestamps are RFC 3339. A missing file reads as no records.

pub mod connection;
pub mod event_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use event_repository::CsvEventRepository;
