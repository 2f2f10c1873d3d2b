//! # Domain Module
//!
//! The analytics core: read-only calculations over a child's event log.
//!
//! The pure calculators take events plus an explicit `now` and never touch
//! storage:
//!
//! - [`stats`]: trailing-window feeding, sleep and diaper statistics
//! - [`last_event`]: most recent event of each kind and the time since it
//! - [`feeding_prediction`]: next feeding from the average interval
//! - [`wake_window`] and [`sleep_prediction`]: learned wake windows and the
//!   next sleep
//! - [`display_status`]: the live sleep and feeding cards
//! - [`medication_schedule`]: the next medication dose due today
//! - [`daily_summary`]: per-day totals
//! - [`time_format`]: Hebrew elapsed-time phrases
//!
//! [`analytics_service::AnalyticsService`] wires them to an
//! [`EventStore`](crate::storage::EventStore) and a [`Clock`](clock::Clock).

pub mod analytics_service;
pub mod clock;
pub mod daily_summary;
pub mod display_status;
pub mod error;
pub mod feeding_prediction;
pub mod last_event;
pub mod medication_schedule;
pub mod models;
pub mod sleep_prediction;
pub mod stats;
pub mod time_format;
pub mod wake_window;

pub use analytics_service::AnalyticsService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::AnalyticsError;
