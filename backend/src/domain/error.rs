//! Validation failures raised by the analytics core.
//!
//! Missing data is never an error here: predictions that cannot be made return
//! `None`, and implausible samples are filtered out. These variants cover bad
//! input from the caller and corrupt records in the store.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Child not found: {0}")]
    ChildNotFound(String),
    #[error("Invalid child id '{0}'")]
    InvalidChildId(String),
    #[error("Lookback window must be a positive number of days, got {0}")]
    InvalidWindow(i64),
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{kind} {id} ends before it starts ({start} > {end})")]
    InvalidInterval {
        kind: &'static str,
        id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
