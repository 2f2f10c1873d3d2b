//! Timestamped care events read from the event store.
//!
//! Interval events (feedings, sleeps) must satisfy `start <= end`. The core never
//! repairs a record that violates this: `duration()` reports it as an
//! [`AnalyticsError::InvalidInterval`] and the error propagates to the caller.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use shared::FeedingType;

use crate::domain::error::AnalyticsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding {
    pub id: String,
    pub child_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub feeding_type: FeedingType,
    pub amount: Option<f64>,
}

impl Feeding {
    pub fn duration(&self) -> Result<Duration, AnalyticsError> {
        checked_duration("Feeding", &self.id, self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sleep {
    pub id: String,
    pub child_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Daytime nap as opposed to night sleep
    pub nap: bool,
}

impl Sleep {
    pub fn duration(&self) -> Result<Duration, AnalyticsError> {
        checked_duration("Sleep", &self.id, self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperChange {
    pub id: String,
    pub child_id: String,
    pub time: DateTime<Utc>,
    pub wet: bool,
    pub solid: bool,
}

fn checked_duration(
    kind: &'static str,
    id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Duration, AnalyticsError> {
    if end < start {
        return Err(AnalyticsError::InvalidInterval {
            kind,
            id: id.to_string(),
            start,
            end,
        });
    }
    Ok(end - start)
}

/// Fractional minutes in a duration
pub fn minutes(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sleep_duration() {
        let sleep = Sleep {
            id: "s1".to_string(),
            child_id: "c".to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 1, 14, 30, 0).unwrap(),
            nap: true,
        };
        assert_eq!(minutes(sleep.duration().unwrap()), 90.0);
    }

    #[test]
    fn test_feeding_ending_before_start_is_rejected() {
        let feeding = Feeding {
            id: "f1".to_string(),
            child_id: "c".to_string(),
            start: Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            feeding_type: FeedingType::Formula,
            amount: None,
        };
        let err = feeding.duration().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInterval { kind: "Feeding", .. }));
    }
}
