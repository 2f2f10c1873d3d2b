//! "Last event" records: the most recent event of a kind plus the time since it.

use chrono::{DateTime, Utc};
use shared::{LastDiaper, LastFeeding, LastSleep};

use crate::domain::error::AnalyticsError;
use crate::domain::models::events::minutes;
use crate::domain::models::{DiaperChange, Feeding, Sleep};
use crate::domain::time_format::{format_clock, format_time_since};

/// Time elapsed between an event's terminal timestamp and now
#[derive(Debug, Clone, PartialEq)]
pub struct Elapsed {
    pub minutes: f64,
    pub hours: f64,
    pub formatted: String,
    pub clock: String,
}

impl Elapsed {
    pub fn between(since: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes = minutes(now - since);
        let hours = minutes / 60.0;
        Self {
            minutes,
            hours,
            formatted: format_time_since(hours),
            clock: format_clock(minutes),
        }
    }
}

pub fn latest_feeding(feedings: &[Feeding]) -> Option<&Feeding> {
    feedings.iter().max_by_key(|f| f.end)
}

pub fn latest_sleep(sleeps: &[Sleep]) -> Option<&Sleep> {
    sleeps.iter().max_by_key(|s| s.end)
}

pub fn latest_diaper_change(changes: &[DiaperChange]) -> Option<&DiaperChange> {
    changes.iter().max_by_key(|c| c.time)
}

pub fn last_feeding_info(feeding: &Feeding, now: DateTime<Utc>) -> LastFeeding {
    let elapsed = Elapsed::between(feeding.end, now);
    LastFeeding {
        end_time: feeding.end,
        time_since_minutes: elapsed.minutes,
        time_since_hours: elapsed.hours,
        time_since_formatted: elapsed.formatted,
        time_since_clock: elapsed.clock,
        feeding_type: feeding.feeding_type,
        amount: feeding.amount,
    }
}

pub fn last_sleep_info(sleep: &Sleep, now: DateTime<Utc>) -> Result<LastSleep, AnalyticsError> {
    let duration_minutes = minutes(sleep.duration()?);
    let elapsed = Elapsed::between(sleep.end, now);
    Ok(LastSleep {
        end_time: sleep.end,
        time_since_minutes: elapsed.minutes,
        time_since_hours: elapsed.hours,
        time_since_formatted: elapsed.formatted,
        time_since_clock: elapsed.clock,
        was_nap: sleep.nap,
        duration_minutes,
    })
}

pub fn last_diaper_info(change: &DiaperChange, now: DateTime<Utc>) -> LastDiaper {
    let elapsed = Elapsed::between(change.time, now);
    LastDiaper {
        time: change.time,
        time_since_minutes: elapsed.minutes,
        time_since_hours: elapsed.hours,
        time_since_formatted: elapsed.formatted,
        time_since_clock: elapsed.clock,
        was_wet: change.wet,
        was_solid: change.solid,
    }
}
