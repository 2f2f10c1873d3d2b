//! Next-feeding estimate from the average gap between recent feedings.

use chrono::{DateTime, Duration, Utc};
use shared::{Confidence, FeedingPrediction, FeedingStats, FeedingStatus, LastFeeding};

use crate::domain::stats::round1;

/// Feedings needed in the window before any prediction is made
pub const MIN_FEEDINGS_FOR_PREDICTION: u32 = 2;
/// Feedings in the window for a high-confidence prediction
pub const HIGH_CONFIDENCE_FEEDINGS: u32 = 10;

const SOON_MINUTES: f64 = 30.0;
const UPCOMING_MINUTES: f64 = 60.0;

pub fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

pub fn classify_feeding(minutes_until_next: f64) -> FeedingStatus {
    if minutes_until_next < 0.0 {
        FeedingStatus::Overdue
    } else if minutes_until_next < SOON_MINUTES {
        FeedingStatus::Soon
    } else if minutes_until_next < UPCOMING_MINUTES {
        FeedingStatus::Upcoming
    } else {
        FeedingStatus::Later
    }
}

fn feeding_message(status: FeedingStatus, minutes_until_next: f64) -> String {
    match status {
        FeedingStatus::Overdue => format!(
            "עבר הזמן! התינוק כנראה רעב (איחור של {} דקות)",
            minutes_until_next.abs() as i64
        ),
        FeedingStatus::Soon => format!("בקרוב! בעוד ~{} דקות", minutes_until_next as i64),
        FeedingStatus::Upcoming => format!("בעוד ~{} דקות", minutes_until_next as i64),
        FeedingStatus::Later => format!("בעוד ~{:.1} שעות", minutes_until_next / 60.0),
    }
}

/// Predict the next feeding, or `None` without a last feeding or with fewer
/// than two feedings in the stats window
pub fn predict_next_feeding(
    stats: &FeedingStats,
    last_feeding: Option<&LastFeeding>,
    now: DateTime<Utc>,
) -> Option<FeedingPrediction> {
    let last_feeding = last_feeding?;
    if stats.count < MIN_FEEDINGS_FOR_PREDICTION {
        return None;
    }

    let minutes_until_next = stats.average_interval_minutes - last_feeding.time_since_minutes;
    let status = classify_feeding(minutes_until_next);

    let confidence = if stats.count >= HIGH_CONFIDENCE_FEEDINGS {
        Confidence::High
    } else {
        Confidence::Medium
    };

    Some(FeedingPrediction {
        status,
        message: feeding_message(status, minutes_until_next),
        minutes_until_next: round1(minutes_until_next),
        minutes_overdue: (status == FeedingStatus::Overdue).then(|| round1(minutes_until_next.abs())),
        estimated_time: now + minutes_to_duration(minutes_until_next),
        average_interval_minutes: stats.average_interval_minutes,
        confidence,
    })
}
