//! Next-sleep estimate: how long until the child is likely to be tired.

use chrono::{DateTime, Utc};
use shared::{LastSleep, SleepPrediction, SleepStatus};

use crate::domain::feeding_prediction::minutes_to_duration;
use crate::domain::stats::round1;
use crate::domain::time_format::format_clock;
use crate::domain::wake_window::WakeWindowEstimate;

/// Beyond this many minutes past the wake window the message reports the delay
const SIGNIFICANTLY_OVERTIRED_MINUTES: f64 = -15.0;
const GETTING_TIRED_MINUTES: f64 = 15.0;
const SOON_MINUTES: f64 = 30.0;

pub fn classify_sleep(minutes_until_tired: f64) -> SleepStatus {
    if minutes_until_tired < 0.0 {
        SleepStatus::Overtired
    } else if minutes_until_tired < GETTING_TIRED_MINUTES {
        SleepStatus::GettingTired
    } else if minutes_until_tired < SOON_MINUTES {
        SleepStatus::Soon
    } else {
        SleepStatus::Awake
    }
}

pub fn sleep_message(minutes_until_tired: f64) -> String {
    match classify_sleep(minutes_until_tired) {
        SleepStatus::Overtired if minutes_until_tired < SIGNIFICANTLY_OVERTIRED_MINUTES => format!(
            "התינוק כנראה עייף! עבר הזמן ב-{} דקות",
            minutes_until_tired.abs() as i64
        ),
        SleepStatus::Overtired => "התינוק כנראה עייף - הגיע הזמן לישון".to_string(),
        SleepStatus::GettingTired => format!(
            "התינוק מתחיל להתעייף - בעוד ~{} דקות",
            minutes_until_tired as i64
        ),
        SleepStatus::Soon => format!("בקרוב יתעייף - בעוד ~{} דקות", minutes_until_tired as i64),
        SleepStatus::Awake if minutes_until_tired >= 60.0 => {
            format!("עוד {} שעות עד שיתעייף", format_clock(minutes_until_tired))
        }
        SleepStatus::Awake => format!("עוד {} דקות עד שיתעייף", minutes_until_tired as i64),
    }
}

/// Predict when the child will next be tired, `None` without any recorded sleep
pub fn predict_next_sleep(
    last_sleep: Option<&LastSleep>,
    estimate: WakeWindowEstimate,
    age_months: Option<f64>,
    now: DateTime<Utc>,
) -> Option<SleepPrediction> {
    let last_sleep = last_sleep?;

    let minutes_awake = last_sleep.time_since_minutes;
    let minutes_until_tired = estimate.predicted_minutes - minutes_awake;

    Some(SleepPrediction {
        status: classify_sleep(minutes_until_tired),
        message: sleep_message(minutes_until_tired),
        minutes_awake: round1(minutes_awake),
        minutes_until_tired: round1(minutes_until_tired),
        predicted_wake_window_minutes: round1(estimate.predicted_minutes),
        estimated_sleep_time: now + minutes_to_duration(minutes_until_tired.max(0.0)),
        confidence: estimate.confidence,
        data_source: estimate.data_source,
        age_months: age_months.map(round1),
        age_based_range: estimate.age_based_range,
        wake_window_stats: estimate.summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::{Confidence, DataSource, WakeWindowRange};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn last_sleep(minutes_ago: f64) -> LastSleep {
        LastSleep {
            end_time: now() - minutes_to_duration(minutes_ago),
            time_since_minutes: minutes_ago,
            time_since_hours: minutes_ago / 60.0,
            time_since_formatted: String::new(),
            time_since_clock: String::new(),
            was_nap: true,
            duration_minutes: 60.0,
        }
    }

    fn estimate(predicted_minutes: f64) -> WakeWindowEstimate {
        WakeWindowEstimate {
            predicted_minutes,
            confidence: Confidence::Low,
            data_source: DataSource::AgeBased,
            age_based_range: WakeWindowRange { min_minutes: 60.0, max_minutes: 120.0 },
            summary: None,
        }
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify_sleep(-15.1), SleepStatus::Overtired);
        assert_eq!(classify_sleep(-15.0), SleepStatus::Overtired);
        assert_eq!(classify_sleep(-0.1), SleepStatus::Overtired);
        assert_eq!(classify_sleep(0.0), SleepStatus::GettingTired);
        assert_eq!(classify_sleep(14.9), SleepStatus::GettingTired);
        assert_eq!(classify_sleep(15.0), SleepStatus::Soon);
        assert_eq!(classify_sleep(29.9), SleepStatus::Soon);
        assert_eq!(classify_sleep(30.0), SleepStatus::Awake);
    }

    #[test]
    fn test_overtired_messages() {
        assert_eq!(sleep_message(-40.0), "התינוק כנראה עייף! עבר הזמן ב-40 דקות");
        assert_eq!(sleep_message(-15.0), "התינוק כנראה עייף - הגיע הזמן לישון");
        assert_eq!(sleep_message(-3.0), "התינוק כנראה עייף - הגיע הזמן לישון");
    }

    #[test]
    fn test_awake_message_formats_hours() {
        assert_eq!(sleep_message(45.0), "עוד 45 דקות עד שיתעייף");
        assert_eq!(sleep_message(95.0), "עוד 1:35 שעות עד שיתעייף");
    }

    #[test]
    fn test_requires_last_sleep() {
        assert!(predict_next_sleep(None, estimate(90.0), None, now()).is_none());
    }

    #[test]
    fn test_prediction_fields() {
        let prediction = predict_next_sleep(Some(&last_sleep(50.0)), estimate(90.0), Some(2.96), now()).unwrap();

        assert_eq!(prediction.status, SleepStatus::Awake);
        assert_eq!(prediction.minutes_awake, 50.0);
        assert_eq!(prediction.minutes_until_tired, 40.0);
        assert_eq!(prediction.predicted_wake_window_minutes, 90.0);
        assert_eq!(prediction.estimated_sleep_time, now() + Duration::minutes(40));
        assert_eq!(prediction.age_months, Some(3.0));
        assert_eq!(prediction.data_source, DataSource::AgeBased);
    }

    #[test]
    fn test_overdue_sleep_time_is_not_in_the_past() {
        let prediction = predict_next_sleep(Some(&last_sleep(150.0)), estimate(90.0), None, now()).unwrap();

        assert_eq!(prediction.status, SleepStatus::Overtired);
        assert_eq!(prediction.minutes_until_tired, -60.0);
        assert_eq!(prediction.estimated_sleep_time, now());
    }
}
