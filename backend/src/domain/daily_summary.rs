//! Per-day activity totals.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use shared::{DailyDiaperSummary, DailyFeedingSummary, DailySleepSummary, DailySummary};

use crate::domain::clock::local_day_bounds;
use crate::domain::error::AnalyticsError;
use crate::domain::models::events::minutes;
use crate::domain::models::{DiaperChange, Feeding, Sleep};
use crate::domain::stats::round1;

/// Parse a `YYYY-MM-DD` summary date
pub fn parse_summary_date(text: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| AnalyticsError::InvalidDate(text.to_string()))
}

fn within(instant: DateTime<Utc>, bounds: (DateTime<Utc>, DateTime<Utc>)) -> bool {
    instant >= bounds.0 && instant < bounds.1
}

/// Totals for events that start on the local calendar day `date`
pub fn daily_summary(
    date: NaiveDate,
    tz: &Tz,
    feedings: &[Feeding],
    sleeps: &[Sleep],
    diapers: &[DiaperChange],
) -> Result<DailySummary, AnalyticsError> {
    let bounds = local_day_bounds(date, tz);

    let mut feeding_summary = DailyFeedingSummary { count: 0, total_duration_minutes: 0.0, total_amount: 0.0 };
    for feeding in feedings.iter().filter(|f| within(f.start, bounds)) {
        feeding_summary.count += 1;
        feeding_summary.total_duration_minutes += minutes(feeding.duration()?);
        feeding_summary.total_amount += feeding.amount.unwrap_or(0.0);
    }
    feeding_summary.total_duration_minutes = round1(feeding_summary.total_duration_minutes);

    let mut sleep_minutes = 0.0;
    let mut sleep_summary = DailySleepSummary { count: 0, total_duration_minutes: 0.0, total_duration_hours: 0.0, naps: 0 };
    for sleep in sleeps.iter().filter(|s| within(s.start, bounds)) {
        sleep_summary.count += 1;
        sleep_minutes += minutes(sleep.duration()?);
        if sleep.nap {
            sleep_summary.naps += 1;
        }
    }
    sleep_summary.total_duration_minutes = round1(sleep_minutes);
    sleep_summary.total_duration_hours = round1(sleep_minutes / 60.0);

    let mut diaper_summary = DailyDiaperSummary { count: 0, wet: 0, solid: 0 };
    for change in diapers.iter().filter(|d| within(d.time, bounds)) {
        diaper_summary.count += 1;
        diaper_summary.wet += change.wet as u32;
        diaper_summary.solid += change.solid as u32;
    }

    Ok(DailySummary {
        date,
        feedings: feeding_summary,
        sleep: sleep_summary,
        diapers: diaper_summary,
    })
}
