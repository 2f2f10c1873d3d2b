//! Windowed statistics for feedings, sleep and diaper changes.
//!
//! Each function looks at events whose start (or time, for diapers) falls inside
//! the trailing `days` window ending at `now`. Empty windows produce the zeroed
//! record from `shared`; a window of zero days never divides by zero.

use chrono::{DateTime, Duration, Utc};
use shared::{DiaperStats, FeedingStats, SleepStats};

use crate::domain::error::AnalyticsError;
use crate::domain::models::events::minutes;
use crate::domain::models::{DiaperChange, Feeding, Sleep};

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Earliest instant of a `days`-long window ending at `now`.
///
/// A window reaching past the earliest representable instant starts there.
pub fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Feedings in the window, sorted by start
pub fn feedings_in_window(feedings: &[Feeding], now: DateTime<Utc>, days: i64) -> Vec<&Feeding> {
    let cutoff = window_start(now, days);
    let mut selected: Vec<&Feeding> = feedings.iter().filter(|f| f.start >= cutoff).collect();
    selected.sort_by_key(|f| f.start);
    selected
}

/// Sleeps in the window, sorted by start
pub fn sleeps_in_window(sleeps: &[Sleep], now: DateTime<Utc>, days: i64) -> Vec<&Sleep> {
    let cutoff = window_start(now, days);
    let mut selected: Vec<&Sleep> = sleeps.iter().filter(|s| s.start >= cutoff).collect();
    selected.sort_by_key(|s| s.start);
    selected
}

pub fn feeding_stats(
    feedings: &[Feeding],
    now: DateTime<Utc>,
    days: i64,
) -> Result<FeedingStats, AnalyticsError> {
    let window = feedings_in_window(feedings, now, days);
    if window.is_empty() {
        return Ok(FeedingStats::empty(days));
    }

    let mut stats = FeedingStats::empty(days);
    let mut durations = Vec::with_capacity(window.len());

    for feeding in &window {
        durations.push(minutes(feeding.duration()?));
        stats.total_amount += feeding.amount.unwrap_or(0.0);
        *stats.by_type.entry(feeding.feeding_type).or_insert(0) += 1;
    }

    // Gap from the end of one feeding to the start of the next
    let intervals: Vec<f64> = window
        .windows(2)
        .map(|pair| minutes(pair[1].start - pair[0].end))
        .collect();

    stats.count = window.len() as u32;
    stats.average_duration_minutes = mean(&durations);
    stats.average_interval_minutes = round1(mean(&intervals));
    Ok(stats)
}

pub fn sleep_stats(
    sleeps: &[Sleep],
    now: DateTime<Utc>,
    days: i64,
) -> Result<SleepStats, AnalyticsError> {
    let window = sleeps_in_window(sleeps, now, days);
    if window.is_empty() {
        return Ok(SleepStats::empty(days));
    }

    let mut total_minutes = 0.0;
    let mut nap_durations = Vec::new();
    let mut night_count = 0;

    for sleep in &window {
        let duration = minutes(sleep.duration()?);
        total_minutes += duration;
        if sleep.nap {
            nap_durations.push(duration);
        } else {
            night_count += 1;
        }
    }

    let total_hours = total_minutes / 60.0;
    let per_day = if days > 0 { total_hours / days as f64 } else { 0.0 };

    Ok(SleepStats {
        count: window.len() as u32,
        total_sleep_hours: round1(total_hours),
        average_sleep_hours_per_day: round1(per_day),
        naps_count: nap_durations.len() as u32,
        night_sleep_count: night_count,
        average_nap_duration_minutes: round1(mean(&nap_durations)),
        period_days: days,
    })
}

pub fn diaper_stats(changes: &[DiaperChange], now: DateTime<Utc>, days: i64) -> DiaperStats {
    let cutoff = window_start(now, days);
    let window: Vec<&DiaperChange> = changes.iter().filter(|c| c.time >= cutoff).collect();
    if window.is_empty() {
        return DiaperStats::empty(days);
    }

    let count = window.len() as u32;
    let per_day = if days > 0 { count as f64 / days as f64 } else { 0.0 };

    DiaperStats {
        count,
        wet_count: window.iter().filter(|c| c.wet).count() as u32,
        solid_count: window.iter().filter(|c| c.solid).count() as u32,
        average_per_day: round1(per_day),
        period_days: days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::FeedingType;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn feeding(id: &str, start_hours_ago: i64, minutes_long: i64, feeding_type: FeedingType, amount: Option<f64>) -> Feeding {
        let start = now() - Duration::hours(start_hours_ago);
        Feeding {
            id: id.to_string(),
            child_id: "c".to_string(),
            start,
            end: start + Duration::minutes(minutes_long),
            feeding_type,
            amount,
        }
    }

    fn sleep(id: &str, start_hours_ago: i64, minutes_long: i64, nap: bool) -> Sleep {
        let start = now() - Duration::hours(start_hours_ago);
        Sleep {
            id: id.to_string(),
            child_id: "c".to_string(),
            start,
            end: start + Duration::minutes(minutes_long),
            nap,
        }
    }

    #[test]
    fn test_feeding_stats_empty_window() {
        let old = feeding("old", 24 * 10, 20, FeedingType::Formula, Some(90.0));
        let stats = feeding_stats(&[old], now(), 7).unwrap();
        assert_eq!(stats, FeedingStats::empty(7));
    }

    #[test]
    fn test_feeding_stats_aggregates() {
        let feedings = vec![
            feeding("f1", 9, 20, FeedingType::Formula, Some(120.0)),
            feeding("f2", 6, 30, FeedingType::BreastMilk, None),
            feeding("f3", 3, 10, FeedingType::Formula, Some(90.0)),
        ];
        let stats = feeding_stats(&feedings, now(), 7).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.average_duration_minutes, 20.0);
        assert_eq!(stats.total_amount, 210.0);
        // (180 - 20) and (180 - 30)
        assert_eq!(stats.average_interval_minutes, 155.0);
        assert_eq!(stats.by_type.get(&FeedingType::Formula), Some(&2));
        assert_eq!(stats.by_type.get(&FeedingType::BreastMilk), Some(&1));
        assert_eq!(stats.period_days, 7);
    }

    #[test]
    fn test_average_interval_ignores_arrival_order() {
        let mut feedings = vec![
            feeding("f1", 10, 15, FeedingType::Formula, None),
            feeding("f2", 7, 25, FeedingType::Formula, None),
            feeding("f3", 3, 5, FeedingType::Formula, None),
        ];
        let ordered = feeding_stats(&feedings, now(), 7).unwrap();
        feedings.reverse();
        let shuffled = feeding_stats(&feedings, now(), 7).unwrap();

        // (180 - 15) and (240 - 25)
        assert_eq!(ordered.average_interval_minutes, 190.0);
        assert_eq!(shuffled.average_interval_minutes, ordered.average_interval_minutes);
    }

    #[test]
    fn test_single_feeding_has_zero_interval() {
        let stats = feeding_stats(&[feeding("f1", 2, 15, FeedingType::Formula, None)], now(), 7).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.average_interval_minutes, 0.0);
    }

    #[test]
    fn test_corrupt_feeding_propagates() {
        let mut bad = feeding("bad", 2, 15, FeedingType::Formula, None);
        bad.end = bad.start - Duration::minutes(1);
        assert!(feeding_stats(&[bad], now(), 7).is_err());
    }

    #[test]
    fn test_sleep_stats_split_by_nap() {
        let sleeps = vec![
            sleep("night", 20, 600, false),
            sleep("nap1", 8, 90, true),
            sleep("nap2", 4, 30, true),
        ];
        let stats = sleep_stats(&sleeps, now(), 7).unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.naps_count, 2);
        assert_eq!(stats.night_sleep_count, 1);
        assert_eq!(stats.total_sleep_hours, 12.0);
        // divided by the window, not by days with data
        assert_eq!(stats.average_sleep_hours_per_day, round1(12.0 / 7.0));
        assert_eq!(stats.average_nap_duration_minutes, 60.0);
    }

    #[test]
    fn test_sleep_stats_zero_days_does_not_divide() {
        let starts_now = Sleep {
            id: "s".to_string(),
            child_id: "c".to_string(),
            start: now(),
            end: now() + Duration::minutes(30),
            nap: true,
        };
        let stats = sleep_stats(&[starts_now], now(), 0).unwrap();

        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_sleep_hours, 0.5);
        assert_eq!(stats.average_sleep_hours_per_day, 0.0);
    }

    #[test]
    fn test_huge_window_covers_everything() {
        assert_eq!(window_start(now(), 200_000_000), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now(), i64::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(window_start(now(), 7), now() - Duration::days(7));

        let stats = sleep_stats(&[sleep("s", 1, 30, true)], now(), 200_000_000).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.period_days, 200_000_000);
    }

    #[test]
    fn test_diaper_stats() {
        let change = |id: &str, hours_ago: i64, wet: bool, solid: bool| DiaperChange {
            id: id.to_string(),
            child_id: "c".to_string(),
            time: now() - Duration::hours(hours_ago),
            wet,
            solid,
        };
        let changes = vec![
            change("d1", 1, true, false),
            change("d2", 5, true, true),
            change("d3", 30, false, true),
            change("d4", 24 * 8, true, false),
        ];
        let stats = diaper_stats(&changes, now(), 7);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.wet_count, 2);
        assert_eq!(stats.solid_count, 2);
        assert_eq!(stats.average_per_day, 0.4);
    }

    #[test]
    fn test_diaper_stats_empty() {
        assert_eq!(diaper_stats(&[], now(), 7), DiaperStats::empty(7));
    }
}
