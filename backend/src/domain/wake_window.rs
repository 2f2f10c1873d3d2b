//! Wake-window learning.
//!
//! The learner turns the child's recent sleep history into a wake-window
//! estimate:
//!
//! 1. An age-based prior range comes from a fixed table of age bands.
//! 2. Every consecutive pair of sleeps in the lookback window yields one sample
//!    (`next.start - previous.end`). Samples outside 5..=720 minutes are noise or
//!    logging gaps and are dropped.
//! 3. Samples are averaged with weight `0.9^days_ago × time_of_day_weight`, so
//!    recent wake periods that began near the current hour count most.
//! 4. The learned value is blended with the prior midpoint. How much the
//!    history is trusted depends on how many samples there are, and the result
//!    is clamped around the prior range.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::debug;
use shared::{Confidence, DataSource, WakeWindowRange, WakeWindowSummary};

use crate::domain::clock::{local_date, local_hour};
use crate::domain::error::AnalyticsError;
use crate::domain::models::events::minutes;
use crate::domain::models::Sleep;
use crate::domain::stats::sleeps_in_window;

pub const MIN_WAKE_MINUTES: f64 = 5.0;
pub const MAX_WAKE_MINUTES: f64 = 720.0;
pub const RECENCY_DECAY: f64 = 0.9;

/// Samples needed before the history dominates the prior
pub const LEARNED_MIN_SAMPLES: usize = 5;
/// Samples needed before the history is mixed in at all
pub const MIXED_MIN_SAMPLES: usize = 2;

/// Upper age bound (exclusive, months) and wake window range in minutes
const AGE_BANDS: &[(f64, f64, f64)] = &[
    (1.0, 35.0, 60.0),
    (2.0, 45.0, 75.0),
    (3.0, 60.0, 90.0),
    (4.0, 75.0, 120.0),
    (6.0, 90.0, 150.0),
    (9.0, 120.0, 180.0),
    (12.0, 150.0, 240.0),
    (18.0, 180.0, 300.0),
];
const OLDEST_BAND: (f64, f64) = (240.0, 360.0);
const UNKNOWN_AGE_RANGE: (f64, f64) = (60.0, 120.0);

fn range((min_minutes, max_minutes): (f64, f64)) -> WakeWindowRange {
    WakeWindowRange { min_minutes, max_minutes }
}

/// Prior wake window for a child of the given age.
///
/// The age is rounded to whole months before the band lookup, so a baby of
/// 90 days (2.96 months) uses the 3–4 month band.
pub fn age_based_wake_window(age_months: Option<f64>) -> WakeWindowRange {
    let Some(age) = age_months else {
        return range(UNKNOWN_AGE_RANGE);
    };
    let age = age.round();

    AGE_BANDS
        .iter()
        .find(|(below, _, _)| age < *below)
        .map(|(_, min, max)| range((*min, *max)))
        .unwrap_or_else(|| range(OLDEST_BAND))
}

/// One observed wake period between two sleeps
#[derive(Debug, Clone, PartialEq)]
pub struct WakeWindowSample {
    pub wake_minutes: f64,
    /// Local hour at which the child woke up
    pub hour_of_day: u32,
    /// Local date on which the child woke up
    pub date: NaiveDate,
    pub was_nap: bool,
    pub next_was_nap: bool,
    pub sleep_duration_minutes: f64,
}

pub fn is_plausible_wake_window(wake_minutes: f64) -> bool {
    (MIN_WAKE_MINUTES..=MAX_WAKE_MINUTES).contains(&wake_minutes)
}

/// `0.9^days_ago`; future-dated samples count as today
pub fn recency_weight(days_ago: i64) -> f64 {
    RECENCY_DECAY.powi(days_ago.max(0) as i32)
}

/// Affinity between the hour a sample began and the current hour, on a 24h circle
pub fn time_of_day_weight(sample_hour: u32, current_hour: u32) -> f64 {
    let diff = (sample_hour as i64 - current_hour as i64).abs() % 24;
    let distance = diff.min(24 - diff);

    if distance <= 2 {
        1.5
    } else if distance <= 4 {
        1.2
    } else {
        1.0
    }
}

/// Recency- and time-of-day-weighted mean of the samples, 0 when empty
pub fn weighted_wake_window(samples: &[WakeWindowSample], today: NaiveDate, current_hour: u32) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for sample in samples {
        let days_ago = (today - sample.date).num_days();
        let weight = recency_weight(days_ago) * time_of_day_weight(sample.hour_of_day, current_hour);
        weighted_sum += sample.wake_minutes * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

pub fn summarize_samples(samples: &[WakeWindowSample], weighted_average: f64) -> Option<WakeWindowSummary> {
    if samples.is_empty() {
        return None;
    }
    let values = samples.iter().map(|s| s.wake_minutes);

    Some(WakeWindowSummary {
        sample_size: samples.len(),
        average_minutes: values.clone().sum::<f64>() / samples.len() as f64,
        min_minutes: values.clone().fold(f64::INFINITY, f64::min),
        max_minutes: values.fold(f64::NEG_INFINITY, f64::max),
        weighted_average_minutes: weighted_average,
    })
}

/// Wake window chosen for a prediction
#[derive(Debug, Clone, PartialEq)]
pub struct WakeWindowEstimate {
    pub predicted_minutes: f64,
    pub confidence: Confidence,
    pub data_source: DataSource,
    pub age_based_range: WakeWindowRange,
    pub summary: Option<WakeWindowSummary>,
}

/// Mix the learned value with the prior midpoint according to sample count
pub fn blend_wake_window(
    sample_count: usize,
    learned_minutes: f64,
    prior: WakeWindowRange,
) -> (f64, Confidence, DataSource) {
    let midpoint = prior.midpoint();

    if sample_count >= LEARNED_MIN_SAMPLES {
        let blended = 0.7 * learned_minutes + 0.3 * midpoint;
        let clamped = blended.clamp(0.5 * prior.min_minutes, 1.5 * prior.max_minutes);
        (clamped, Confidence::High, DataSource::Learned)
    } else if sample_count >= MIXED_MIN_SAMPLES {
        let blended = 0.4 * learned_minutes + 0.6 * midpoint;
        let clamped = blended.clamp(0.7 * prior.min_minutes, 1.3 * prior.max_minutes);
        (clamped, Confidence::Medium, DataSource::Mixed)
    } else {
        (midpoint, Confidence::Low, DataSource::AgeBased)
    }
}

/// Learns a child's wake window from their sleep log
#[derive(Debug, Clone)]
pub struct WakeWindowLearner {
    timezone: Tz,
    lookback_days: i64,
}

impl WakeWindowLearner {
    pub fn new(timezone: Tz, lookback_days: i64) -> Self {
        Self { timezone, lookback_days }
    }

    /// Plausible wake windows between consecutive sleeps in the lookback window
    pub fn calculate_wake_windows(
        &self,
        sleeps: &[Sleep],
        now: DateTime<Utc>,
    ) -> Result<Vec<WakeWindowSample>, AnalyticsError> {
        let window = sleeps_in_window(sleeps, now, self.lookback_days);
        let mut samples = Vec::new();

        for pair in window.windows(2) {
            let (previous, next) = (pair[0], pair[1]);
            let sleep_duration_minutes = minutes(previous.duration()?);
            let wake_minutes = minutes(next.start - previous.end);

            if !is_plausible_wake_window(wake_minutes) {
                debug!(
                    "Dropping wake window of {:.1} minutes between sleeps {} and {}",
                    wake_minutes, previous.id, next.id
                );
                continue;
            }

            samples.push(WakeWindowSample {
                wake_minutes,
                hour_of_day: local_hour(previous.end, &self.timezone),
                date: local_date(previous.end, &self.timezone),
                was_nap: previous.nap,
                next_was_nap: next.nap,
                sleep_duration_minutes,
            });
        }

        Ok(samples)
    }

    /// Wake window to predict with, given the history and the child's age
    pub fn estimate(
        &self,
        sleeps: &[Sleep],
        now: DateTime<Utc>,
        age_months: Option<f64>,
    ) -> Result<WakeWindowEstimate, AnalyticsError> {
        let prior = age_based_wake_window(age_months);
        let samples = self.calculate_wake_windows(sleeps, now)?;

        let learned = weighted_wake_window(
            &samples,
            local_date(now, &self.timezone),
            local_hour(now, &self.timezone),
        );
        let (predicted_minutes, confidence, data_source) = blend_wake_window(samples.len(), learned, prior);

        debug!(
            "Wake window: {} samples, learned {:.1}, prior {:.0}-{:.0}, predicted {:.1} ({:?})",
            samples.len(),
            learned,
            prior.min_minutes,
            prior.max_minutes,
            predicted_minutes,
            data_source
        );

        Ok(WakeWindowEstimate {
            predicted_minutes,
            confidence,
            data_source,
            age_based_range: prior,
            summary: summarize_samples(&samples, learned),
        })
    }
}
