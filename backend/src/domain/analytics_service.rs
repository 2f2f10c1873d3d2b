//! Per-child analytics provider.
//!
//! `AnalyticsService` answers every query of the engine for one child at a
//! time. Each public call reads the clock once and passes that instant to all
//! the calculations it runs, so the pieces of a [`StatusSnapshot`] agree with
//! each other.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use shared::{
    DailySummary, DiaperStats, FeedingDisplayStatus, FeedingPrediction, FeedingStats, LastDiaper, LastFeeding,
    LastSleep, MedicationDue, PeriodStats, SleepDisplayStatus, SleepPrediction, SleepStats, StatusSnapshot,
};
use std::sync::Arc;

use crate::config::AnalyticsSettings;
use crate::domain::clock::{local_date, local_day_bounds, Clock};
use crate::domain::error::AnalyticsError;
use crate::domain::models::Child;
use crate::domain::stats::window_start;
use crate::domain::wake_window::WakeWindowLearner;
use crate::domain::{daily_summary, display_status, feeding_prediction, last_event, medication_schedule, sleep_prediction, stats};
use crate::storage::{EventStore, TimerStore};

/// Open upper bound for "everything since" queries
const UNBOUNDED: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

fn check_window(days: i64) -> Result<(), AnalyticsError> {
    if days <= 0 {
        return Err(AnalyticsError::InvalidWindow(days));
    }
    Ok(())
}

/// Read-only analytics over one event store
#[derive(Clone)]
pub struct AnalyticsService {
    events: Arc<dyn EventStore>,
    timers: Arc<dyn TimerStore>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    settings: AnalyticsSettings,
}

impl AnalyticsService {
    pub fn new(
        events: Arc<dyn EventStore>,
        timers: Arc<dyn TimerStore>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        settings: AnalyticsSettings,
    ) -> Self {
        Self {
            events,
            timers,
            clock,
            timezone,
            settings,
        }
    }

    async fn require_child(&self, child_id: &str) -> Result<Child> {
        match self.events.get_child(child_id).await? {
            Some(child) => Ok(child),
            None => Err(AnalyticsError::ChildNotFound(child_id.to_string()).into()),
        }
    }

    pub async fn feeding_stats(&self, child_id: &str, days: i64) -> Result<FeedingStats> {
        info!("Computing {}-day feeding stats for child {}", days, child_id);
        check_window(days)?;
        self.require_child(child_id).await?;
        self.feeding_stats_at(child_id, days, self.clock.now()).await
    }

    pub async fn sleep_stats(&self, child_id: &str, days: i64) -> Result<SleepStats> {
        info!("Computing {}-day sleep stats for child {}", days, child_id);
        check_window(days)?;
        self.require_child(child_id).await?;
        self.sleep_stats_at(child_id, days, self.clock.now()).await
    }

    pub async fn diaper_stats(&self, child_id: &str, days: i64) -> Result<DiaperStats> {
        info!("Computing {}-day diaper stats for child {}", days, child_id);
        check_window(days)?;
        self.require_child(child_id).await?;
        self.diaper_stats_at(child_id, days, self.clock.now()).await
    }

    pub async fn last_feeding_info(&self, child_id: &str) -> Result<Option<LastFeeding>> {
        self.require_child(child_id).await?;
        self.last_feeding_at(child_id, self.clock.now()).await
    }

    pub async fn last_sleep_info(&self, child_id: &str) -> Result<Option<LastSleep>> {
        self.require_child(child_id).await?;
        self.last_sleep_at(child_id, self.clock.now()).await
    }

    pub async fn last_diaper_info(&self, child_id: &str) -> Result<Option<LastDiaper>> {
        self.require_child(child_id).await?;
        self.last_diaper_at(child_id, self.clock.now()).await
    }

    /// Next feeding estimate, `None` when there is too little history
    pub async fn predict_next_feeding(&self, child_id: &str) -> Result<Option<FeedingPrediction>> {
        info!("Predicting next feeding for child {}", child_id);
        self.require_child(child_id).await?;
        self.feeding_prediction_at(child_id, self.clock.now()).await
    }

    /// Next sleep estimate, `None` when no sleep has been recorded
    pub async fn predict_next_sleep(&self, child_id: &str) -> Result<Option<SleepPrediction>> {
        info!("Predicting next sleep for child {}", child_id);
        let child = self.require_child(child_id).await?;
        self.sleep_prediction_at(&child, self.clock.now()).await
    }

    pub async fn sleep_display_status(&self, child_id: &str) -> Result<SleepDisplayStatus> {
        self.require_child(child_id).await?;
        self.sleep_display_at(child_id, self.clock.now()).await
    }

    pub async fn feeding_display_status(&self, child_id: &str) -> Result<FeedingDisplayStatus> {
        self.require_child(child_id).await?;
        let now = self.clock.now();
        let last = self.last_feeding_at(child_id, now).await?;
        self.feeding_display_at(child_id, last.as_ref(), now).await
    }

    pub async fn next_medication_due(&self, child_id: &str) -> Result<Option<MedicationDue>> {
        self.require_child(child_id).await?;
        self.next_medication_at(child_id, self.clock.now()).await
    }

    /// Everything at once, computed against a single instant
    pub async fn current_status(&self, child_id: &str) -> Result<StatusSnapshot> {
        info!("Building status snapshot for child {}", child_id);
        let child = self.require_child(child_id).await?;
        let now = self.clock.now();
        let days = self.settings.stats_window_days;
        check_window(days)?;

        let last_feeding = self.last_feeding_at(child_id, now).await?;
        let feeding = self.feeding_stats_at(child_id, days, now).await?;
        let next_feeding_prediction = feeding_prediction::predict_next_feeding(&feeding, last_feeding.as_ref(), now);

        let snapshot = StatusSnapshot {
            child_id: child_id.to_string(),
            timestamp: now,
            next_feeding_prediction,
            last_sleep: self.last_sleep_at(child_id, now).await?,
            next_sleep_prediction: self.sleep_prediction_at(&child, now).await?,
            last_diaper: self.last_diaper_at(child_id, now).await?,
            sleep_display_status: self.sleep_display_at(child_id, now).await?,
            feeding_display_status: self.feeding_display_at(child_id, last_feeding.as_ref(), now).await?,
            next_medication: self.next_medication_at(child_id, now).await?,
            stats_7_days: PeriodStats {
                feeding,
                sleep: self.sleep_stats_at(child_id, days, now).await?,
                diapers: self.diaper_stats_at(child_id, days, now).await?,
            },
            last_feeding,
        };

        debug!(
            "Snapshot for {}: feeding prediction {}, sleep prediction {}",
            child_id,
            snapshot.next_feeding_prediction.is_some(),
            snapshot.next_sleep_prediction.is_some()
        );
        Ok(snapshot)
    }

    /// Totals for events starting on a local calendar day
    pub async fn daily_summary(&self, child_id: &str, date: NaiveDate) -> Result<DailySummary> {
        info!("Building daily summary for child {} on {}", child_id, date);
        self.require_child(child_id).await?;

        let (start, end) = local_day_bounds(date, &self.timezone);
        let feedings = self.events.list_feedings(child_id, start, end).await?;
        let sleeps = self.events.list_sleeps(child_id, start, end).await?;
        let diapers = self.events.list_diaper_changes(child_id, start, end).await?;

        Ok(daily_summary::daily_summary(date, &self.timezone, &feedings, &sleeps, &diapers)?)
    }

    /// Daily summary for a `YYYY-MM-DD` date, or for today when absent
    pub async fn daily_summary_for(&self, child_id: &str, date: Option<&str>) -> Result<DailySummary> {
        let date = match date {
            Some(text) => daily_summary::parse_summary_date(text)?,
            None => local_date(self.clock.now(), &self.timezone),
        };
        self.daily_summary(child_id, date).await
    }

    async fn feeding_stats_at(&self, child_id: &str, days: i64, now: DateTime<Utc>) -> Result<FeedingStats> {
        let feedings = self.events.list_feedings(child_id, window_start(now, days), UNBOUNDED).await?;
        Ok(stats::feeding_stats(&feedings, now, days)?)
    }

    async fn sleep_stats_at(&self, child_id: &str, days: i64, now: DateTime<Utc>) -> Result<SleepStats> {
        let sleeps = self.events.list_sleeps(child_id, window_start(now, days), UNBOUNDED).await?;
        Ok(stats::sleep_stats(&sleeps, now, days)?)
    }

    async fn diaper_stats_at(&self, child_id: &str, days: i64, now: DateTime<Utc>) -> Result<DiaperStats> {
        let changes = self.events.list_diaper_changes(child_id, window_start(now, days), UNBOUNDED).await?;
        Ok(stats::diaper_stats(&changes, now, days))
    }

    async fn last_feeding_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<Option<LastFeeding>> {
        let latest = self.events.latest_feeding(child_id).await?;
        Ok(latest.map(|feeding| last_event::last_feeding_info(&feeding, now)))
    }

    async fn last_sleep_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<Option<LastSleep>> {
        let latest = self.events.latest_sleep(child_id).await?;
        Ok(latest.map(|sleep| last_event::last_sleep_info(&sleep, now)).transpose()?)
    }

    async fn last_diaper_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<Option<LastDiaper>> {
        let latest = self.events.latest_diaper_change(child_id).await?;
        Ok(latest.map(|change| last_event::last_diaper_info(&change, now)))
    }

    async fn feeding_prediction_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<Option<FeedingPrediction>> {
        let days = self.settings.stats_window_days;
        check_window(days)?;
        let stats = self.feeding_stats_at(child_id, days, now).await?;
        let last = self.last_feeding_at(child_id, now).await?;
        Ok(feeding_prediction::predict_next_feeding(&stats, last.as_ref(), now))
    }

    async fn sleep_prediction_at(&self, child: &Child, now: DateTime<Utc>) -> Result<Option<SleepPrediction>> {
        let lookback = self.settings.wake_window_lookback_days;
        check_window(lookback)?;

        let Some(last) = self.last_sleep_at(&child.id, now).await? else {
            debug!("No sleep recorded for child {}, skipping sleep prediction", child.id);
            return Ok(None);
        };

        let age_months = child.age_in_months(local_date(now, &self.timezone));
        let sleeps = self.events.list_sleeps(&child.id, window_start(now, lookback), UNBOUNDED).await?;
        let learner = WakeWindowLearner::new(self.timezone, lookback);
        let estimate = learner.estimate(&sleeps, now, age_months)?;

        Ok(sleep_prediction::predict_next_sleep(Some(&last), estimate, age_months, now))
    }

    async fn sleep_display_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<SleepDisplayStatus> {
        let timers = self.timers.active_timers(child_id).await?;
        let sleep_timer = timers.iter().find(|t| t.is_sleep_timer());

        // A night sleep that ends this morning started yesterday
        let (day_start, _) = local_day_bounds(local_date(now, &self.timezone), &self.timezone);
        let sleeps = self.events.list_sleeps(child_id, day_start - Duration::days(1), UNBOUNDED).await?;

        Ok(display_status::sleep_display_status(
            sleep_timer,
            &sleeps,
            now,
            &self.timezone,
            self.settings.good_night_hour,
        )?)
    }

    async fn feeding_display_at(
        &self,
        child_id: &str,
        last: Option<&LastFeeding>,
        now: DateTime<Utc>,
    ) -> Result<FeedingDisplayStatus> {
        let timers = self.timers.active_timers(child_id).await?;
        let feeding_timer = timers.iter().find(|t| t.is_feeding_timer());
        Ok(display_status::feeding_display_status(feeding_timer, last, now))
    }

    async fn next_medication_at(&self, child_id: &str, now: DateTime<Utc>) -> Result<Option<MedicationDue>> {
        let medications = self.events.list_medications(child_id).await?;
        if medications.is_empty() {
            return Ok(None);
        }
        let doses = self.events.list_medication_doses(child_id).await?;
        Ok(medication_schedule::next_medication_due(&medications, &doses, now, &self.timezone))
    }
}
