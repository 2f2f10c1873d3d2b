//! # Storage Traits
//!
//! Read capabilities the analytics core consumes. The core never writes, so
//! there are no mutation methods here.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Child, DiaperChange, Feeding, Medication, MedicationDose, Sleep, Timer};

/// Time-ordered access to a child's event log
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Look up a child by ID
    async fn get_child(&self, child_id: &str) -> Result<Option<Child>>;

    /// Feedings whose start falls in `[since, until)`, ordered by start
    async fn list_feedings(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Feeding>>;

    /// Sleeps whose start falls in `[since, until)`, ordered by start
    async fn list_sleeps(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Sleep>>;

    /// Diaper changes whose time falls in `[since, until)`, ordered by time
    async fn list_diaper_changes(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<DiaperChange>>;

    /// The feeding with the latest end, regardless of age
    async fn latest_feeding(&self, child_id: &str) -> Result<Option<Feeding>>;

    /// The sleep with the latest end, regardless of age
    async fn latest_sleep(&self, child_id: &str) -> Result<Option<Sleep>>;

    async fn latest_diaper_change(&self, child_id: &str) -> Result<Option<DiaperChange>>;

    async fn list_medications(&self, child_id: &str) -> Result<Vec<Medication>>;

    /// Every dose record for the child, given or skipped
    async fn list_medication_doses(&self, child_id: &str) -> Result<Vec<MedicationDose>>;
}

/// In-progress timers.
///
/// Kept apart from [`EventStore`]: a timer is cleared when its completed
/// interval is saved, so it has its own lifetime.
#[async_trait]
pub trait TimerStore: Send + Sync {
    /// Timers currently running for the child
    async fn active_timers(&self, child_id: &str) -> Result<Vec<Timer>>;
}
