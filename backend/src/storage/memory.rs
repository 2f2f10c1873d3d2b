//! In-memory event store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::select_range;
use super::traits::{EventStore, TimerStore};
use crate::domain::models::{Child, DiaperChange, Feeding, Medication, MedicationDose, Sleep, Timer};

#[derive(Default)]
struct Data {
    children: Vec<Child>,
    feedings: Vec<Feeding>,
    sleeps: Vec<Sleep>,
    diaper_changes: Vec<DiaperChange>,
    medications: Vec<Medication>,
    doses: Vec<MedicationDose>,
    timers: Vec<Timer>,
}

/// Event log held in memory
#[derive(Default)]
pub struct InMemoryEventStore {
    data: RwLock<Data>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_child(&self, child: Child) {
        self.data.write().await.children.push(child);
    }

    pub async fn add_feeding(&self, feeding: Feeding) {
        self.data.write().await.feedings.push(feeding);
    }

    pub async fn add_sleep(&self, sleep: Sleep) {
        self.data.write().await.sleeps.push(sleep);
    }

    pub async fn add_diaper_change(&self, change: DiaperChange) {
        self.data.write().await.diaper_changes.push(change);
    }

    pub async fn add_medication(&self, medication: Medication) {
        self.data.write().await.medications.push(medication);
    }

    pub async fn add_medication_dose(&self, dose: MedicationDose) {
        self.data.write().await.doses.push(dose);
    }

    pub async fn add_timer(&self, timer: Timer) {
        self.data.write().await.timers.push(timer);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let data = self.data.read().await;
        Ok(data.children.iter().find(|c| c.id == child_id).cloned())
    }

    async fn list_feedings(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Feeding>> {
        let data = self.data.read().await;
        Ok(select_range(&data.feedings, child_id, since, until, |f| f.child_id.as_str(), |f| f.start))
    }

    async fn list_sleeps(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Sleep>> {
        let data = self.data.read().await;
        Ok(select_range(&data.sleeps, child_id, since, until, |s| s.child_id.as_str(), |s| s.start))
    }

    async fn list_diaper_changes(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<DiaperChange>> {
        let data = self.data.read().await;
        Ok(select_range(&data.diaper_changes, child_id, since, until, |d| d.child_id.as_str(), |d| d.time))
    }

    async fn latest_feeding(&self, child_id: &str) -> Result<Option<Feeding>> {
        let data = self.data.read().await;
        Ok(data.feedings.iter().filter(|f| f.child_id == child_id).max_by_key(|f| f.end).cloned())
    }

    async fn latest_sleep(&self, child_id: &str) -> Result<Option<Sleep>> {
        let data = self.data.read().await;
        Ok(data.sleeps.iter().filter(|s| s.child_id == child_id).max_by_key(|s| s.end).cloned())
    }

    async fn latest_diaper_change(&self, child_id: &str) -> Result<Option<DiaperChange>> {
        let data = self.data.read().await;
        Ok(data.diaper_changes.iter().filter(|d| d.child_id == child_id).max_by_key(|d| d.time).cloned())
    }

    async fn list_medications(&self, child_id: &str) -> Result<Vec<Medication>> {
        let data = self.data.read().await;
        Ok(data.medications.iter().filter(|m| m.child_id == child_id).cloned().collect())
    }

    async fn list_medication_doses(&self, child_id: &str) -> Result<Vec<MedicationDose>> {
        let data = self.data.read().await;
        Ok(data.doses.iter().filter(|d| d.child_id == child_id).cloned().collect())
    }
}

#[async_trait]
impl TimerStore for InMemoryEventStore {
    async fn active_timers(&self, child_id: &str) -> Result<Vec<Timer>> {
        let data = self.data.read().await;
        Ok(data.timers.iter().filter(|t| t.child_id == child_id && t.active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use shared::FeedingType;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, hour, 0, 0).unwrap()
    }

    fn feeding(id: &str, child_id: &str, start: DateTime<Utc>, minutes: i64) -> Feeding {
        Feeding {
            id: id.to_string(),
            child_id: child_id.to_string(),
            start,
            end: start + Duration::minutes(minutes),
            feeding_type: FeedingType::BreastMilk,
            amount: None,
        }
    }

    #[tokio::test]
    async fn test_list_feedings_filters_and_orders_by_start() {
        let store = InMemoryEventStore::new();
        store.add_feeding(feeding("late", "c1", at(10), 10)).await;
        store.add_feeding(feeding("early", "c1", at(6), 10)).await;
        store.add_feeding(feeding("other", "c2", at(7), 10)).await;
        store.add_feeding(feeding("outside", "c1", at(12), 10)).await;

        let feedings = store.list_feedings("c1", at(5), at(12)).await.unwrap();
        let ids: Vec<&str> = feedings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_latest_feeding_uses_end_time() {
        let store = InMemoryEventStore::new();
        store.add_feeding(feeding("long", "c1", at(6), 300)).await;
        store.add_feeding(feeding("short", "c1", at(8), 10)).await;

        let latest = store.latest_feeding("c1").await.unwrap().unwrap();
        assert_eq!(latest.id, "long");
        assert!(store.latest_feeding("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_active_timers_only() {
        let store = InMemoryEventStore::new();
        for (id, active) in [("on", true), ("off", false)] {
            store
                .add_timer(Timer {
                    id: id.to_string(),
                    child_id: "c1".to_string(),
                    name: Some("Sleep".to_string()),
                    start: at(9),
                    active,
                })
                .await;
        }

        let timers = store.active_timers("c1").await.unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, "on");
    }
}
