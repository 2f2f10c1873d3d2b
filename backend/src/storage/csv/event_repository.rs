use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::FeedingType;
use std::fs::{self, File};
use std::io::BufReader;

use super::connection::{
    CsvConnection, CHILD_FILE, DIAPER_CHANGES_FILE, FEEDINGS_FILE, MEDICATIONS_FILE, MEDICATION_DOSES_FILE,
    SLEEP_FILE, TIMERS_FILE,
};
use crate::domain::last_event::{latest_diaper_change, latest_feeding, latest_sleep};
use crate::domain::models::{
    Child, DiaperChange, Feeding, Medication, MedicationDose, MedicationFrequency, MedicationType, Sleep, Timer,
};
use crate::storage::select_range;
use crate::storage::traits::{EventStore, TimerStore};

#[derive(Debug, Deserialize)]
struct ChildRecord {
    name: String,
    #[serde(default)]
    birth_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct FeedingRecord {
    id: String,
    start: String,
    end: String,
    feeding_type: FeedingType,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SleepRecord {
    id: String,
    start: String,
    end: String,
    nap: bool,
}

#[derive(Debug, Deserialize)]
struct DiaperChangeRecord {
    id: String,
    time: String,
    wet: bool,
    solid: bool,
}

#[derive(Debug, Deserialize)]
struct MedicationRecord {
    id: String,
    name: String,
    medication_type: MedicationType,
    dosage: String,
    frequency: MedicationFrequency,
    schedule_times: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    active: bool,
}

#[derive(Debug, Deserialize)]
struct MedicationDoseRecord {
    id: String,
    medication_id: String,
    time: String,
    given: bool,
    skipped_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimerRecord {
    id: String,
    name: Option<String>,
    start: String,
    active: bool,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value.trim())
        .with_context(|| format!("Invalid RFC 3339 timestamp '{}'", value))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Read-only event store over a directory of per-child CSV files
#[derive(Debug, Clone)]
pub struct CsvEventRepository {
    connection: CsvConnection,
}

impl CsvEventRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Deserialize every row of one of the child's CSV files
    fn read_records<R: DeserializeOwned>(&self, child_id: &str, file_name: &str) -> Result<Vec<R>> {
        let path = self.connection.file_path(child_id, file_name)?;
        if !path.exists() {
            debug!("{} not found, treating as empty", path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));
        let mut records = Vec::new();
        for (index, result) in reader.deserialize().enumerate() {
            let record: R = result.with_context(|| format!("Malformed row {} in {}", index + 1, path.display()))?;
            records.push(record);
        }

        Ok(records)
    }

    fn read_feedings(&self, child_id: &str) -> Result<Vec<Feeding>> {
        self.read_records::<FeedingRecord>(child_id, FEEDINGS_FILE)?
            .into_iter()
            .map(|r| -> Result<_> {
                Ok(Feeding {
                    id: r.id,
                    child_id: child_id.to_string(),
                    start: parse_timestamp(&r.start)?,
                    end: parse_timestamp(&r.end)?,
                    feeding_type: r.feeding_type,
                    amount: r.amount,
                })
            })
            .collect()
    }

    fn read_sleeps(&self, child_id: &str) -> Result<Vec<Sleep>> {
        self.read_records::<SleepRecord>(child_id, SLEEP_FILE)?
            .into_iter()
            .map(|r| -> Result<_> {
                Ok(Sleep {
                    id: r.id,
                    child_id: child_id.to_string(),
                    start: parse_timestamp(&r.start)?,
                    end: parse_timestamp(&r.end)?,
                    nap: r.nap,
                })
            })
            .collect()
    }

    fn read_diaper_changes(&self, child_id: &str) -> Result<Vec<DiaperChange>> {
        self.read_records::<DiaperChangeRecord>(child_id, DIAPER_CHANGES_FILE)?
            .into_iter()
            .map(|r| -> Result<_> {
                Ok(DiaperChange {
                    id: r.id,
                    child_id: child_id.to_string(),
                    time: parse_timestamp(&r.time)?,
                    wet: r.wet,
                    solid: r.solid,
                })
            })
            .collect()
    }
}

#[async_trait]
impl EventStore for CsvEventRepository {
    async fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let yaml_path = self.connection.file_path(child_id, CHILD_FILE)?;
        if !yaml_path.exists() {
            warn!("No {} for child '{}'", CHILD_FILE, child_id);
            return Ok(None);
        }

        let yaml_content = fs::read_to_string(&yaml_path)?;
        let record: ChildRecord = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {}", yaml_path.display()))?;

        Ok(Some(Child {
            id: child_id.to_string(),
            name: record.name,
            birth_date: record.birth_date,
        }))
    }

    async fn list_feedings(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Feeding>> {
        let feedings = self.read_feedings(child_id)?;
        Ok(select_range(&feedings, child_id, since, until, |f| f.child_id.as_str(), |f| f.start))
    }

    async fn list_sleeps(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Sleep>> {
        let sleeps = self.read_sleeps(child_id)?;
        Ok(select_range(&sleeps, child_id, since, until, |s| s.child_id.as_str(), |s| s.start))
    }

    async fn list_diaper_changes(&self, child_id: &str, since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<DiaperChange>> {
        let changes = self.read_diaper_changes(child_id)?;
        Ok(select_range(&changes, child_id, since, until, |d| d.child_id.as_str(), |d| d.time))
    }

    async fn latest_feeding(&self, child_id: &str) -> Result<Option<Feeding>> {
        let feedings = self.read_feedings(child_id)?;
        Ok(latest_feeding(&feedings).cloned())
    }

    async fn latest_sleep(&self, child_id: &str) -> Result<Option<Sleep>> {
        let sleeps = self.read_sleeps(child_id)?;
        Ok(latest_sleep(&sleeps).cloned())
    }

    async fn latest_diaper_change(&self, child_id: &str) -> Result<Option<DiaperChange>> {
        let changes = self.read_diaper_changes(child_id)?;
        Ok(latest_diaper_change(&changes).cloned())
    }

    async fn list_medications(&self, child_id: &str) -> Result<Vec<Medication>> {
        let records = self.read_records::<MedicationRecord>(child_id, MEDICATIONS_FILE)?;
        Ok(records
            .into_iter()
            .map(|r| Medication {
                id: r.id,
                child_id: child_id.to_string(),
                name: r.name,
                medication_type: r.medication_type,
                dosage: r.dosage,
                frequency: r.frequency,
                schedule_times: r.schedule_times,
                start_date: r.start_date,
                end_date: r.end_date,
                active: r.active,
            })
            .collect())
    }

    async fn list_medication_doses(&self, child_id: &str) -> Result<Vec<MedicationDose>> {
        self.read_records::<MedicationDoseRecord>(child_id, MEDICATION_DOSES_FILE)?
            .into_iter()
            .map(|r| -> Result<_> {
                Ok(MedicationDose {
                    id: r.id,
                    medication_id: r.medication_id,
                    child_id: child_id.to_string(),
                    time: parse_timestamp(&r.time)?,
                    given: r.given,
                    skipped_reason: r.skipped_reason.filter(|reason| !reason.is_empty()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl TimerStore for CsvEventRepository {
    async fn active_timers(&self, child_id: &str) -> Result<Vec<Timer>> {
        let records = self.read_records::<TimerRecord>(child_id, TIMERS_FILE)?;
        let mut timers = Vec::new();
        for r in records.into_iter().filter(|r| r.active) {
            timers.push(Timer {
                id: r.id,
                child_id: child_id.to_string(),
                name: r.name.filter(|name| !name.is_empty()),
                start: parse_timestamp(&r.start)?,
                active: r.active,
            });
        }
        Ok(timers)
    }
}
