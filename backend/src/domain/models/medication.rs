//! Domain model for medications and the log of doses given or skipped.
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationType {
    Vitamin,
    Drops,
    Medicine,
    Supplement,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationFrequency {
    OnceDaily,
    TwiceDaily,
    ThreeTimesDaily,
    EveryOtherDay,
    Weekly,
    AsNeeded,
    Custom,
}

impl MedicationFrequency {
    /// Dose records needed per day for the daily frequencies
    pub fn doses_per_day(&self) -> usize {
        match self {
            MedicationFrequency::TwiceDaily => 2,
            MedicationFrequency::ThreeTimesDaily => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub child_id: String,
    pub name: String,
    pub medication_type: MedicationType,
    pub dosage: String,
    pub frequency: MedicationFrequency,
    /// Comma-separated local times, e.g. "09:00, 21:00"
    pub schedule_times: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
}

impl Medication {
    /// Active and inside its start/end dates on the given day
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.active
            && self.start_date <= day
            && self.end_date.map_or(true, |end| end >= day)
    }

    /// Parsed schedule times in ascending order, plus the entries that failed to parse
    pub fn parsed_schedule(&self) -> (Vec<NaiveTime>, Vec<String>) {
        let mut times = Vec::new();
        let mut rejected = Vec::new();

        for entry in self.schedule_times.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match NaiveTime::parse_from_str(entry, "%H:%M") {
                Ok(time) => times.push(time),
                Err(_) => rejected.push(entry.to_string()),
            }
        }

        times.sort();
        (times, rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDose {
    pub id: String,
    pub medication_id: String,
    pub child_id: String,
    pub time: DateTime<Utc>,
    /// False when the dose was recorded as skipped
    pub given: bool,
    #[serde(default)]
    pub skipped_reason: Option<String>,
}
