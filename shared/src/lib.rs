use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What was given during a feeding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeedingType {
    #[serde(rename = "breast milk")]
    BreastMilk,
    #[serde(rename = "formula")]
    Formula,
    #[serde(rename = "fortified breast milk")]
    FortifiedBreastMilk,
    #[serde(rename = "solid food")]
    SolidFood,
}

impl FeedingType {
    /// Label used in storage files and API payloads
    pub fn label(&self) -> &'static str {
        match self {
            FeedingType::BreastMilk => "breast milk",
            FeedingType::Formula => "formula",
            FeedingType::FortifiedBreastMilk => "fortified breast milk",
            FeedingType::SolidFood => "solid food",
        }
    }
}

impl fmt::Display for FeedingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Feeding statistics over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingStats {
    pub count: u32,
    pub average_duration_minutes: f64,
    /// Mean gap between the end of one feeding and the start of the next
    pub average_interval_minutes: f64,
    /// Sum of recorded amounts, missing amounts count as zero
    pub total_amount: f64,
    pub by_type: BTreeMap<FeedingType, u32>,
    pub period_days: i64,
}

impl FeedingStats {
    pub fn empty(period_days: i64) -> Self {
        Self {
            count: 0,
            average_duration_minutes: 0.0,
            average_interval_minutes: 0.0,
            total_amount: 0.0,
            by_type: BTreeMap::new(),
            period_days,
        }
    }
}

/// Sleep statistics over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepStats {
    pub count: u32,
    pub total_sleep_hours: f64,
    /// Total hours divided by the window length, not by the days that have data
    pub average_sleep_hours_per_day: f64,
    pub naps_count: u32,
    pub night_sleep_count: u32,
    pub average_nap_duration_minutes: f64,
    pub period_days: i64,
}

impl SleepStats {
    pub fn empty(period_days: i64) -> Self {
        Self {
            count: 0,
            total_sleep_hours: 0.0,
            average_sleep_hours_per_day: 0.0,
            naps_count: 0,
            night_sleep_count: 0,
            average_nap_duration_minutes: 0.0,
            period_days,
        }
    }
}

/// Diaper change statistics over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperStats {
    pub count: u32,
    pub wet_count: u32,
    pub solid_count: u32,
    pub average_per_day: f64,
    pub period_days: i64,
}

impl DiaperStats {
    pub fn empty(period_days: i64) -> Self {
        Self {
            count: 0,
            wet_count: 0,
            solid_count: 0,
            average_per_day: 0.0,
            period_days,
        }
    }
}

/// Most recent feeding and the time elapsed since it ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastFeeding {
    pub end_time: DateTime<Utc>,
    pub time_since_minutes: f64,
    pub time_since_hours: f64,
    /// Humanized phrase, rounded to five minutes
    pub time_since_formatted: String,
    /// "H:MM"
    pub time_since_clock: String,
    pub feeding_type: FeedingType,
    pub amount: Option<f64>,
}

/// Most recent sleep and the time elapsed since the child woke up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSleep {
    pub end_time: DateTime<Utc>,
    pub time_since_minutes: f64,
    pub time_since_hours: f64,
    pub time_since_formatted: String,
    pub time_since_clock: String,
    pub was_nap: bool,
    pub duration_minutes: f64,
}

/// Most recent diaper change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastDiaper {
    pub time: DateTime<Utc>,
    pub time_since_minutes: f64,
    pub time_since_hours: f64,
    pub time_since_formatted: String,
    pub time_since_clock: String,
    pub was_wet: bool,
    pub was_solid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Where a sleep prediction's wake window came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Learned,
    Mixed,
    AgeBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingStatus {
    Overdue,
    Soon,
    Upcoming,
    Later,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingPrediction {
    pub status: FeedingStatus,
    pub message: String,
    /// Signed: negative once the average interval has been exceeded
    pub minutes_until_next: f64,
    /// Magnitude of the delay, only set when overdue
    pub minutes_overdue: Option<f64>,
    pub estimated_time: DateTime<Utc>,
    pub average_interval_minutes: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStatus {
    Overtired,
    GettingTired,
    Soon,
    Awake,
}

/// Age-based wake window bounds in minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WakeWindowRange {
    pub min_minutes: f64,
    pub max_minutes: f64,
}

impl WakeWindowRange {
    pub fn midpoint(&self) -> f64 {
        (self.min_minutes + self.max_minutes) / 2.0
    }
}

/// Summary of the wake windows observed in the child's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeWindowSummary {
    pub sample_size: usize,
    pub average_minutes: f64,
    pub min_minutes: f64,
    pub max_minutes: f64,
    /// Recency and time-of-day weighted mean
    pub weighted_average_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPrediction {
    pub status: SleepStatus,
    pub message: String,
    pub minutes_awake: f64,
    pub minutes_until_tired: f64,
    pub predicted_wake_window_minutes: f64,
    /// Never earlier than the time the prediction was made
    pub estimated_sleep_time: DateTime<Utc>,
    pub confidence: Confidence,
    pub data_source: DataSource,
    pub age_months: Option<f64>,
    pub age_based_range: WakeWindowRange,
    pub wake_window_stats: Option<WakeWindowSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepDisplayMode {
    Sleeping,
    GoodNight,
    GoodMorning,
    Awake,
}

/// Dashboard state for the sleep card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDisplayStatus {
    pub mode: SleepDisplayMode,
    pub display_text: String,
    /// Minutes asleep (sleeping) or awake (awake), absent in the other modes
    pub elapsed_minutes: Option<f64>,
    pub elapsed_formatted: Option<String>,
    pub naps_today: u32,
    pub nap_minutes_today: f64,
    pub last_nap_note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingDisplayMode {
    Feeding,
    Idle,
}

/// Dashboard state for the feeding card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingDisplayStatus {
    pub mode: FeedingDisplayMode,
    pub display_text: String,
    pub elapsed_minutes: Option<f64>,
    pub elapsed_formatted: Option<String>,
}

/// Next scheduled medication dose that has not been given yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDue {
    pub medication_id: String,
    pub name: String,
    pub dosage: String,
    pub next_dose_time: DateTime<Utc>,
    pub minutes_until: i64,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub feeding: FeedingStats,
    pub sleep: SleepStats,
    pub diapers: DiaperStats,
}

/// Everything the dashboard and webhooks need in one pull
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub child_id: String,
    pub timestamp: DateTime<Utc>,
    pub last_feeding: Option<LastFeeding>,
    pub next_feeding_prediction: Option<FeedingPrediction>,
    pub last_sleep: Option<LastSleep>,
    pub next_sleep_prediction: Option<SleepPrediction>,
    pub last_diaper: Option<LastDiaper>,
    pub sleep_display_status: SleepDisplayStatus,
    pub feeding_display_status: FeedingDisplayStatus,
    pub next_medication: Option<MedicationDue>,
    pub stats_7_days: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeedingSummary {
    pub count: u32,
    pub total_duration_minutes: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySleepSummary {
    pub count: u32,
    pub total_duration_minutes: f64,
    pub total_duration_hours: f64,
    pub naps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDiaperSummary {
    pub count: u32,
    pub wet: u32,
    pub solid: u32,
}

/// Totals for one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub feedings: DailyFeedingSummary,
    pub sleep: DailySleepSummary,
    pub diapers: DailyDiaperSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feeding_type_uses_storage_labels() {
        let json = serde_json::to_string(&FeedingType::FortifiedBreastMilk).unwrap();
        assert_eq!(json, "\"fortified breast milk\"");

        let parsed: FeedingType = serde_json::from_str("\"solid food\"").unwrap();
        assert_eq!(parsed, FeedingType::SolidFood);
        assert_eq!(parsed.to_string(), "solid food");
    }

    #[test]
    fn test_status_enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&SleepStatus::GettingTired).unwrap(), "\"getting_tired\"");
        assert_eq!(serde_json::to_string(&DataSource::AgeBased).unwrap(), "\"age_based\"");
        assert_eq!(serde_json::to_string(&SleepDisplayMode::GoodMorning).unwrap(), "\"good_morning\"");
    }

    #[test]
    fn test_by_type_map_serializes_with_labels() {
        let mut stats = FeedingStats::empty(7);
        stats.by_type.insert(FeedingType::Formula, 3);
        stats.by_type.insert(FeedingType::BreastMilk, 2);

        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["by_type"]["formula"], 3);
        assert_eq!(value["by_type"]["breast milk"], 2);
        assert_eq!(value["period_days"], 7);
    }

    #[test]
    fn test_wake_window_midpoint() {
        let range = WakeWindowRange { min_minutes: 75.0, max_minutes: 120.0 };
        assert_eq!(range.midpoint(), 97.5);
    }
}
