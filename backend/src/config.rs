//! Application configuration loaded from YAML.

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "BABY_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "baby-tracker.yaml";

/// Tunables for the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Lookback for the stats records and the feeding prediction
    pub stats_window_days: i64,
    /// Lookback for wake-window learning
    pub wake_window_lookback_days: i64,
    /// Local hour from which the sleep card says good night
    pub good_night_hour: u32,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            stats_window_days: 7,
            wake_window_lookback_days: 14,
            good_night_hour: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    /// IANA zone of the child's home, e.g. `Asia/Jerusalem`
    pub timezone: String,
    pub log_filter: String,
    pub analytics: AnalyticsSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("./data"),
            timezone: "UTC".to_string(),
            log_filter: "info".to_string(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from `$BABY_TRACKER_CONFIG`, falling back to `baby-tracker.yaml`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The zone used for local hours and calendar days
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown time zone '{}': {}", self.timezone, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp_dir.path().join("absent.yaml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analytics.stats_window_days, 7);
        assert_eq!(config.analytics.wake_window_lookback_days, 14);
        assert_eq!(config.analytics.good_night_hour, 20);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "data_directory: /srv/baby\ntimezone: Asia/Jerusalem\nanalytics:\n  good_night_hour: 19\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.data_directory, PathBuf::from("/srv/baby"));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.analytics.good_night_hour, 19);
        assert_eq!(config.analytics.stats_window_days, 7);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Asia::Jerusalem);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "analytics: [not, a, mapping]\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_default_zone_is_utc() {
        assert_eq!(AppConfig::default().time_zone().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_unknown_zone_is_an_error() {
        let config = AppConfig { timezone: "Mars/Olympus_Mons".to_string(), ..AppConfig::default() };
        assert!(config.time_zone().is_err());
    }
}
