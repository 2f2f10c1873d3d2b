use anyhow::{bail, Result};
use log::info;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::AnalyticsError;

pub const CHILD_FILE: &str = "child.yaml";
pub const FEEDINGS_FILE: &str = "feedings.csv";
pub const SLEEP_FILE: &str = "sleep.csv";
pub const DIAPER_CHANGES_FILE: &str = "diaper_changes.csv";
pub const MEDICATIONS_FILE: &str = "medications.csv";
pub const MEDICATION_DOSES_FILE: &str = "medication_doses.csv";
pub const TIMERS_FILE: &str = "timers.csv";

/// CsvConnection resolves the files that make up each child's directory
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open an existing data directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.is_dir() {
            bail!("Data directory {} does not exist", base_path.display());
        }

        info!("Using data directory: {}", base_path.display());
        Ok(Self { base_directory: base_path })
    }

    /// Directory holding one child's files
    pub fn child_directory(&self, child_id: &str) -> Result<PathBuf, AnalyticsError> {
        validate_child_id(child_id)?;
        Ok(self.base_directory.join(child_id))
    }

    pub fn file_path(&self, child_id: &str, file_name: &str) -> Result<PathBuf, AnalyticsError> {
        Ok(self.child_directory(child_id)?.join(file_name))
    }
}

/// A child id names exactly one directory directly under the data directory
fn validate_child_id(child_id: &str) -> Result<(), AnalyticsError> {
    let mut components = Path::new(child_id).components();
    let single_name = matches!((components.next(), components.next()), (Some(Component::Normal(_)), None));

    if !single_name || child_id.contains(['/', '\\']) {
        return Err(AnalyticsError::InvalidChildId(child_id.to_string()));
    }
    Ok(())
}
