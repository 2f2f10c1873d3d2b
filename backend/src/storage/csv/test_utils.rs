//! Temporary data directories for CSV store tests.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;

/// A data directory that is removed when dropped
pub struct TestEnvironment {
    /// Kept alive until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    /// Write a file into a child's directory, creating the directory if needed
    pub fn write_file(&self, child_id: &str, file_name: &str, contents: &str) -> Result<()> {
        let child_dir = self.base_path.join(child_id);
        fs::create_dir_all(&child_dir)?;
        fs::write(child_dir.join(file_name), contents)?;
        Ok(())
    }
}
