//! Path management for the parking ledger
//!
//! ## Path Resolution Order
//!
//! 1. `PARKING_LEDGER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `parking-ledger`
//!    (`~/.config/parking-ledger` on Linux, `%APPDATA%\parking-ledger` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::ParkingError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "PARKING_LEDGER_DATA_DIR";

/// File name of the binary record snapshot
pub const SNAPSHOT_FILE_NAME: &str = "parking_records.dat";

/// Manages all paths used by the parking ledger
#[derive(Debug, Clone)]
pub struct ParkingPaths {
    /// Base directory for all ledger data
    base_dir: PathBuf,
}

impl ParkingPaths {
    /// Create a new ParkingPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is not set.
    pub fn new() -> Result<Self, ParkingError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create ParkingPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the backup directory (<base>/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the record snapshot
    pub fn snapshot_file(&self) -> PathBuf {
        self.data_dir().join(SNAPSHOT_FILE_NAME)
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), ParkingError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ParkingError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ParkingError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| ParkingError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, ParkingError> {
    ProjectDirs::from("", "", "parking-ledger")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ParkingError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = ParkingPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.snapshot_file(),
            temp_dir.path().join("data").join("parking_records.dat")
        );
    }
}
