//! User settings for the parking ledger
//!
//! Manages the record capacity, snapshot load policy, display format,
//! admin credentials and backup retention.

use serde::{Deserialize, Serialize};

use super::paths::ParkingPaths;
use crate::error::ParkingError;

/// Default maximum number of records the store accepts
pub const DEFAULT_CAPACITY: usize = 1000;

/// How `load` treats a malformed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotPolicy {
    /// Keep whatever can be read and report the anomalies
    #[default]
    Lenient,
    /// Refuse to load and fail with `CorruptSnapshot`
    Strict,
}

impl SnapshotPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Admin login configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Admin username
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Argon2id PHC hash of the admin password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_hash: None,
        }
    }
}

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of snapshot backups to keep
    pub max_backups: usize,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self { max_backups: 30 }
    }
}

/// User settings for the parking ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of this settings file
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Maximum number of records kept in the store
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// How to treat a malformed snapshot on load
    #[serde(default)]
    pub snapshot_policy: SnapshotPolicy,

    /// Date/time format for listings (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Admin credentials
    #[serde(default)]
    pub admin: AdminSettings,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,
}

fn default_schema_version() -> u32 {
    1
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            capacity: default_capacity(),
            snapshot_policy: SnapshotPolicy::default(),
            date_format: default_date_format(),
            admin: AdminSettings::default(),
            backup_retention: BackupRetention::default(),
        }
    }
}

impl Settings {
    /// Whether an admin password has been configured
    pub fn has_admin_password(&self) -> bool {
        self.admin.password_hash.is_some()
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ParkingPaths) -> Result<Self, ParkingError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ParkingError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ParkingError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Reject settings the store cannot honour
    pub fn validate(&self) -> Result<(), ParkingError> {
        if self.capacity == 0 {
            return Err(ParkingError::Config("capacity must be at least 1".into()));
        }
        if self.capacity > i32::MAX as usize {
            return Err(ParkingError::Config(format!(
                "capacity {} exceeds the snapshot limit of {}",
                self.capacity,
                i32::MAX
            )));
        }
        if self.admin.username.trim().is_empty() {
            return Err(ParkingError::Config("admin username cannot be empty".into()));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ParkingPaths) -> Result<(), ParkingError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ParkingError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            ParkingError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.capacity, 1000);
        assert_eq!(settings.snapshot_policy, SnapshotPolicy::Lenient);
        assert_eq!(settings.admin.username, "admin");
        assert!(!settings.has_admin_password());
        assert_eq!(settings.backup_retention.max_backups, 30);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.capacity = 50;
        settings.snapshot_policy = SnapshotPolicy::Strict;
        settings.admin.username = "attendant".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.capacity, 50);
        assert_eq!(loaded.snapshot_policy, SnapshotPolicy::Strict);
        assert_eq!(loaded.admin.username, "attendant");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"capacity": 10}"#).unwrap();
        assert_eq!(settings.capacity, 10);
        assert_eq!(settings.date_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(settings.admin.username, "admin");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"capacity": 0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ParkingError::Config(_)));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(SnapshotPolicy::parse("STRICT"), Some(SnapshotPolicy::Strict));
        assert_eq!(SnapshotPolicy::parse("lenient"), Some(SnapshotPolicy::Lenient));
        assert_eq!(SnapshotPolicy::parse("other"), None);
    }
}
