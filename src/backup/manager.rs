//! Backup creation, listing and retention

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::config::paths::ParkingPaths;
use crate::config::settings::{BackupRetention, Settings};
use crate::error::{ParkingError, ParkingResult};
use crate::storage::snapshot::{encode_snapshot, read_snapshot};

const BACKUP_PREFIX: &str = "parking-";
const BACKUP_EXTENSION: &str = "dat";

/// Metadata about a backup
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// When the backup was created
    pub created_at: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
    /// Records the backup decodes to
    pub record_count: usize,
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    pub(super) paths: ParkingPaths,
    retention: BackupRetention,
    pub(super) capacity: usize,
}

impl BackupManager {
    pub fn new(paths: ParkingPaths, settings: &Settings) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            retention: settings.backup_retention.clone(),
            capacity: settings.capacity,
            paths,
        }
    }

    /// Copy the live snapshot into the backup directory, then prune
    ///
    /// A store that has never been saved is backed up as an empty snapshot.
    /// Returns the path of the new backup.
    pub fn create_backup(&self) -> ParkingResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            ParkingError::Backup(format!("Failed to create backup directory: {}", e))
        })?;

        let backup_path = self.unused_backup_path(Utc::now());
        let snapshot = self.paths.snapshot_file();

        if snapshot.exists() {
            fs::copy(&snapshot, &backup_path)
                .map_err(|e| ParkingError::Backup(format!("Failed to copy snapshot: {}", e)))?;
        } else {
            fs::write(&backup_path, encode_snapshot(&[])?)
                .map_err(|e| ParkingError::Backup(format!("Failed to write backup: {}", e)))?;
        }

        self.enforce_retention()?;
        Ok(backup_path)
    }

    /// Backup path for `now`, with a numeric suffix if that name is taken
    fn unused_backup_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stamp = format!(
            "{}{}-{:03}",
            BACKUP_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );

        let mut path = self
            .backup_dir
            .join(format!("{}.{}", stamp, BACKUP_EXTENSION));
        let mut n = 1;
        while path.exists() {
            path = self
                .backup_dir
                .join(format!("{}-{}.{}", stamp, n, BACKUP_EXTENSION));
            n += 1;
        }
        path
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> ParkingResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            ParkingError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                ParkingError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            if let Some(info) = self.parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| backup_sequence(&b.filename).cmp(&backup_sequence(&a.filename)))
        });

        Ok(backups)
    }

    fn parse_backup_info(&self, path: &Path) -> Option<BackupInfo> {
        if path.extension().map_or(true, |ext| ext != BACKUP_EXTENSION) {
            return None;
        }

        let filename = path.file_name()?.to_string_lossy().to_string();
        let stem = filename
            .strip_prefix(BACKUP_PREFIX)?
            .strip_suffix(".dat")?;
        let created_at = parse_backup_timestamp(stem)?;

        let size_bytes = fs::metadata(path).ok()?.len();
        let record_count = read_snapshot(path, self.capacity).records.len();

        Some(BackupInfo {
            filename,
            path: path.to_path_buf(),
            created_at,
            size_bytes,
            record_count,
        })
    }

    /// Delete all but the newest `max_backups` backups
    pub fn enforce_retention(&self) -> ParkingResult<Vec<PathBuf>> {
        let mut deleted = Vec::new();

        for backup in self
            .list_backups()?
            .into_iter()
            .skip(self.retention.max_backups)
        {
            fs::remove_file(&backup.path).map_err(|e| {
                ParkingError::Backup(format!("Failed to delete old backup: {}", e))
            })?;
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get the most recent backup
    pub fn get_latest_backup(&self) -> ParkingResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Parse `YYYYMMDD-HHMMSS-mmm`, optionally followed by `-N`
fn parse_backup_timestamp(stem: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = stem.split('-').collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }

    let millis: i64 = parts[2].parse().ok()?;
    if parts[2].len() != 3 {
        return None;
    }

    let naive =
        NaiveDateTime::parse_from_str(&format!("{}{}", parts[0], parts[1]), "%Y%m%d%H%M%S")
            .ok()?;
    Some(naive.and_utc() + chrono::Duration::milliseconds(millis))
}

/// The `-N` suffix given to a backup taken in an already used millisecond
fn backup_sequence(filename: &str) -> u32 {
    filename
        .trim_end_matches(".dat")
        .split('-')
        .nth(4)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, ParkingRecord, RecordId, VehicleNumber, VehicleType};
    use crate::storage::snapshot::write_snapshot_atomic;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_manager(max_backups: usize) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let mut settings = Settings::default();
        settings.backup_retention.max_backups = max_backups;

        (BackupManager::new(paths, &settings), temp_dir)
    }

    fn write_records(manager: &BackupManager, count: u32) {
        let entry = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let records: Vec<ParkingRecord> = (1..=count)
            .map(|i| {
                ParkingRecord::new(
                    RecordId::new(i),
                    VehicleType::Car,
                    VehicleNumber::new(format!("KA-{}", i)).unwrap(),
                    entry,
                    Money::from_units(50),
                )
            })
            .collect();
        write_snapshot_atomic(manager.paths.snapshot_file(), &records).unwrap();
    }

    #[test]
    fn test_create_backup_copies_snapshot() {
        let (manager, _temp) = create_test_manager(30);
        write_records(&manager, 2);

        let backup_path = manager.create_backup().unwrap();
        let filename = backup_path.file_name().unwrap().to_string_lossy().to_string();
        assert!(filename.starts_with("parking-"));
        assert!(filename.ends_with(".dat"));
        assert_eq!(
            fs::read(&backup_path).unwrap(),
            fs::read(manager.paths.snapshot_file()).unwrap()
        );
    }

    #[test]
    fn test_create_backup_without_snapshot() {
        let (manager, _temp) = create_test_manager(30);

        let backup_path = manager.create_backup().unwrap();
        assert_eq!(fs::read(&backup_path).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_list_backups() {
        let (manager, _temp) = create_test_manager(30);
        write_records(&manager, 3);

        manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        manager.create_backup().unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups[0].created_at >= backups[1].created_at);
        assert_eq!(backups[0].record_count, 3);
        assert_eq!(backups[0].size_bytes, 4 + 3 * 64);
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let (manager, _temp) = create_test_manager(30);
        fs::write(manager.backup_dir().join("notes.txt"), "hi").unwrap();
        fs::write(manager.backup_dir().join("parking-garbage.dat"), "x").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager(3);

        for _ in 0..5 {
            manager.create_backup().unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let remaining = manager.list_backups().unwrap();
        assert_eq!(remaining.len(), 3);
    }

    #[test]
    fn test_same_millisecond_names_do_not_collide() {
        let (manager, _temp) = create_test_manager(30);
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();

        let first = manager.unused_backup_path(now);
        fs::write(&first, [0u8; 4]).unwrap();
        let second = manager.unused_backup_path(now);

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("parking-20240506-070809-000-1.dat"));
    }

    #[test]
    fn test_backup_sequence() {
        assert_eq!(backup_sequence("parking-20240506-070809-000.dat"), 0);
        assert_eq!(backup_sequence("parking-20240506-070809-000-2.dat"), 2);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let ts = parse_backup_timestamp("20240115-143022-123").unwrap();
        assert_eq!(
            ts,
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 22).unwrap()
                + chrono::Duration::milliseconds(123)
        );
        assert!(parse_backup_timestamp("20240115-143022-123-2").is_some());
        assert!(parse_backup_timestamp("20240115").is_none());
        assert!(parse_backup_timestamp("2024-01-15").is_none());
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager(30);
        assert!(manager.get_latest_backup().unwrap().is_none());

        manager.create_backup().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newest = manager.create_backup().unwrap();

        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, newest);
    }
}
