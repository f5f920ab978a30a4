//! Backup restoration
//!
//! A backup only becomes the live snapshot if it decodes without a single
//! anomaly. The snapshot it replaces is backed up first.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ParkingError, ParkingResult};
use crate::storage::snapshot::{decode_snapshot, write_snapshot_atomic};

use super::manager::BackupManager;

/// Outcome of a restore
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// The backup that is now live
    pub restored_from: PathBuf,
    pub records_restored: usize,
    /// Backup of the snapshot that was live before the restore
    pub previous_snapshot: Option<PathBuf>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Restored {} record(s) from {}",
            self.records_restored,
            self.restored_from.display()
        );
        if let Some(previous) = &self.previous_snapshot {
            out.push_str(&format!(
                "\nPrevious snapshot saved as {}",
                previous.display()
            ));
        }
        out
    }
}

impl BackupManager {
    /// Replace the live snapshot with a backup
    ///
    /// The caller must reload its `Storage` afterwards.
    pub fn restore_backup(&self, backup_path: &Path) -> ParkingResult<RestoreResult> {
        let bytes = fs::read(backup_path).map_err(|e| {
            ParkingError::Backup(format!(
                "Failed to read backup {}: {}",
                backup_path.display(),
                e
            ))
        })?;

        let decoded = decode_snapshot(&bytes, self.capacity);
        if let Some(anomaly) = decoded.anomalies.first() {
            return Err(ParkingError::CorruptSnapshot(format!(
                "{}: {}",
                backup_path.display(),
                anomaly
            )));
        }

        let previous_snapshot = if self.paths.snapshot_file().exists() {
            Some(self.create_backup()?)
        } else {
            None
        };

        write_snapshot_atomic(self.paths.snapshot_file(), &decoded.records)?;

        Ok(RestoreResult {
            restored_from: backup_path.to_path_buf(),
            records_restored: decoded.records.len(),
            previous_snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::backup::BackupManager;
    use crate::config::{ParkingPaths, Settings};
    use crate::models::{Money, ParkingRecord, RecordId, VehicleNumber, VehicleType};
    use crate::storage::snapshot::{read_snapshot, write_snapshot_atomic};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (BackupManager, ParkingPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let manager = BackupManager::new(paths.clone(), &Settings::default());
        (manager, paths, temp_dir)
    }

    fn records(numbers: &[&str]) -> Vec<ParkingRecord> {
        let entry = Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap();
        numbers
            .iter()
            .enumerate()
            .map(|(i, n)| {
                ParkingRecord::new(
                    RecordId::new(i as u32 + 1),
                    VehicleType::Bike,
                    VehicleNumber::new(*n).unwrap(),
                    entry,
                    Money::from_units(20),
                )
            })
            .collect()
    }

    #[test]
    fn test_restore_round_trip() {
        let (manager, paths, _temp) = setup();
        write_snapshot_atomic(paths.snapshot_file(), &records(&["A-1", "B-2"])).unwrap();
        let backup = manager.create_backup().unwrap();

        write_snapshot_atomic(paths.snapshot_file(), &records(&["C-3"])).unwrap();

        let result = manager.restore_backup(&backup).unwrap();
        assert_eq!(result.records_restored, 2);
        assert!(result.previous_snapshot.is_some());

        let live = read_snapshot(paths.snapshot_file(), 1000);
        assert!(live.is_clean());
        assert_eq!(live.records, records(&["A-1", "B-2"]));

        let previous = read_snapshot(result.previous_snapshot.unwrap(), 1000);
        assert_eq!(previous.records, records(&["C-3"]));
    }

    #[test]
    fn test_restore_rejects_truncated_backup() {
        let (manager, paths, _temp) = setup();
        write_snapshot_atomic(paths.snapshot_file(), &records(&["LIVE"])).unwrap();

        let bad = manager.backup_dir().join("parking-20240101-000000-000.dat");
        let mut bytes = 2i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 10]);
        fs::write(&bad, bytes).unwrap();

        let err = manager.restore_backup(&bad).unwrap_err();
        assert!(matches!(err, crate::error::ParkingError::CorruptSnapshot(_)));

        // Live snapshot untouched
        let live = read_snapshot(paths.snapshot_file(), 1000);
        assert_eq!(live.records, records(&["LIVE"]));
    }

    #[test]
    fn test_restore_missing_backup() {
        let (manager, _paths, temp) = setup();
        let err = manager
            .restore_backup(&temp.path().join("nope.dat"))
            .unwrap_err();
        assert!(matches!(err, crate::error::ParkingError::Backup(_)));
    }

    #[test]
    fn test_restore_without_live_snapshot() {
        let (manager, paths, _temp) = setup();
        let backup = manager.backup_dir().join("parking-20240101-000000-000.dat");
        write_snapshot_atomic(&backup, &records(&["X"])).unwrap();

        let result = manager.restore_backup(&backup).unwrap();
        assert!(result.previous_snapshot.is_none());
        assert!(result.summary().contains("Restored 1 record(s)"));
        assert!(paths.snapshot_file().exists());
    }
}
