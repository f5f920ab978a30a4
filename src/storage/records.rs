//! Parking record repository
//!
//! Holds the ordered record set in memory and mirrors it to the binary
//! snapshot file. Insertion order equals id order, and every listing
//! preserves it.

use std::path::{Path, PathBuf};

use crate::config::settings::SnapshotPolicy;
use crate::error::ParkingError;
use crate::models::{ParkingRecord, RecordId};

use super::snapshot::{read_snapshot, write_snapshot_atomic, SnapshotAnomaly};

/// What `load` found on disk
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of records now in memory
    pub loaded: usize,
    /// Problems that were worked around (lenient policy only)
    pub anomalies: Vec<SnapshotAnomaly>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Repository for parking record persistence
pub struct RecordRepository {
    path: PathBuf,
    capacity: usize,
    policy: SnapshotPolicy,
    records: Vec<ParkingRecord>,
}

impl RecordRepository {
    /// Create an empty repository backed by `path`
    pub fn new(path: PathBuf, capacity: usize, policy: SnapshotPolicy) -> Self {
        Self {
            path,
            capacity,
            policy,
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Replace the in-memory records with the snapshot on disk
    ///
    /// Under the lenient policy a missing, unreadable or malformed file never
    /// fails; whatever could be read is kept and the problems are returned
    /// in the report. Under the strict policy any problem fails with
    /// `CorruptSnapshot` and leaves the current records untouched.
    pub fn load(&mut self) -> Result<LoadReport, ParkingError> {
        let decoded = read_snapshot(&self.path, self.capacity);

        if self.policy == SnapshotPolicy::Strict && !decoded.is_clean() {
            let problems: Vec<String> = decoded.anomalies.iter().map(|a| a.to_string()).collect();
            return Err(ParkingError::CorruptSnapshot(format!(
                "{}: {}",
                self.path.display(),
                problems.join("; ")
            )));
        }

        self.records = decoded.records;
        Ok(LoadReport {
            loaded: self.records.len(),
            anomalies: decoded.anomalies,
        })
    }

    /// Write every record to the snapshot file
    pub fn save(&self) -> Result<(), ParkingError> {
        write_snapshot_atomic(&self.path, &self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether another record would exceed the capacity
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Id for the next record: highest existing id plus one
    pub fn next_id(&self) -> RecordId {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(RecordId::FIRST)
    }

    /// Index of the first active record with this vehicle number
    pub fn find_active(&self, vehicle_number: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.is_active() && r.vehicle_number == *vehicle_number)
    }

    /// Index of the first record with this vehicle number, active or not
    pub fn find_any(&self, vehicle_number: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.vehicle_number == *vehicle_number)
    }

    pub fn get(&self, index: usize) -> Option<&ParkingRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ParkingRecord> {
        self.records.get_mut(index)
    }

    /// Append a record, refusing once the store is full
    pub fn push(&mut self, record: ParkingRecord) -> Result<(), ParkingError> {
        if self.is_full() {
            return Err(ParkingError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Remove and return the most recently appended record
    pub(crate) fn pop(&mut self) -> Option<ParkingRecord> {
        self.records.pop()
    }

    /// All records in storage order
    pub fn iter_all(&self) -> impl Iterator<Item = &ParkingRecord> + '_ {
        self.records.iter()
    }

    /// Records whose vehicle is still parked, in storage order
    pub fn iter_active(&self) -> impl Iterator<Item = &ParkingRecord> + '_ {
        self.records.iter().filter(|r| r.is_active())
    }

    /// Every record with this exact vehicle number, in storage order
    pub fn search(&self, vehicle_number: &str) -> Vec<ParkingRecord> {
        self.records
            .iter()
            .filter(|r| r.vehicle_number == *vehicle_number)
            .cloned()
            .collect()
    }

    /// Number of records whose vehicle is still parked
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, VehicleNumber, VehicleType};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_repo(capacity: usize, policy: SnapshotPolicy) -> (TempDir, RecordRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("parking_records.dat");
        let repo = RecordRepository::new(path, capacity, policy);
        (temp_dir, repo)
    }

    fn record(id: u32, number: &str) -> ParkingRecord {
        ParkingRecord::new(
            RecordId::new(id),
            VehicleType::Car,
            VehicleNumber::new(number).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            Money::from_units(50),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        let report = repo.load().unwrap();
        assert_eq!(report.loaded, 0);
        assert!(report.is_clean());
        assert!(repo.is_empty());
        assert_eq!(repo.next_id(), RecordId::FIRST);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        repo.push(record(1, "A")).unwrap();
        repo.push(record(2, "B")).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("parking_records.dat");
        let mut repo2 = RecordRepository::new(path, 1000, SnapshotPolicy::Lenient);
        repo2.load().unwrap();

        let all: Vec<_> = repo2.iter_all().cloned().collect();
        let expected: Vec<_> = repo.iter_all().cloned().collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_full_store_survives_reload() {
        let (temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Strict);
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for i in 0..1000u32 {
            let vehicle_type = VehicleType::ALL[i as usize % VehicleType::ALL.len()];
            let entry_time = start + chrono::Duration::minutes(i64::from(i) * 7);
            let mut r = ParkingRecord::new(
                RecordId::new(i + 1),
                vehicle_type,
                VehicleNumber::new(&format!("BA-{}-PA-{:04}", i % 90, i)).unwrap(),
                entry_time,
                Money::from_units(10 * i64::from(vehicle_type.code())),
            );
            if i % 3 == 0 {
                r.close(
                    entry_time + chrono::Duration::minutes(95),
                    Money::from_units(10 * i64::from(vehicle_type.code()) + 40),
                );
            }
            repo.push(r).unwrap();
        }
        assert!(repo.is_full());
        repo.save().unwrap();

        let path = temp_dir.path().join("parking_records.dat");
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4 + 64 * 1000);

        let mut reloaded = RecordRepository::new(path, 1000, SnapshotPolicy::Strict);
        let report = reloaded.load().unwrap();
        assert_eq!(report.loaded, 1000);
        assert!(report.is_clean());
        assert_eq!(reloaded.active_count(), 666);

        let all: Vec<_> = reloaded.iter_all().cloned().collect();
        let expected: Vec<_> = repo.iter_all().cloned().collect();
        assert_eq!(all, expected);
        assert_eq!(reloaded.next_id(), RecordId::new(1001));
    }

    #[test]
    fn test_next_id_uses_max() {
        let (_temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        repo.push(record(5, "A")).unwrap();
        repo.push(record(2, "B")).unwrap();
        assert_eq!(repo.next_id(), RecordId::new(6));
    }

    #[test]
    fn test_find_active_and_any() {
        let (_temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        let mut first = record(1, "A");
        first.close(Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap(), Money::from_units(75));
        repo.push(first).unwrap();
        repo.push(record(2, "A")).unwrap();

        assert_eq!(repo.find_any("A"), Some(0));
        assert_eq!(repo.find_active("A"), Some(1));
        assert_eq!(repo.find_active("a"), None);
        assert_eq!(repo.find_any("Z"), None);
    }

    #[test]
    fn test_push_respects_capacity() {
        let (_temp_dir, mut repo) = create_test_repo(2, SnapshotPolicy::Lenient);
        repo.push(record(1, "A")).unwrap();
        repo.push(record(2, "B")).unwrap();

        let err = repo.push(record(3, "C")).unwrap_err();
        assert!(matches!(err, ParkingError::CapacityExceeded { capacity: 2 }));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_iterators_are_restartable() {
        let (_temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        let mut gone = record(1, "A");
        gone.close(Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap(), Money::from_units(75));
        repo.push(gone).unwrap();
        repo.push(record(2, "B")).unwrap();
        repo.push(record(3, "C")).unwrap();

        let first: Vec<_> = repo.iter_active().map(|r| r.id.value()).collect();
        let second: Vec<_> = repo.iter_active().map(|r| r.id.value()).collect();
        assert_eq!(first, vec![2, 3]);
        assert_eq!(first, second);
        assert_eq!(repo.iter_all().count(), 3);
        assert_eq!(repo.active_count(), 2);
    }

    #[test]
    fn test_search_returns_all_matches_in_order() {
        let (_temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        let mut gone = record(1, "A");
        gone.close(Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap(), Money::from_units(75));
        repo.push(gone).unwrap();
        repo.push(record(2, "B")).unwrap();
        repo.push(record(3, "A")).unwrap();

        let found: Vec<_> = repo.search("A").iter().map(|r| r.id.value()).collect();
        assert_eq!(found, vec![1, 3]);
        assert!(repo.search("missing").is_empty());
    }

    #[test]
    fn test_lenient_load_clamps_to_capacity() {
        let (temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        for i in 1..=4 {
            repo.push(record(i, &format!("V{}", i))).unwrap();
        }
        repo.save().unwrap();

        let path = temp_dir.path().join("parking_records.dat");
        let mut small = RecordRepository::new(path, 3, SnapshotPolicy::Lenient);
        let report = small.load().unwrap();
        assert_eq!(report.loaded, 3);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_strict_load_rejects_corrupt_snapshot() {
        let (temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Strict);
        let path = temp_dir.path().join("parking_records.dat");
        std::fs::write(&path, (-1i32).to_le_bytes()).unwrap();

        let err = repo.load().unwrap_err();
        assert!(matches!(err, ParkingError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_lenient_load_negative_count_is_empty() {
        let (temp_dir, mut repo) = create_test_repo(1000, SnapshotPolicy::Lenient);
        let path = temp_dir.path().join("parking_records.dat");
        std::fs::write(&path, (-1i32).to_le_bytes()).unwrap();

        let report = repo.load().unwrap();
        assert_eq!(report.loaded, 0);
        assert_eq!(report.anomalies.len(), 1);
    }
}
