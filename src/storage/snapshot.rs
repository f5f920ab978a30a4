//! Binary snapshot codec
//!
//! Layout (little-endian, fixed-size, no header, no checksum):
//!
//! ```text
//!   [0..4]    record count (i32)
//!   then `count` blocks of 64 bytes:
//!   [0..4]    id (i32)
//!   [4..8]    vehicle type code (i32, 1=Bike 2=Car 3=Bus 4=Truck)
//!   [8..28]   vehicle number, NUL padded, at most 19 visible bytes
//!   [28..32]  padding
//!   [32..40]  entry time (i64, Unix seconds)
//!   [40..48]  exit time (i64, Unix seconds, 0 = still parked)
//!   [48..56]  entry fee (f64)
//!   [56..64]  total fee (f64)
//! ```
//!
//! The block matches the in-memory layout of the record struct of the
//! x86-64 build that created the original files, so existing
//! `parking_records.dat` files load unchanged.

use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::ParkingError;
use crate::models::{Money, ParkingRecord, RecordId, VehicleNumber, VehicleType};

/// Size of the leading record count
pub const COUNT_SIZE: usize = 4;

/// Size of one record block
pub const RECORD_SIZE: usize = 64;

const NUMBER_OFFSET: usize = 8;
const NUMBER_FIELD_LEN: usize = 20;
const ENTRY_TIME_OFFSET: usize = 32;
const EXIT_TIME_OFFSET: usize = 40;
const ENTRY_FEE_OFFSET: usize = 48;
const TOTAL_FEE_OFFSET: usize = 56;

/// Something unexpected found while decoding a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotAnomaly {
    /// The file exists but could not be read
    Unreadable(String),
    /// The file is too short to hold the record count
    MissingCount { len: usize },
    /// The declared record count is negative
    NegativeCount(i32),
    /// The declared record count is above the store capacity
    CountExceedsCapacity { declared: usize, capacity: usize },
    /// The file ends before the declared number of blocks
    Truncated { declared: usize, complete: usize },
    /// A block could not be turned into a record
    InvalidBlock { index: usize, reason: String },
}

impl fmt::Display for SnapshotAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(e) => write!(f, "snapshot could not be read: {}", e),
            Self::MissingCount { len } => {
                write!(f, "snapshot is {} bytes, too short for a record count", len)
            }
            Self::NegativeCount(count) => write!(f, "declared record count {} is negative", count),
            Self::CountExceedsCapacity { declared, capacity } => write!(
                f,
                "declared record count {} exceeds capacity {}; trailing records dropped",
                declared, capacity
            ),
            Self::Truncated { declared, complete } => write!(
                f,
                "snapshot declares {} records but holds only {} complete blocks",
                declared, complete
            ),
            Self::InvalidBlock { index, reason } => {
                write!(f, "record block {} skipped: {}", index, reason)
            }
        }
    }
}

/// Records decoded from a snapshot together with everything that looked wrong
#[derive(Debug, Clone, Default)]
pub struct DecodedSnapshot {
    pub records: Vec<ParkingRecord>,
    pub anomalies: Vec<SnapshotAnomaly>,
}

impl DecodedSnapshot {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Encode the full record set
pub fn encode_snapshot(records: &[ParkingRecord]) -> Result<Vec<u8>, ParkingError> {
    let count = i32::try_from(records.len()).map_err(|_| {
        ParkingError::PersistenceFailure(format!(
            "{} records do not fit the snapshot count field",
            records.len()
        ))
    })?;

    let mut out = Vec::with_capacity(COUNT_SIZE + records.len() * RECORD_SIZE);
    out.extend_from_slice(&count.to_le_bytes());
    for record in records {
        encode_record(record, &mut out)?;
    }
    Ok(out)
}

/// Append one 64-byte record block
pub fn encode_record(record: &ParkingRecord, out: &mut Vec<u8>) -> Result<(), ParkingError> {
    let id = i32::try_from(record.id.value()).map_err(|_| {
        ParkingError::PersistenceFailure(format!(
            "record id {} does not fit the snapshot",
            record.id
        ))
    })?;

    let mut block = [0u8; RECORD_SIZE];
    block[0..4].copy_from_slice(&id.to_le_bytes());
    block[4..8].copy_from_slice(&record.vehicle_type.code().to_le_bytes());

    // VehicleNumber guarantees at most 19 bytes, leaving room for the terminator.
    let number = record.vehicle_number.as_str().as_bytes();
    block[NUMBER_OFFSET..NUMBER_OFFSET + number.len()].copy_from_slice(number);

    let entry = record.entry_time.timestamp();
    let exit = record.exit_time.map(|t| t.timestamp()).unwrap_or(0);
    block[ENTRY_TIME_OFFSET..ENTRY_TIME_OFFSET + 8].copy_from_slice(&entry.to_le_bytes());
    block[EXIT_TIME_OFFSET..EXIT_TIME_OFFSET + 8].copy_from_slice(&exit.to_le_bytes());
    block[ENTRY_FEE_OFFSET..ENTRY_FEE_OFFSET + 8]
        .copy_from_slice(&record.entry_fee.to_f64().to_le_bytes());
    block[TOTAL_FEE_OFFSET..TOTAL_FEE_OFFSET + 8]
        .copy_from_slice(&record.total_fee.to_f64().to_le_bytes());

    out.extend_from_slice(&block);
    Ok(())
}

/// Decode a snapshot, keeping every record that can be read
///
/// Never fails: a negative count yields an empty set, an oversized count is
/// truncated to `capacity`, and unreadable blocks are skipped. Each of
/// these is reported in [`DecodedSnapshot::anomalies`].
pub fn decode_snapshot(bytes: &[u8], capacity: usize) -> DecodedSnapshot {
    let mut decoded = DecodedSnapshot::default();

    if bytes.is_empty() {
        return decoded;
    }
    if bytes.len() < COUNT_SIZE {
        decoded
            .anomalies
            .push(SnapshotAnomaly::MissingCount { len: bytes.len() });
        return decoded;
    }

    let declared = read_i32(bytes, 0);
    if declared < 0 {
        decoded.anomalies.push(SnapshotAnomaly::NegativeCount(declared));
        return decoded;
    }

    let declared = declared as usize;
    let mut count = declared;
    if count > capacity {
        decoded.anomalies.push(SnapshotAnomaly::CountExceedsCapacity {
            declared,
            capacity,
        });
        count = capacity;
    }

    let body = &bytes[COUNT_SIZE..];
    let complete = body.len() / RECORD_SIZE;
    if complete < count {
        decoded.anomalies.push(SnapshotAnomaly::Truncated {
            declared: count,
            complete,
        });
        count = complete;
    }

    for (index, block) in body.chunks_exact(RECORD_SIZE).take(count).enumerate() {
        match decode_record(block) {
            Ok(record) => decoded.records.push(record),
            Err(reason) => decoded
                .anomalies
                .push(SnapshotAnomaly::InvalidBlock { index, reason }),
        }
    }

    decoded
}

/// Decode a single 64-byte block
pub fn decode_record(block: &[u8]) -> Result<ParkingRecord, String> {
    if block.len() != RECORD_SIZE {
        return Err(format!("block is {} bytes, expected {}", block.len(), RECORD_SIZE));
    }

    let id = read_i32(block, 0);
    if id <= 0 {
        return Err(format!("id {} is not positive", id));
    }

    let code = read_i32(block, 4);
    let vehicle_type =
        VehicleType::from_code(code).ok_or_else(|| format!("unknown vehicle type code {}", code))?;

    let field = &block[NUMBER_OFFSET..NUMBER_OFFSET + NUMBER_FIELD_LEN];
    let len = field
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| "vehicle number is not terminated".to_string())?;
    let number = std::str::from_utf8(&field[..len])
        .map_err(|e| format!("vehicle number is not valid UTF-8: {}", e))?;
    let vehicle_number = VehicleNumber::new(number).map_err(|e| e.to_string())?;

    let entry_secs = read_i64(block, ENTRY_TIME_OFFSET);
    let entry_time = timestamp(entry_secs)
        .ok_or_else(|| format!("entry time {} is out of range", entry_secs))?;

    let exit_secs = read_i64(block, EXIT_TIME_OFFSET);
    let exit_time = if exit_secs == 0 {
        None
    } else {
        Some(
            timestamp(exit_secs)
                .ok_or_else(|| format!("exit time {} is out of range", exit_secs))?,
        )
    };

    Ok(ParkingRecord {
        id: RecordId::new(id as u32),
        vehicle_type,
        vehicle_number,
        entry_time,
        exit_time,
        entry_fee: Money::from_f64(read_f64(block, ENTRY_FEE_OFFSET)),
        total_fee: Money::from_f64(read_f64(block, TOTAL_FEE_OFFSET)),
    })
}

/// Read and decode the snapshot file
///
/// An absent file decodes as an empty snapshot. A file that exists but
/// cannot be read also decodes as empty, with an `Unreadable` anomaly.
pub fn read_snapshot<P: AsRef<Path>>(path: P, capacity: usize) -> DecodedSnapshot {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => decode_snapshot(&bytes, capacity),
        Err(e) if e.kind() == ErrorKind::NotFound => DecodedSnapshot::default(),
        Err(e) => DecodedSnapshot {
            records: Vec::new(),
            anomalies: vec![SnapshotAnomaly::Unreadable(format!(
                "{}: {}",
                path.display(),
                e
            ))],
        },
    }
}

/// Write the snapshot atomically (write to temp, then rename)
pub fn write_snapshot_atomic<P: AsRef<Path>>(
    path: P,
    records: &[ParkingRecord],
) -> Result<(), ParkingError> {
    let path = path.as_ref();
    let bytes = encode_snapshot(records)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ParkingError::PersistenceFailure(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_path = path.with_extension("dat.tmp");

    let mut file = File::create(&temp_path).map_err(|e| {
        ParkingError::PersistenceFailure(format!("Failed to create temp file: {}", e))
    })?;

    file.write_all(&bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ParkingError::PersistenceFailure(format!("Failed to write snapshot: {}", e))
        })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        ParkingError::PersistenceFailure(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn read_i32(bytes: &[u8], offset: usize) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    i32::from_le_bytes(buf)
}

fn read_i64(bytes: &[u8], offset: usize) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    i64::from_le_bytes(buf)
}

fn read_f64(bytes: &[u8], offset: usize) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    f64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn record(id: u32, number: &str, exited: bool) -> ParkingRecord {
        let entry = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let mut record = ParkingRecord::new(
            RecordId::new(id),
            VehicleType::Bus,
            VehicleNumber::new(number).unwrap(),
            entry,
            Money::from_units(100),
        );
        if exited {
            record.close(entry + chrono::Duration::minutes(150), Money::from_units(250));
        }
        record
    }

    #[test]
    fn test_block_layout() {
        let mut out = Vec::new();
        encode_record(&record(3, "KA-01", true), &mut out).unwrap();

        assert_eq!(out.len(), RECORD_SIZE);
        assert_eq!(&out[0..4], &3i32.to_le_bytes());
        assert_eq!(&out[4..8], &3i32.to_le_bytes());
        assert_eq!(&out[8..13], b"KA-01");
        assert!(out[13..32].iter().all(|&b| b == 0));
        assert_eq!(&out[48..56], &100.0f64.to_le_bytes());
        assert_eq!(&out[56..64], &250.0f64.to_le_bytes());
    }

    #[test]
    fn test_active_record_writes_zero_exit_time() {
        let mut out = Vec::new();
        encode_record(&record(1, "X", false), &mut out).unwrap();
        assert_eq!(&out[40..48], &0i64.to_le_bytes());

        let decoded = decode_record(&out).unwrap();
        assert_eq!(decoded.exit_time, None);
    }

    #[test]
    fn test_snapshot_decodes_field_for_field() {
        let records = vec![record(1, "A-1", true), record(2, "B-2", false)];
        let bytes = encode_snapshot(&records).unwrap();
        assert_eq!(bytes.len(), COUNT_SIZE + 2 * RECORD_SIZE);

        let decoded = decode_snapshot(&bytes, 1000);
        assert!(decoded.is_clean());
        assert_eq!(decoded.records, records);
    }

    #[test]
    fn test_empty_input_is_empty_store() {
        let decoded = decode_snapshot(&[], 1000);
        assert!(decoded.records.is_empty());
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_negative_count() {
        let decoded = decode_snapshot(&(-5i32).to_le_bytes(), 1000);
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.anomalies, vec![SnapshotAnomaly::NegativeCount(-5)]);
    }

    #[test]
    fn test_count_above_capacity_is_truncated() {
        let records: Vec<_> = (1..=5).map(|i| record(i, &format!("V{}", i), false)).collect();
        let bytes = encode_snapshot(&records).unwrap();

        let decoded = decode_snapshot(&bytes, 3);
        assert_eq!(decoded.records.len(), 3);
        assert_eq!(decoded.records[2].id, RecordId::new(3));
        assert_eq!(
            decoded.anomalies,
            vec![SnapshotAnomaly::CountExceedsCapacity {
                declared: 5,
                capacity: 3
            }]
        );
    }

    #[test]
    fn test_truncated_file_keeps_complete_blocks() {
        let records = vec![record(1, "A", false), record(2, "B", false)];
        let mut bytes = encode_snapshot(&records).unwrap();
        bytes.truncate(COUNT_SIZE + RECORD_SIZE + 10);

        let decoded = decode_snapshot(&bytes, 1000);
        assert_eq!(decoded.records.len(), 1);
        assert!(matches!(
            decoded.anomalies[0],
            SnapshotAnomaly::Truncated {
                declared: 2,
                complete: 1
            }
        ));
    }

    #[test]
    fn test_invalid_type_code_skips_block() {
        let records = vec![record(1, "A", false), record(2, "B", false)];
        let mut bytes = encode_snapshot(&records).unwrap();
        let offset = COUNT_SIZE + 4;
        bytes[offset..offset + 4].copy_from_slice(&9i32.to_le_bytes());

        let decoded = decode_snapshot(&bytes, 1000);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].id, RecordId::new(2));
        assert!(matches!(
            decoded.anomalies[0],
            SnapshotAnomaly::InvalidBlock { index: 0, .. }
        ));
    }

    #[test]
    fn test_unterminated_number_is_invalid() {
        let mut out = Vec::new();
        encode_record(&record(1, "A", false), &mut out).unwrap();
        for b in &mut out[8..28] {
            *b = b'Z';
        }
        assert!(decode_record(&out).is_err());
    }

    #[test]
    fn test_read_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let decoded = read_snapshot(temp_dir.path().join("none.dat"), 1000);
        assert!(decoded.records.is_empty());
        assert!(decoded.is_clean());
    }

    #[test]
    fn test_read_directory_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let decoded = read_snapshot(temp_dir.path(), 1000);
        assert!(decoded.records.is_empty());
        assert!(matches!(decoded.anomalies[0], SnapshotAnomaly::Unreadable(_)));
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("parking_records.dat");

        write_snapshot_atomic(&path, &[record(1, "A", true)]).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("dat.tmp").exists());
        assert_eq!(read_snapshot(&path, 1000).records.len(), 1);
    }

    #[test]
    fn test_write_over_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("taken");
        fs::create_dir(&path).unwrap();

        let err = write_snapshot_atomic(&path, &[]).unwrap_err();
        assert!(err.is_persistence_failure());
        assert!(!path.with_extension("dat.tmp").exists());
    }
}
