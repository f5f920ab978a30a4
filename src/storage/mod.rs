//! Storage layer for the parking ledger
//!
//! Provides the binary snapshot codec, the record repository and the
//! coordinator that ties them to the audit log.

pub mod records;
pub mod snapshot;

pub use records::{LoadReport, RecordRepository};
pub use snapshot::{read_snapshot, write_snapshot_atomic, DecodedSnapshot, SnapshotAnomaly};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::ParkingPaths;
use crate::config::settings::Settings;
use crate::error::ParkingError;

/// Main storage coordinator
pub struct Storage {
    paths: ParkingPaths,
    pub records: RecordRepository,
    audit: AuditLogger,
    audit_warnings: Vec<String>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: ParkingPaths, settings: &Settings) -> Result<Self, ParkingError> {
        paths.ensure_directories()?;

        Ok(Self {
            records: RecordRepository::new(
                paths.snapshot_file(),
                settings.capacity,
                settings.snapshot_policy,
            ),
            audit: AuditLogger::new(paths.audit_log()),
            audit_warnings: Vec::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &ParkingPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Keep an audit failure that happened after the snapshot was saved
    pub(crate) fn note_audit_failure(&mut self, err: ParkingError) {
        self.audit_warnings.push(format!("Audit entry was not written: {}", err));
    }

    /// Drain audit failures noted since the last call
    pub fn take_audit_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.audit_warnings)
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<LoadReport, ParkingError> {
        self.records.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ParkingError> {
        self.records.save()
    }

    /// Append a create entry to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ParkingError> {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
        self.audit.log(&entry)
    }

    /// Append an update entry with a field diff to the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), ParkingError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff);
        self.audit.log(&entry)
    }
}
