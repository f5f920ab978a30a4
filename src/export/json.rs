//! JSON export functionality
//!
//! Exports the full record history with a small metadata header.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::ParkingResult;
use crate::models::ParkingRecord;
use crate::storage::Storage;

use super::export_error;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One record flattened for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub id: u32,
    pub vehicle_type: String,
    pub vehicle_number: String,
    /// RFC 3339, UTC
    pub entry_time: String,
    /// RFC 3339, UTC; absent while parked
    pub exit_time: Option<String>,
    pub entry_fee: f64,
    pub total_fee: f64,
    pub status: String,
}

impl From<&ParkingRecord> for ExportRow {
    fn from(record: &ParkingRecord) -> Self {
        Self {
            id: record.id.value(),
            vehicle_type: record.vehicle_type.to_string(),
            vehicle_number: record.vehicle_number.to_string(),
            entry_time: record.entry_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            exit_time: record
                .exit_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            entry_fee: record.entry_fee.to_f64(),
            total_fee: record.total_fee.to_f64(),
            status: record.status().to_string(),
        }
    }
}

/// Full history export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub metadata: ExportMetadata,
    pub records: Vec<ExportRow>,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,
    pub active_count: usize,
    /// Sum of total fees of exited records
    pub collected: f64,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> Self {
        let records: Vec<ExportRow> = storage.records.iter_all().map(ExportRow::from).collect();
        let collected = storage
            .records
            .iter_all()
            .filter(|r| !r.is_active())
            .map(|r| r.total_fee)
            .sum::<crate::models::Money>()
            .to_f64();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata: ExportMetadata {
                record_count: records.len(),
                active_count: storage.records.active_count(),
                collected,
            },
            records,
        }
    }
}

/// Export the full history as pretty-printed JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W) -> ParkingResult<()> {
    let export = FullExport::from_storage(storage);
    serde_json::to_writer_pretty(&mut *writer, &export).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;
    Ok(())
}
