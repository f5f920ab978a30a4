//! Export module for the parking ledger
//!
//! Writes the full record history in three formats:
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: machine-readable export with metadata
//! - YAML: human-readable export with metadata

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_records_csv;
pub use json::{export_full_json, ExportRow, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;

use std::io::Write;

use crate::error::{ParkingError, ParkingResult};
use crate::storage::Storage;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Export every record in the chosen format
pub fn export_records<W: Write>(
    storage: &Storage,
    format: ExportFormat,
    writer: &mut W,
) -> ParkingResult<()> {
    match format {
        ExportFormat::Csv => export_records_csv(storage, writer),
        ExportFormat::Json => export_full_json(storage, writer),
        ExportFormat::Yaml => export_full_yaml(storage, writer),
    }
}

pub(crate) fn export_error(e: impl std::fmt::Display) -> ParkingError {
    ParkingError::Export(e.to_string())
}
