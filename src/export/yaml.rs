//! YAML export functionality

use std::io::Write;

use crate::error::ParkingResult;
use crate::export::json::FullExport;
use crate::storage::Storage;

use super::export_error;

/// Export the full history as YAML with a comment header
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> ParkingResult<()> {
    let export = FullExport::from_storage(storage);

    writeln!(writer, "# Parking Ledger Export").map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)?;

    Ok(())
}
