//! CLI command for exporting the record history

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{ParkingError, ParkingResult};
use crate::export::{export_records, ExportFormat};
use crate::storage::Storage;

/// Write every record to `output`, or to stdout when no file is given
pub fn handle_export_command(
    storage: &Storage,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> ParkingResult<()> {
    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                ParkingError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            export_records(storage, format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| ParkingError::Export(format!("Failed to write export: {}", e)))?;

            println!(
                "Exported {} record(s) to: {}",
                storage.records.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export_records(storage, format, &mut writer)?;
        }
    }

    Ok(())
}
