//! CSV export functionality
//!
//! One row per record in id order. An absent exit time is an empty cell.

use std::io::Write;

use crate::error::ParkingResult;
use crate::storage::Storage;

use super::export_error;
use super::json::ExportRow;

/// Export every record to CSV
pub fn export_records_csv<W: Write>(storage: &Storage, writer: &mut W) -> ParkingResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    for record in storage.records.iter_all() {
        csv_writer
            .serialize(ExportRow::from(record))
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParkingPaths, Settings};
    use crate::models::VehicleType;
    use crate::services::{FixedClock, ParkingService};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_csv_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths, &Settings::default()).unwrap();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap());
        {
            let mut service = ParkingService::new(&mut storage, &clock);
            service.register(VehicleType::Truck, "TR, 1").unwrap();
            service.register(VehicleType::Car, "CAR-2").unwrap();
            clock.advance(Duration::hours(3));
            service.exit("TR, 1").unwrap();
        }

        let mut out = Vec::new();
        export_records_csv(&storage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,vehicle_type,vehicle_number,entry_time,exit_time,entry_fee,total_fee,status"
        );
        assert_eq!(
            lines[1],
            "1,Truck,\"TR, 1\",2024-02-01T10:00:00Z,2024-02-01T13:00:00Z,120.0,300.0,exited"
        );
        assert_eq!(lines[2], "2,Car,CAR-2,2024-02-01T10:00:00Z,,50.0,0.0,parked");
    }

    #[test]
    fn test_empty_export_has_no_rows() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParkingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();

        let mut out = Vec::new();
        export_records_csv(&storage, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
