//! Parking record CLI commands
//!
//! `entry` is open to anyone; the others are run only after an admin login
//! in `main`.

use crate::config::settings::Settings;
use crate::display::{
    format_entry_receipt, format_exit_receipt, format_record_details, format_record_table,
    format_summary, Columns,
};
use crate::error::{ParkingError, ParkingResult};
use crate::models::VehicleType;
use crate::services::{Clock, ParkingService};
use crate::storage::Storage;

/// Register a vehicle entry
///
/// `vehicle_type` is a name (`bike`, `car`, `bus`, `truck`) or a code 1-4.
pub fn handle_entry(
    storage: &mut Storage,
    clock: &dyn Clock,
    settings: &Settings,
    vehicle_type: &str,
    vehicle_number: &str,
) -> ParkingResult<()> {
    let Some(vehicle_type) = VehicleType::parse(vehicle_type) else {
        if storage.records.is_full() {
            return Err(ParkingError::CapacityExceeded {
                capacity: storage.records.capacity(),
            });
        }
        return Err(ParkingError::InvalidInput(format!(
            "Unknown vehicle type '{}'. Use bike, car, bus, truck or 1-4",
            vehicle_type
        )));
    };

    let record = ParkingService::new(storage, clock).register(vehicle_type, vehicle_number)?;
    print!("{}", format_entry_receipt(&record, &settings.date_format));
    report_audit_warnings(storage);
    Ok(())
}

/// Process a vehicle exit and print the receipt
pub fn handle_exit(
    storage: &mut Storage,
    clock: &dyn Clock,
    settings: &Settings,
    vehicle_number: &str,
) -> ParkingResult<()> {
    let record = ParkingService::new(storage, clock).exit(vehicle_number)?;
    print!("{}", format_exit_receipt(&record, &settings.date_format));
    report_audit_warnings(storage);
    Ok(())
}

fn report_audit_warnings(storage: &mut Storage) {
    for warning in storage.take_audit_warnings() {
        eprintln!("Warning: {}", warning);
    }
}

/// List currently parked vehicles
pub fn handle_parked(storage: &Storage, settings: &Settings) -> ParkingResult<()> {
    println!(
        "{}",
        format_record_table(
            storage.records.iter_active(),
            Columns::Active,
            &settings.date_format
        )
        .trim_end()
    );
    Ok(())
}

/// List every record
pub fn handle_history(storage: &Storage, settings: &Settings) -> ParkingResult<()> {
    println!(
        "{}",
        format_record_table(storage.records.iter_all(), Columns::Full, &settings.date_format)
            .trim_end()
    );
    Ok(())
}

pub fn handle_search(
    storage: &Storage,
    settings: &Settings,
    vehicle_number: &str,
) -> ParkingResult<()> {
    let found = storage.records.search(vehicle_number);

    if found.is_empty() {
        println!("No record found for this vehicle number.");
        return Ok(());
    }

    for (i, record) in found.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", format_record_details(record, &settings.date_format));
    }
    Ok(())
}

/// Occupancy and takings
pub fn handle_status(storage: &mut Storage, clock: &dyn Clock) -> ParkingResult<()> {
    let summary = ParkingService::new(storage, clock).summary();
    print!("{}", format_summary(&summary));
    Ok(())
}
