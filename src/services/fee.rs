//! Fee engine
//!
//! Pure functions from vehicle type and elapsed time to charges. Any
//! started hour is billed as a full hour, with a one-hour minimum.

use chrono::{DateTime, Utc};

use crate::models::{Money, ParkingRecord, VehicleType};

const SECONDS_PER_HOUR: i64 = 3600;

/// Fixed fee charged when a vehicle is registered
pub const fn entry_fee(vehicle_type: VehicleType) -> Money {
    match vehicle_type {
        VehicleType::Bike => Money::from_units(20),
        VehicleType::Car => Money::from_units(50),
        VehicleType::Bus => Money::from_units(100),
        VehicleType::Truck => Money::from_units(120),
    }
}

/// Charge per billed hour
pub const fn hourly_rate(vehicle_type: VehicleType) -> Money {
    match vehicle_type {
        VehicleType::Bike => Money::from_units(10),
        VehicleType::Car => Money::from_units(25),
        VehicleType::Bus => Money::from_units(50),
        VehicleType::Truck => Money::from_units(60),
    }
}

/// Elapsed seconds between entry and exit, clamped to zero
pub fn elapsed_seconds(entry: DateTime<Utc>, exit: DateTime<Utc>) -> i64 {
    (exit - entry).num_seconds().max(0)
}

/// Hours to bill: elapsed time rounded up to whole hours, at least 1
pub fn billed_hours(entry: DateTime<Utc>, exit: DateTime<Utc>) -> i64 {
    let seconds = elapsed_seconds(entry, exit);
    let hours = seconds / SECONDS_PER_HOUR + i64::from(seconds % SECONDS_PER_HOUR != 0);
    hours.max(1)
}

/// Total charge for a record leaving at `exit`
///
/// Uses the entry fee captured on the record plus the hourly rate of its
/// vehicle type for every billed hour.
pub fn total_fee(record: &ParkingRecord, exit: DateTime<Utc>) -> Money {
    record.entry_fee + hourly_rate(record.vehicle_type) * billed_hours(record.entry_time, exit)
}
