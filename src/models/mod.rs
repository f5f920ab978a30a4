//! Core data models for the parking ledger
//!
//! This module contains the data structures of the parking domain:
//! vehicles, parking records, ids and fee amounts.

pub mod ids;
pub mod money;
pub mod record;
pub mod vehicle;

pub use ids::RecordId;
pub use money::Money;
pub use record::ParkingRecord;
pub use vehicle::{VehicleNumber, VehicleNumberError, VehicleType, MAX_VEHICLE_NUMBER_LEN};
