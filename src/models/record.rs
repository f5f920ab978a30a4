//! Parking record model
//!
//! One record per parking session. A record is created by entry
//! registration and mutated exactly once, when the vehicle exits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecordId;
use super::money::Money;
use super::vehicle::{VehicleNumber, VehicleType};

/// A single parking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingRecord {
    /// Ticket id
    pub id: RecordId,

    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,

    pub vehicle_number: VehicleNumber,

    /// When the vehicle was registered
    pub entry_time: DateTime<Utc>,

    /// When the vehicle left; `None` while still parked
    pub exit_time: Option<DateTime<Utc>>,

    /// Fee captured at entry from the vehicle type
    pub entry_fee: Money,

    /// Zero until exit
    pub total_fee: Money,
}

impl ParkingRecord {
    /// Create an active record
    pub fn new(
        id: RecordId,
        vehicle_type: VehicleType,
        vehicle_number: VehicleNumber,
        entry_time: DateTime<Utc>,
        entry_fee: Money,
    ) -> Self {
        Self {
            id,
            vehicle_type,
            vehicle_number,
            entry_time,
            exit_time: None,
            entry_fee,
            total_fee: Money::zero(),
        }
    }

    /// Whether the vehicle is still parked
    pub fn is_active(&self) -> bool {
        self.exit_time.is_none()
    }

    /// Record the exit; a record that already exited is left untouched
    ///
    /// Returns `false` when the record had already exited.
    pub fn close(&mut self, exit_time: DateTime<Utc>, total_fee: Money) -> bool {
        if !self.is_active() {
            return false;
        }
        self.exit_time = Some(exit_time);
        self.total_fee = total_fee;
        true
    }

    /// Status label used in listings and exports
    pub fn status(&self) -> &'static str {
        if self.is_active() {
            "parked"
        } else {
            "exited"
        }
    }
}

impl fmt::Display for ParkingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({})",
            self.id, self.vehicle_number, self.vehicle_type
        )
    }
}
