//! Parking service
//!
//! Entry registration, exit processing and lookups. Every mutation is
//! persisted before the call returns; if the snapshot cannot be written
//! the in-memory change is undone so memory and disk stay in step.
//! Once the snapshot is saved the call succeeds; a failed audit write is
//! kept on `Storage` for the caller to report.

use crate::audit::EntityType;
use crate::error::{ParkingError, ParkingResult};
use crate::models::{Money, ParkingRecord, VehicleNumber, VehicleType};
use crate::storage::Storage;

use super::clock::Clock;
use super::fee;

/// Service for parking operations
pub struct ParkingService<'a> {
    storage: &'a mut Storage,
    clock: &'a dyn Clock,
}

/// Occupancy and takings at a glance
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingSummary {
    pub total_records: usize,
    pub active: usize,
    pub capacity: usize,
    /// Sum of total fees of exited records
    pub collected: Money,
}

impl<'a> ParkingService<'a> {
    pub fn new(storage: &'a mut Storage, clock: &'a dyn Clock) -> Self {
        Self { storage, clock }
    }

    /// Register an entry from a numeric vehicle-type code (1..=4)
    pub fn register_code(
        &mut self,
        code: i32,
        vehicle_number: &str,
    ) -> ParkingResult<ParkingRecord> {
        self.ensure_capacity()?;

        let vehicle_type = VehicleType::from_code(code).ok_or_else(|| {
            ParkingError::InvalidInput(format!(
                "Invalid vehicle type {}. Choose 1 (Bike), 2 (Car), 3 (Bus) or 4 (Truck)",
                code
            ))
        })?;

        self.register(vehicle_type, vehicle_number)
    }

    /// Register a vehicle entry
    pub fn register(
        &mut self,
        vehicle_type: VehicleType,
        vehicle_number: &str,
    ) -> ParkingResult<ParkingRecord> {
        self.ensure_capacity()?;

        let number = VehicleNumber::new(vehicle_number)
            .map_err(|e| ParkingError::InvalidInput(e.to_string()))?;

        if self.storage.records.find_active(number.as_str()).is_some() {
            return Err(ParkingError::duplicate_active(number.as_str()));
        }

        let record = ParkingRecord::new(
            self.storage.records.next_id(),
            vehicle_type,
            number,
            self.clock.now(),
            fee::entry_fee(vehicle_type),
        );

        self.storage.records.push(record.clone())?;
        if let Err(e) = self.storage.records.save() {
            self.storage.records.pop();
            return Err(e);
        }

        if let Err(e) = self.storage.log_create(
            EntityType::ParkingRecord,
            record.id.to_string(),
            Some(record.vehicle_number.to_string()),
            &record,
        ) {
            self.storage.note_audit_failure(e);
        }

        Ok(record)
    }

    /// Process the exit of a parked vehicle
    pub fn exit(&mut self, vehicle_number: &str) -> ParkingResult<ParkingRecord> {
        let index = self
            .storage
            .records
            .find_active(vehicle_number)
            .ok_or_else(|| ParkingError::no_active_entry(vehicle_number))?;

        let exit_time = self.clock.now();
        let before = self
            .storage
            .records
            .get(index)
            .cloned()
            .ok_or_else(|| ParkingError::no_active_entry(vehicle_number))?;

        let mut after = before.clone();
        after.close(exit_time, fee::total_fee(&before, exit_time));

        self.replace(index, after.clone());
        if let Err(e) = self.storage.records.save() {
            self.replace(index, before);
            return Err(e);
        }

        if let Err(e) = self.storage.log_update(
            EntityType::ParkingRecord,
            after.id.to_string(),
            Some(after.vehicle_number.to_string()),
            &before,
            &after,
        ) {
            self.storage.note_audit_failure(e);
        }

        Ok(after)
    }

    /// Index of the first active record for a vehicle number
    pub fn find_active(&self, vehicle_number: &str) -> Option<usize> {
        self.storage.records.find_active(vehicle_number)
    }

    /// Index of the first record for a vehicle number, active or not
    pub fn find_any(&self, vehicle_number: &str) -> Option<usize> {
        self.storage.records.find_any(vehicle_number)
    }

    /// Vehicles still parked, in id order
    pub fn list_active(&self) -> impl Iterator<Item = &ParkingRecord> + '_ {
        self.storage.records.iter_active()
    }

    /// Every record, in id order
    pub fn list_all(&self) -> impl Iterator<Item = &ParkingRecord> + '_ {
        self.storage.records.iter_all()
    }

    /// Every record for a vehicle number; empty when none match
    pub fn search_by_vehicle_number(&self, vehicle_number: &str) -> Vec<ParkingRecord> {
        self.storage.records.search(vehicle_number)
    }

    pub fn summary(&self) -> ParkingSummary {
        ParkingSummary {
            total_records: self.storage.records.len(),
            active: self.storage.records.active_count(),
            capacity: self.storage.records.capacity(),
            collected: self
                .storage
                .records
                .iter_all()
                .filter(|r| !r.is_active())
                .map(|r| r.total_fee)
                .sum(),
        }
    }

    fn ensure_capacity(&self) -> ParkingResult<()> {
        if self.storage.records.is_full() {
            return Err(ParkingError::CapacityExceeded {
                capacity: self.storage.records.capacity(),
            });
        }
        Ok(())
    }

    fn replace(&mut self, index: usize, record: ParkingRecord) {
        if let Some(slot) = self.storage.records.get_mut(index) {
            *slot = record;
        }
    }
}
