//! Custom error types for the parking ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for parking ledger operations
#[derive(Error, Debug)]
pub enum ParkingError {
    /// Bad vehicle type, empty or oversized vehicle number
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vehicle already has a record without an exit time
    #[error("Vehicle {vehicle_number} is already parked (active entry exists)")]
    DuplicateActiveEntry { vehicle_number: String },

    /// Exit requested for a vehicle that is not parked
    #[error("No active parked record found for vehicle {vehicle_number}")]
    NoActiveEntry { vehicle_number: String },

    /// The store holds as many records as it is allowed to
    #[error("Parking system record limit reached ({capacity} records)")]
    CapacityExceeded { capacity: usize },

    /// The snapshot could not be written
    #[error("Could not save data: {0}")]
    PersistenceFailure(String),

    /// The snapshot on disk is malformed
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Login failures and missing credentials
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Backup errors
    #[error("Backup error: {0}")]
    Backup(String),
}

impl ParkingError {
    /// Create a duplicate-entry error for a vehicle number
    pub fn duplicate_active(vehicle_number: impl Into<String>) -> Self {
        Self::DuplicateActiveEntry {
            vehicle_number: vehicle_number.into(),
        }
    }

    /// Create a no-active-entry error for a vehicle number
    pub fn no_active_entry(vehicle_number: impl Into<String>) -> Self {
        Self::NoActiveEntry {
            vehicle_number: vehicle_number.into(),
        }
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this error came from writing the snapshot
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ParkingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ParkingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for parking ledger operations
pub type ParkingResult<T> = Result<T, ParkingError>;
