//! Parking Ledger - vehicle entry and exit records for a parking lot
//!
//! This library provides the core functionality for the `parking` binary.
//! Each vehicle entry becomes a record with an entry fee; at exit the
//! record is closed with a total of entry fee plus an hourly rate for every
//! started hour. The whole record set is persisted as one little-endian
//! binary snapshot after every change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (records, vehicle types, money)
//! - `storage`: Binary snapshot codec and record repository
//! - `services`: Business logic layer (fees, parking, authentication, clock)
//! - `audit`: Audit logging system
//! - `backup`: Snapshot backups with retention
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers and the interactive menu
//!
//! # Example
//!
//! ```rust,ignore
//! use parking_ledger::config::{paths::ParkingPaths, settings::Settings};
//! use parking_ledger::services::{ParkingService, SystemClock};
//! use parking_ledger::storage::Storage;
//!
//! let paths = ParkingPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths, &settings)?;
//! storage.load_all()?;
//!
//! let record = ParkingService::new(&mut storage, &SystemClock).register_code(2, "BA-12-PA-1234")?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{ParkingError, ParkingResult};
