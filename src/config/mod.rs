//! Configuration module for the parking ledger
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - Settings persistence (capacity, snapshot policy, admin credentials)

pub mod paths;
pub mod settings;

pub use paths::ParkingPaths;
pub use settings::{Settings, SnapshotPolicy};
