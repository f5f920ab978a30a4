//! Snapshot backups
//!
//! A backup is a byte-for-byte copy of the live snapshot file, named after
//! the moment it was taken:
//!
//! ```text
//! backups/parking-YYYYMMDD-HHMMSS-mmm.dat
//! ```
//!
//! - `BackupManager` creates, lists and prunes backups
//! - `BackupManager::restore_backup` validates a backup and makes it the
//!   live snapshot again, after backing up whatever was live before
//!
//! Only the newest `backup_retention.max_backups` files are kept.
//!
//! # Example
//!
//! ```rust,ignore
//! use parking_ledger::backup::BackupManager;
//! use parking_ledger::config::{ParkingPaths, Settings};
//!
//! let paths = ParkingPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let manager = BackupManager::new(paths, &settings);
//!
//! let backup_path = manager.create_backup()?;
//! let result = manager.restore_backup(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager};
pub use restore::RestoreResult;
