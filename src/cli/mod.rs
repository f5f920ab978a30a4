//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod admin;
pub mod audit;
pub mod backup;
pub mod export;
pub mod login;
pub mod menu;
pub mod prompt;
pub mod records;

pub use admin::{handle_admin_command, initialize, AdminCommands};
pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use export::handle_export_command;
pub use login::admin_login;
pub use menu::Menu;
pub use records::{
    handle_entry, handle_exit, handle_history, handle_parked, handle_search, handle_status,
};
