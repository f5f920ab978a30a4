//! Backup CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::audit::AuditEntry;
use crate::backup::BackupManager;
use crate::config::settings::Settings;
use crate::error::{ParkingError, ParkingResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Copy the current snapshot into the backup directory
    Create,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Make a backup the live snapshot
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &mut Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> ParkingResult<()> {
    let manager = BackupManager::new(storage.paths().clone(), settings);

    match cmd {
        BackupCommands::Create => {
            let backup_path = manager.create_backup()?;
            println!("Backup created: {}", file_name(&backup_path));
            println!("Location: {}", backup_path.display());
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: parking backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);

                if verbose {
                    println!(
                        "{}. {}\n   Created: {}\n   Size: {}\n   Records: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        backup.record_count,
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} records, {} ago)",
                        i + 1,
                        backup.filename,
                        backup.record_count,
                        format_duration(age),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            if !force {
                println!("This will replace ALL current parking records with");
                println!("  {}", backup_path.display());
                println!("To proceed, run again with --force flag:");
                println!("  parking backup restore {} --force", backup);
                return Ok(());
            }

            let result = manager.restore_backup(&backup_path)?;
            storage.audit().log(&AuditEntry::restore(
                file_name(&backup_path),
                result.summary(),
            ))?;
            storage.load_all()?;

            println!("Restore complete!");
            println!("{}", result.summary());
        }
    }

    Ok(())
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve `latest`, a path, or a filename in the backup directory
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> ParkingResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| ParkingError::Backup("No backups found".into()));
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_backup_dir = manager.backup_dir().join(backup);
    if in_backup_dir.exists() {
        return Ok(in_backup_dir);
    }

    let with_ext = manager.backup_dir().join(format!("{}.dat", backup));
    if with_ext.exists() {
        return Ok(with_ext);
    }

    Err(ParkingError::Backup(format!("Backup not found: {}", backup)))
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
