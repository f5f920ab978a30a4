use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use parking_ledger::cli::{
    admin_login, handle_admin_command, handle_audit_command, handle_backup_command, handle_entry,
    handle_exit, handle_export_command, handle_history, handle_parked, handle_search,
    handle_status, initialize, AdminCommands, BackupCommands, Menu,
};
use parking_ledger::config::{paths::ParkingPaths, settings::Settings};
use parking_ledger::export::ExportFormat;
use parking_ledger::services::{AdminCredentials, SystemClock};
use parking_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "parking",
    version,
    about = "Parking lot ledger",
    long_about = "Records vehicle entries and exits for a parking lot, charges an \
                  entry fee plus an hourly rate per vehicle type, and keeps the full \
                  history in a single binary snapshot file."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and set the admin credentials
    Init {
        /// Admin username (defaults to "admin")
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Register a vehicle entry
    Entry {
        /// Vehicle type: bike, car, bus, truck or 1-4
        vehicle_type: String,
        /// Vehicle number, e.g. BA-12-PA-1234
        vehicle_number: String,
    },

    /// Process a vehicle exit and charge the fee (admin)
    Exit {
        /// Vehicle number
        vehicle_number: String,
    },

    /// Show currently parked vehicles (admin)
    Parked,

    /// Show every record (admin)
    #[command(alias = "list")]
    History,

    /// Show every record for a vehicle number (admin)
    Search {
        /// Vehicle number
        vehicle_number: String,
    },

    /// Show occupancy and fees collected (admin)
    Status,

    /// Export the record history (admin)
    Export {
        /// Export format
        #[arg(value_enum)]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Snapshot backups (admin)
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Admin credential management
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Show recent audit log entries (admin)
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Include the recorded entity state
        #[arg(short, long)]
        verbose: bool,
    },

    /// Launch the interactive User/Admin menu
    #[command(alias = "ui")]
    Menu,

    /// Show current configuration and paths
    Config,
}

impl Commands {
    /// Whether the command reads or changes parking records
    ///
    /// Backup, admin and config commands work on files directly, so they
    /// still run when the snapshot cannot be loaded.
    fn needs_records(&self) -> bool {
        matches!(
            self,
            Commands::Entry { .. }
                | Commands::Exit { .. }
                | Commands::Parked
                | Commands::History
                | Commands::Search { .. }
                | Commands::Status
                | Commands::Export { .. }
                | Commands::Menu
        )
    }
}

fn load_records(storage: &mut Storage) -> parking_ledger::ParkingResult<()> {
    let report = storage.load_all()?;
    for anomaly in &report.anomalies {
        eprintln!("Warning: {}", anomaly);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = ParkingPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone(), &settings)?;
    if cli.command.as_ref().is_some_and(Commands::needs_records) {
        load_records(&mut storage)?;
    }

    let clock = SystemClock;

    match cli.command {
        Some(Commands::Init { username }) => {
            initialize(&paths, &mut settings, &storage, username)?;
        }
        Some(Commands::Entry {
            vehicle_type,
            vehicle_number,
        }) => {
            handle_entry(
                &mut storage,
                &clock,
                &settings,
                &vehicle_type,
                &vehicle_number,
            )?;
        }
        Some(Commands::Exit { vehicle_number }) => {
            admin_login(&settings)?;
            handle_exit(&mut storage, &clock, &settings, &vehicle_number)?;
        }
        Some(Commands::Parked) => {
            admin_login(&settings)?;
            handle_parked(&storage, &settings)?;
        }
        Some(Commands::History) => {
            admin_login(&settings)?;
            handle_history(&storage, &settings)?;
        }
        Some(Commands::Search { vehicle_number }) => {
            admin_login(&settings)?;
            handle_search(&storage, &settings, &vehicle_number)?;
        }
        Some(Commands::Status) => {
            admin_login(&settings)?;
            handle_status(&mut storage, &clock)?;
        }
        Some(Commands::Export { format, output }) => {
            admin_login(&settings)?;
            handle_export_command(&storage, format, output)?;
        }
        Some(Commands::Backup(cmd)) => {
            admin_login(&settings)?;
            handle_backup_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Admin(cmd)) => {
            handle_admin_command(&paths, &mut settings, &storage, cmd)?;
        }
        Some(Commands::Audit { limit, verbose }) => {
            admin_login(&settings)?;
            handle_audit_command(&storage, limit, verbose)?;
        }
        Some(Commands::Menu) => {
            let credentials = AdminCredentials::from_settings(&settings);
            let stdin = io::stdin();
            let hidden = stdin.is_terminal();
            Menu::new(
                &mut storage,
                &clock,
                &credentials,
                &settings.date_format,
                stdin.lock(),
                io::stdout().lock(),
            )
            .hide_password(hidden)
            .run()?;
        }
        Some(Commands::Config) => {
            println!("Parking Ledger Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Snapshot file:    {}", paths.snapshot_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Capacity:        {}", settings.capacity);
            println!("  Snapshot policy: {:?}", settings.snapshot_policy);
            println!("  Date format:     {}", settings.date_format);
            println!("  Admin user:      {}", settings.admin.username);
            println!(
                "  Admin password:  {}",
                if settings.has_admin_password() {
                    "set"
                } else {
                    "not set"
                }
            );
            println!("  Backups kept:    {}", settings.backup_retention.max_backups);
            println!();
            match load_records(&mut storage) {
                Ok(()) => println!(
                    "Records: {} ({} parked)",
                    storage.records.len(),
                    storage.records.active_count()
                ),
                Err(e) => println!("Records: unavailable ({})", e),
            }
        }
        None => {
            println!("Parking Ledger - vehicle entry and exit records");
            println!();
            println!("Run 'parking --help' for usage information.");
            println!("Run 'parking menu' to launch the interactive menu.");
        }
    }

    Ok(())
}
