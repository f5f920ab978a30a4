//! Admin credential commands and first-time setup

use clap::Subcommand;
use serde_json::json;

use crate::audit::EntityType;
use crate::config::paths::ParkingPaths;
use crate::config::settings::Settings;
use crate::error::ParkingResult;
use crate::services::AdminCredentials;
use crate::storage::Storage;

use super::login::{admin_login, read_new_password, ADMIN_PASSWORD_ENV, NEW_ADMIN_PASSWORD_ENV};

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Change the admin username and password
    SetPassword {
        /// New admin username (defaults to the current one)
        #[arg(short, long)]
        username: Option<String>,
    },
}

/// Handle an admin command
pub fn handle_admin_command(
    paths: &ParkingPaths,
    settings: &mut Settings,
    storage: &Storage,
    cmd: AdminCommands,
) -> ParkingResult<()> {
    match cmd {
        AdminCommands::SetPassword { username } => {
            if settings.has_admin_password() {
                admin_login(settings)?;
            }

            let before = settings.admin.username.clone();
            let username = username.unwrap_or_else(|| before.clone());
            let password = read_new_password(NEW_ADMIN_PASSWORD_ENV)?;

            let credentials = AdminCredentials::with_password(&username, &password)?;
            credentials.apply_to(settings);
            settings.save(paths)?;

            storage.log_update(
                EntityType::AdminCredentials,
                "admin",
                Some(credentials.username().to_string()),
                &json!({ "username": before }),
                &json!({ "username": credentials.username() }),
            )?;

            println!("Admin credentials updated for '{}'.", credentials.username());
        }
    }

    Ok(())
}

/// Create directories, settings and an empty snapshot, and set the first
/// admin credentials
pub fn initialize(
    paths: &ParkingPaths,
    settings: &mut Settings,
    storage: &Storage,
    username: Option<String>,
) -> ParkingResult<()> {
    println!("Initializing parking ledger at: {}", paths.base_dir().display());
    paths.ensure_directories()?;

    if !paths.snapshot_file().exists() {
        storage.save_all()?;
    }

    if settings.has_admin_password() {
        settings.save(paths)?;
        println!("Admin credentials are already set.");
        println!("Run 'parking admin set-password' to change them.");
        return Ok(());
    }

    let username = username.unwrap_or_else(|| settings.admin.username.clone());
    let password = read_new_password(ADMIN_PASSWORD_ENV)?;
    let credentials = AdminCredentials::with_password(&username, &password)?;
    credentials.apply_to(settings);
    settings.save(paths)?;

    storage.log_create(
        EntityType::AdminCredentials,
        "admin",
        Some(credentials.username().to_string()),
        &json!({ "username": credentials.username() }),
    )?;

    println!("Initialization complete!");
    println!("Admin user: {}", credentials.username());
    println!();
    println!("Run 'parking entry car KA-01-1234' to register a vehicle.");
    Ok(())
}
