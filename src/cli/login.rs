//! Admin login and password entry for the command line
//!
//! Usernames are read from stdin and passwords with hidden input. Both can
//! come from environment variables instead, for scripts.

use std::io::{self, BufRead, Write};

use zeroize::Zeroizing;

use crate::config::settings::Settings;
use crate::error::{ParkingError, ParkingResult};
use crate::services::auth::{require_admin, AdminCredentials, Authenticator, MIN_PASSWORD_LEN};

use super::prompt;

/// Admin username for non-interactive use
pub const ADMIN_USER_ENV: &str = "PARKING_ADMIN_USER";

/// Admin password for non-interactive use
pub const ADMIN_PASSWORD_ENV: &str = "PARKING_ADMIN_PASSWORD";

/// Replacement password for `admin set-password` in non-interactive use
pub const NEW_ADMIN_PASSWORD_ENV: &str = "PARKING_NEW_ADMIN_PASSWORD";

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Read a password with hidden input
pub fn prompt_password(prompt: &str) -> ParkingResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| ParkingError::Auth(format!("Failed to read password: {}", e)))
}

fn no_password_error() -> ParkingError {
    ParkingError::Auth(
        "No admin password is set. Run 'parking init' or 'parking admin set-password' first"
            .into(),
    )
}

/// Check admin credentials from the environment or the terminal
pub fn admin_login(settings: &Settings) -> ParkingResult<()> {
    let credentials = AdminCredentials::from_settings(settings);
    if !credentials.is_configured() {
        return Err(no_password_error());
    }

    let username = match env_value(ADMIN_USER_ENV) {
        Some(user) => user,
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            prompt::read_line(&mut stdin.lock(), &mut stdout, "Username: ")?
        }
    };

    let password = match env_value(ADMIN_PASSWORD_ENV) {
        Some(password) => Zeroizing::new(password),
        None => prompt_password("Password: ")?,
    };

    require_admin(&credentials, &username, &password)
}

/// Admin login over arbitrary input, used by the interactive menu
///
/// With `hidden` set, the password is read from the terminal instead of
/// `input`.
pub fn admin_login_with<R: BufRead, W: Write>(
    authenticator: &dyn Authenticator,
    input: &mut R,
    output: &mut W,
    hidden: bool,
) -> ParkingResult<()> {
    if !authenticator.is_configured() {
        return Err(no_password_error());
    }

    let username = prompt::read_line(input, output, "Username: ")?;
    let password = if hidden {
        prompt_password("Password: ")?
    } else {
        Zeroizing::new(prompt::read_line(input, output, "Password: ")?)
    };

    require_admin(authenticator, &username, &password)
}

/// Obtain a new password, from `env_var` if set, otherwise by prompting
/// twice until both entries match and are long enough
pub fn read_new_password(env_var: &str) -> ParkingResult<Zeroizing<String>> {
    if let Some(password) = env_value(env_var) {
        return Ok(Zeroizing::new(password));
    }

    loop {
        let first = prompt_password("New admin password: ")?;
        if first.chars().count() < MIN_PASSWORD_LEN {
            println!(
                "Password must be at least {} characters. Please try again.",
                MIN_PASSWORD_LEN
            );
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if *first != *second {
            println!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}
