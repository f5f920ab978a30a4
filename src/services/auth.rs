//! Admin authentication
//!
//! Credentials live in the settings file as a username plus an Argon2id
//! PHC hash of the password. Callers depend on the [`Authenticator`]
//! trait, so the check can be swapped out.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::settings::Settings;
use crate::error::{ParkingError, ParkingResult};

/// Minimum accepted admin password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Decides whether a username/password pair may use admin functions
pub trait Authenticator {
    fn authenticate(&self, username: &str, password: &str) -> bool;

    /// Whether any pair could be accepted at all
    fn is_configured(&self) -> bool {
        true
    }
}

/// Admin credentials read from settings
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: Option<String>,
}

impl AdminCredentials {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            username: settings.admin.username.clone(),
            password_hash: settings.admin.password_hash.clone(),
        }
    }

    /// Build credentials for a new username/password pair
    pub fn with_password(username: &str, password: &str) -> ParkingResult<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ParkingError::InvalidInput("Username cannot be empty".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ParkingError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        Ok(Self {
            username: username.to_string(),
            password_hash: Some(hash_password(password)?),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Write these credentials into the settings
    pub fn apply_to(&self, settings: &mut Settings) {
        settings.admin.username = self.username.clone();
        settings.admin.password_hash = self.password_hash.clone();
    }
}

impl Authenticator for AdminCredentials {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        let Some(hash) = &self.password_hash else {
            return false;
        };
        username == self.username && verify_password(password, hash)
    }

    fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Hash a password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> ParkingResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ParkingError::Auth(format!("Failed to hash password: {}", e)))
}

/// Check a password against a PHC hash; malformed hashes never match
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Fail with an `Auth` error unless the pair is accepted
pub fn require_admin(
    authenticator: &dyn Authenticator,
    username: &str,
    password: &str,
) -> ParkingResult<()> {
    if authenticator.authenticate(username, password) {
        Ok(())
    } else {
        Err(ParkingError::Auth("Login failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("anything", "not a phc string"));
    }

    #[test]
    fn test_credentials_authenticate() {
        let creds = AdminCredentials::with_password("attendant", "s3cret-pass").unwrap();
        assert!(creds.is_configured());
        assert!(creds.authenticate("attendant", "s3cret-pass"));
        assert!(!creds.authenticate("Attendant", "s3cret-pass"));
        assert!(!creds.authenticate("attendant", "s3cret"));
    }

    #[test]
    fn test_unconfigured_rejects_everything() {
        let creds = AdminCredentials::from_settings(&Settings::default());
        assert!(!creds.is_configured());
        assert!(!creds.authenticate("admin", ""));
        assert!(require_admin(&creds, "admin", "").is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let err = AdminCredentials::with_password("admin", "1234").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_apply_to_settings() {
        let mut settings = Settings::default();
        let creds = AdminCredentials::with_password(" desk ", "long enough").unwrap();
        creds.apply_to(&mut settings);

        assert_eq!(settings.admin.username, "desk");
        let reloaded = AdminCredentials::from_settings(&settings);
        assert!(reloaded.authenticate("desk", "long enough"));
    }
}
