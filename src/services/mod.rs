//! Business logic layer
//!
//! - `fee`: entry fee, hourly rate and billed-hours computation
//! - `parking`: entry registration, exit processing and lookups
//! - `auth`: admin credential check
//! - `clock`: time source

pub mod auth;
pub mod clock;
pub mod fee;
pub mod parking;

pub use auth::{AdminCredentials, Authenticator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use parking::{ParkingService, ParkingSummary};
