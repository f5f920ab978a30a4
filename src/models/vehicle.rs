//! Vehicle model
//!
//! Vehicle types with their snapshot codes, and the validated vehicle
//! number used as the lookup key for parking records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest vehicle number the snapshot can hold, in bytes
pub const MAX_VEHICLE_NUMBER_LEN: usize = 19;

/// Kind of vehicle, which fixes both the entry fee and the hourly rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Bike,
    Car,
    Bus,
    Truck,
}

impl VehicleType {
    /// All vehicle types in code order
    pub const ALL: [VehicleType; 4] = [Self::Bike, Self::Car, Self::Bus, Self::Truck];

    /// Code stored in the snapshot (1=Bike, 2=Car, 3=Bus, 4=Truck)
    pub const fn code(&self) -> i32 {
        match self {
            Self::Bike => 1,
            Self::Car => 2,
            Self::Bus => 3,
            Self::Truck => 4,
        }
    }

    /// Look up a vehicle type by its snapshot code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Bike),
            2 => Some(Self::Car),
            3 => Some(Self::Bus),
            4 => Some(Self::Truck),
            _ => None,
        }
    }

    /// Parse a vehicle type from a name or a numeric code
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code);
        }
        match s.to_lowercase().as_str() {
            "bike" | "motorbike" => Some(Self::Bike),
            "car" => Some(Self::Car),
            "bus" => Some(Self::Bus),
            "truck" => Some(Self::Truck),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bike => "Bike",
            Self::Car => "Car",
            Self::Bus => "Bus",
            Self::Truck => "Truck",
        };
        f.pad(name)
    }
}

/// A validated, case-sensitive vehicle registration number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleNumber(String);

impl VehicleNumber {
    /// Validate and wrap a vehicle number
    pub fn new(number: impl Into<String>) -> Result<Self, VehicleNumberError> {
        let number = number.into();

        if number.is_empty() {
            return Err(VehicleNumberError::Empty);
        }
        if number.len() > MAX_VEHICLE_NUMBER_LEN {
            return Err(VehicleNumberError::TooLong(number.len()));
        }
        if number.contains('\0') {
            return Err(VehicleNumberError::ContainsNul);
        }

        Ok(Self(number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for VehicleNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for VehicleNumber {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl TryFrom<String> for VehicleNumber {
    type Error = VehicleNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VehicleNumber> for String {
    fn from(number: VehicleNumber) -> Self {
        number.0
    }
}

/// Validation errors for vehicle numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleNumberError {
    Empty,
    TooLong(usize),
    ContainsNul,
}

impl fmt::Display for VehicleNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Vehicle number cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "Vehicle number too long ({} bytes, max {})",
                len, MAX_VEHICLE_NUMBER_LEN
            ),
            Self::ContainsNul => write!(f, "Vehicle number cannot contain NUL characters"),
        }
    }
}

impl std::error::Error for VehicleNumberError {}
