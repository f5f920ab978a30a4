//! Money type for representing fee amounts
//!
//! Internally stores amounts in cents (i64) so fee arithmetic is exact.
//! The snapshot file stores fees as `f64`; conversion happens only at that
//! boundary through [`Money::from_f64`] and [`Money::to_f64`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use parking_ledger::models::Money;
    /// let amount = Money::from_cents(2050); // 20.50
    /// assert_eq!(amount.to_string(), "20.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert a floating-point amount, rounding to the nearest cent
    ///
    /// Non-finite values map to zero.
    pub fn from_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self((amount * 100.0).round() as i64)
    }

    /// The amount as a floating-point number of units
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.0 < 0 {
            format!("-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.units(), self.cents_part())
        };
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, factor: i64) -> Self {
        Self(self.0 * factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_units(50).to_string(), "50.00");
        assert_eq!(Money::from_cents(1005).to_string(), "10.05");
        assert_eq!(Money::from_cents(-250).to_string(), "-2.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:>8}", Money::from_units(20)), "   20.00");
        assert_eq!(format!("{:<8}|", Money::from_units(20)), "20.00   |");
    }

    #[test]
    fn test_f64_conversion() {
        assert_eq!(Money::from_f64(120.0), Money::from_units(120));
        assert_eq!(Money::from_f64(0.1 + 0.2), Money::from_cents(30));
        assert_eq!(Money::from_f64(f64::NAN), Money::zero());
        assert_eq!(Money::from_units(100).to_f64(), 100.0);
    }

    #[test]
    fn test_arithmetic() {
        let fee = Money::from_units(50) + Money::from_units(25) * 2;
        assert_eq!(fee, Money::from_units(100));

        let mut total = Money::zero();
        total += Money::from_cents(150);
        assert_eq!(total.cents(), 150);

        let sum: Money = [Money::from_units(1), Money::from_units(2)].iter().sum();
        assert_eq!(sum, Money::from_units(3));
    }
}
