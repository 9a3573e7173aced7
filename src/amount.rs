//! Currency display for cent amounts.
//!
//! ABA files carry amounts as whole cents. Reports show them as dollars with
//! exactly 2 decimal places, using `rust_decimal` so no floating-point
//! rounding is involved.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// A dollar amount with exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use aba_codec::Dollars;
///
/// assert_eq!(Dollars::from_cents(12345).to_string(), "123.45");
/// assert_eq!(Dollars::from_signed_cents(-5).to_string(), "-0.05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Dollars(Decimal);

impl Dollars {
    /// The number of decimal places shown.
    pub const SCALE: u32 = 2;

    pub const ZERO: Self = Dollars(Decimal::ZERO);

    pub fn from_cents(cents: u64) -> Self {
        Self::from_signed_cents(i128::from(cents))
    }

    /// Creates a value from a possibly negative cent amount, such as a net total.
    pub fn from_signed_cents(cents: i128) -> Self {
        Dollars(Decimal::from_i128_with_scale(cents, Self::SCALE))
    }
}

impl fmt::Display for Dollars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Dollars {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
