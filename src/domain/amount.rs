//! Cents type
//!
//! Domain primitive for monetary amounts. Money is always carried as an
//! integer number of cents so that file totals are exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest amount that fits the 10-digit entry detail amount field.
pub const MAX_ENTRY_CENTS: u64 = 9_999_999_999;

/// Largest total that fits the 12-digit batch/file control amount fields.
pub const MAX_TOTAL_CENTS: u64 = 999_999_999_999;

/// Maximum decimal places accepted when parsing a dollar amount
const MAX_SCALE: u32 = 2;

/// Cents represents a non-negative monetary value in integer cents.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use ach_origination::domain::Cents;
///
/// let amount = Cents::from_dollars(Decimal::new(10050, 2)).unwrap();
/// assert_eq!(amount.value(), 10050);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(u64);

/// Errors that can occur when creating a Cents value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum representable value")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a dollar amount such as `100.50` into cents.
    ///
    /// # Errors
    /// - `AmountError::Negative` if value < 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if the cents value does not fit in a u64
    pub fn from_dollars(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }

        // "100.50" and "100.5" are both fine, "100.505" is not
        let normalized = value.normalize();
        if normalized.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(normalized.scale()));
        }

        let cents = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_u64())
            .ok_or(AmountError::Overflow)?;

        Ok(Self(cents))
    }

    /// Get the underlying number of cents.
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Cents) -> Option<Cents> {
        self.0.checked_add(other.0).map(Cents)
    }

    /// Sum a sequence of amounts, returning None on u64 overflow.
    pub fn total<I>(amounts: I) -> Option<Cents>
    where
        I: IntoIterator<Item = Cents>,
    {
        amounts
            .into_iter()
            .try_fold(Cents::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Cents {
    type Err = AmountError;

    /// Parses a dollar string ("250.50").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| AmountError::ParseError(e.to_string()))?;
        Cents::from_dollars(decimal)
    }
}

impl From<u64> for Cents {
    fn from(value: u64) -> Self {
        Cents(value)
    }
}
