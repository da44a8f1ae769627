//! ABA routing numbers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// Weights of the ABA 3-7-1 checksum.
const CHECKSUM_WEIGHTS: [u32; 9] = [3, 7, 1, 3, 7, 1, 3, 7, 1];

/// A 9-digit ABA routing number.
///
/// # Invariants
/// - Exactly 9 ASCII digits
///
/// The ABA checksum is exposed through [`RoutingNumber::has_valid_checksum`]
/// but is not enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutingNumber(String);

impl RoutingNumber {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.len() != 9 {
            return Err(DomainError::invalid_routing(value, "must be exactly 9 digits"));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_routing(value, "must contain only digits"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 digits: the receiving/originating DFI identification.
    pub fn prefix(&self) -> &str {
        &self.0[..8]
    }

    /// First 8 digits as a number, the unit of NACHA entry hashes.
    pub fn prefix_value(&self) -> u64 {
        self.0[..8]
            .bytes()
            .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'))
    }

    /// The 9th digit.
    pub fn check_digit(&self) -> &str {
        &self.0[8..]
    }

    pub fn has_valid_checksum(&self) -> bool {
        let sum: u32 = self
            .0
            .bytes()
            .zip(CHECKSUM_WEIGHTS)
            .map(|(b, w)| u32::from(b - b'0') * w)
            .sum();
        sum % 10 == 0
    }
}

impl fmt::Display for RoutingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoutingNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutingNumber::parse(s)
    }
}

impl TryFrom<String> for RoutingNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoutingNumber::parse(&value)
    }
}

impl From<RoutingNumber> for String {
    fn from(routing: RoutingNumber) -> Self {
        routing.0
    }
}
