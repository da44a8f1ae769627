//! Domain Error Types
//!
//! Input contract violations detected while building domain values.

use thiserror::Error;

use super::amount::AmountError;

/// Errors raised when a payment instruction cannot become a valid entry.
///
/// These are always the caller's fault: the request must be fixed before
/// it is resubmitted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Routing number is not exactly 9 ASCII digits
    #[error("Invalid routing number {value:?}: {reason}")]
    InvalidRoutingNumber { value: String, reason: &'static str },

    /// Amount is zero, malformed, or too large for the entry amount field
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A required free-text field is missing
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl DomainError {
    pub fn invalid_routing(value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRoutingNumber {
            value: value.into(),
            reason,
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        DomainError::InvalidAmount(err.to_string())
    }
}
