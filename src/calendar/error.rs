//! Calendar Errors

/// Errors raised by calendar computations.
///
/// Both variants are programmer errors: the inputs are outside the range the
/// calendar supports, and retrying with the same input cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid holiday year: {0} (supported from 1970)")]
    InvalidYear(i32),

    #[error("Date arithmetic left the supported range")]
    OutOfRange,
}
