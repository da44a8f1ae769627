//! Domain module
//!
//! Value types shared by the calendar, the encoder and the workflow.

pub mod amount;
pub mod company;
pub mod entry;
pub mod error;
pub mod file;
pub mod routing;

pub use amount::{AmountError, Cents, MAX_ENTRY_CENTS, MAX_TOTAL_CENTS};
pub use company::{CompanyId, COMPANY_ID_LENGTH};
pub use entry::{Direction, OriginatorProfile, Party, PaymentEntry};
pub use error::DomainError;
pub use file::{content_digest, GeneratedFile, GeneratedFileSummary};
pub use routing::RoutingNumber;
