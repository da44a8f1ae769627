//! ACH origination library
//!
//! Business-day calendar and NACHA file generation, plus the workflow that
//! persists files and advances the file sequence.

pub mod batch;
pub mod calendar;
pub mod domain;
pub mod nacha;
pub mod workflow;

pub mod config;
mod error;

pub use batch::{BatchRequest, PaymentInstruction};
pub use calendar::{BusinessDayCalculator, CalendarError, FederalHoliday};
pub use config::Config;
pub use domain::{
    Cents, CompanyId, Direction, DomainError, GeneratedFile, OriginatorProfile, Party,
    PaymentEntry, RoutingNumber,
};
pub use error::{AppError, AppResult};
pub use nacha::{NachaEncoder, NachaError, SequenceError, ValidationReport};
pub use workflow::{FileGenerationJob, FileRequest, FileRunResult};
