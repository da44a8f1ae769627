//! NACHA file generation
//!
//! Fixed-width record tables, the file encoder, and the injected sequence
//! counter and trace number capabilities.

mod encoder;
mod error;
pub mod field;
pub mod records;
mod sequence;
mod trace;

pub use encoder::{
    batch_entry_hash, batch_total, check_entry_count, file_entry_hash, filename, validate,
    NachaEncoder, ValidationReport,
};
pub use error::{NachaError, SequenceError};
pub use field::{FieldSpec, Justify, RECORD_LENGTH};
pub use sequence::{
    next_sequence, FileSequenceStore, InMemorySequenceStore, SequenceStore, FIRST_SEQUENCE,
    LAST_SEQUENCE,
};
pub use trace::{
    trace_number, RandomTraceSource, SequentialTraceSource, TraceSource, TRACE_SUFFIX_LIMIT,
};
