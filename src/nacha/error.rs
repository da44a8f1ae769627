//! NACHA Encoder Errors

use std::path::PathBuf;

/// Errors that can occur while generating a file
#[derive(Debug, thiserror::Error)]
pub enum NachaError {
    /// A file needs at least one entry
    #[error("Cannot generate a NACHA file without entries")]
    EmptyBatch,

    /// Entry count does not fit the 6-digit batch control count field
    #[error("Batch of {count} entries exceeds the limit of {limit}")]
    TooManyEntries { count: usize, limit: usize },

    /// Total does not fit the 12-digit control amount fields
    #[error("Batch total of {total_cents} cents exceeds the control field limit")]
    AmountOverflow { total_cents: u128 },

    /// Sequence store failure
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl NachaError {
    /// Input contract violations that resubmitting unchanged cannot fix
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            NachaError::EmptyBatch
                | NachaError::TooManyEntries { .. }
                | NachaError::AmountOverflow { .. }
        )
    }
}

/// Errors from a [`SequenceStore`](super::SequenceStore)
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("Sequence file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sequence file {path} is corrupt: {content:?}")]
    Corrupt { path: PathBuf, content: String },

    #[error("File sequence number must be within 1..=9 (got {0})")]
    OutOfRange(u8),

    #[error("Sequence store lock poisoned")]
    Poisoned,
}

impl SequenceError {
    /// I/O failures may succeed on retry, the rest will not
    pub fn is_retryable(&self) -> bool {
        matches!(self, SequenceError::Io { .. })
    }
}
