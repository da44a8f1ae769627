//! File sequence counter
//!
//! The file ID modifier cycles through 1..=9. Reading the counter and
//! advancing it are separate calls so a caller can generate, persist, and
//! only then advance.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use super::error::SequenceError;

pub const FIRST_SEQUENCE: u8 = 1;
pub const LAST_SEQUENCE: u8 = 9;

/// Wrap-around successor within 1..=9.
pub fn next_sequence(current: u8) -> u8 {
    if current >= LAST_SEQUENCE {
        FIRST_SEQUENCE
    } else {
        current + 1
    }
}

fn check_range(value: u8) -> Result<u8, SequenceError> {
    if (FIRST_SEQUENCE..=LAST_SEQUENCE).contains(&value) {
        Ok(value)
    } else {
        Err(SequenceError::OutOfRange(value))
    }
}

/// Storage for the file sequence counter.
pub trait SequenceStore: Send + Sync {
    /// The sequence number the next generated file will carry.
    fn current(&self) -> Result<u8, SequenceError>;

    /// Move to the next sequence number and return it.
    fn advance(&self) -> Result<u8, SequenceError>;
}

/// Process-local counter for single-instance deployments and tests.
#[derive(Debug)]
pub struct InMemorySequenceStore {
    value: AtomicU8,
}

impl InMemorySequenceStore {
    pub fn new() -> Self {
        Self {
            value: AtomicU8::new(FIRST_SEQUENCE),
        }
    }

    pub fn starting_at(value: u8) -> Result<Self, SequenceError> {
        Ok(Self {
            value: AtomicU8::new(check_range(value)?),
        })
    }
}

impl Default for InMemorySequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceStore for InMemorySequenceStore {
    fn current(&self) -> Result<u8, SequenceError> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    fn advance(&self) -> Result<u8, SequenceError> {
        let previous = self
            .value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(next_sequence(v)))
            .unwrap_or_else(|v| v);
        Ok(next_sequence(previous))
    }
}

/// Counter persisted as a single number in a text file.
///
/// A missing file reads as 1. Writes go through a temp file and a rename.
#[derive(Debug)]
pub struct FileSequenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SequenceError {
        SequenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read(&self) -> Result<u8, SequenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FIRST_SEQUENCE),
            Err(e) => return Err(self.io_error(e)),
        };

        let corrupt = || SequenceError::Corrupt {
            path: self.path.clone(),
            content: content.clone(),
        };
        let value: u8 = content.trim().parse().map_err(|_| corrupt())?;
        check_range(value).map_err(|_| corrupt())
    }

    fn write(&self, value: u8) -> Result<(), SequenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, format!("{value}\n")).map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}

impl SequenceStore for FileSequenceStore {
    fn current(&self) -> Result<u8, SequenceError> {
        let _guard = self.lock.lock().map_err(|_| SequenceError::Poisoned)?;
        self.read()
    }

    fn advance(&self) -> Result<u8, SequenceError> {
        let _guard = self.lock.lock().map_err(|_| SequenceError::Poisoned)?;
        let next = next_sequence(self.read()?);
        self.write(next)?;
        tracing::debug!(path = %self.path.display(), sequence = next, "Advanced file sequence");
        Ok(next)
    }
}
