//! Generation workflow
//!
//! Ties the calendar, the encoder and file storage together.

mod job;
mod repository;

pub use job::{FileGenerationJob, FileRequest, FileRunResult};
pub use repository::{
    DirectoryFileRepository, FileRepository, InMemoryFileRepository, RepositoryError,
};
