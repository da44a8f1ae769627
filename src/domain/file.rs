//! Generated NACHA files

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::amount::Cents;
use super::entry::Direction;

/// A NACHA file produced by one generation call.
///
/// Ownership passes to the caller, which is responsible for persisting it and
/// then advancing the file sequence counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub id: Uuid,
    pub filename: String,
    pub content: String,
    pub entry_count: usize,
    pub total_amount: Cents,
    pub effective_date: NaiveDate,
    pub direction: Direction,
    /// Sequence number written into the file header
    pub file_id_modifier: u8,
    pub created_at: NaiveDateTime,
    /// Hex SHA-256 of `content`
    pub content_sha256: String,
    pub transmitted: bool,
}

impl GeneratedFile {
    /// Recompute the content digest and compare it with the stored one.
    pub fn verify_digest(&self) -> bool {
        content_digest(&self.content) == self.content_sha256
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    pub fn summary(&self) -> GeneratedFileSummary {
        GeneratedFileSummary {
            id: self.id,
            filename: self.filename.clone(),
            entry_count: self.entry_count,
            total_amount: self.total_amount,
            effective_date: self.effective_date,
            direction: self.direction,
            created_at: self.created_at,
            transmitted: self.transmitted,
        }
    }
}

/// File metadata without the content, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFileSummary {
    pub id: Uuid,
    pub filename: String,
    pub entry_count: usize,
    pub total_amount: Cents,
    pub effective_date: NaiveDate,
    pub direction: Direction,
    pub created_at: NaiveDateTime,
    pub transmitted: bool,
}

pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
