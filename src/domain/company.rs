//! Company identification

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DomainError;

/// Width of the company identification field in batch records.
pub const COMPANY_ID_LENGTH: usize = 10;

/// The originator's 10-digit company identification, usually `1` followed by
/// the employer identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyId(String);

impl CompanyId {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.len() != COMPANY_ID_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_field(
                "company_id",
                format!("must be exactly {COMPANY_ID_LENGTH} digits, got {value:?}"),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CompanyId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CompanyId::parse(&value)
    }
}

impl From<CompanyId> for String {
    fn from(id: CompanyId) -> Self {
        id.0
    }
}
