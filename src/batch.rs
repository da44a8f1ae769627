//! JSON batch input
//!
//! The wire shape accepted by the CLI. Routing numbers arrive as strings and
//! amounts as dollar strings; both are validated on conversion into
//! [`PaymentEntry`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Direction, DomainError, Party, PaymentEntry, RoutingNumber};
use crate::error::AppError;
use crate::workflow::FileRequest;

/// A batch of payment instructions for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub direction: Direction,
    pub effective_date: NaiveDate,
    pub entries: Vec<PaymentInstruction>,
}

/// One payment as submitted, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInstruction {
    pub debit_routing: String,
    pub debit_account: String,
    #[serde(default)]
    pub debit_identifier: String,
    pub debit_name: String,
    pub credit_routing: String,
    pub credit_account: String,
    #[serde(default)]
    pub credit_identifier: String,
    pub credit_name: String,
    /// Dollars, e.g. `"100.50"`
    pub amount: String,
}

impl TryFrom<&PaymentInstruction> for PaymentEntry {
    type Error = DomainError;

    fn try_from(p: &PaymentInstruction) -> Result<Self, Self::Error> {
        let debit = Party::new(
            RoutingNumber::parse(p.debit_routing.trim())?,
            p.debit_account.trim(),
            p.debit_identifier.trim(),
            p.debit_name.trim(),
        );
        let credit = Party::new(
            RoutingNumber::parse(p.credit_routing.trim())?,
            p.credit_account.trim(),
            p.credit_identifier.trim(),
            p.credit_name.trim(),
        );
        let amount: Cents = p.amount.trim().parse()?;
        PaymentEntry::new(debit, credit, amount)
    }
}

impl TryFrom<PaymentInstruction> for PaymentEntry {
    type Error = DomainError;

    fn try_from(p: PaymentInstruction) -> Result<Self, Self::Error> {
        PaymentEntry::try_from(&p)
    }
}

impl BatchRequest {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate every instruction, failing on the first bad one.
    pub fn to_entries(&self) -> Result<Vec<PaymentEntry>, AppError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, instruction)| {
                PaymentEntry::try_from(instruction)
                    .map_err(|e| AppError::InvalidRequest(format!("entry {index}: {e}")))
            })
            .collect()
    }

    pub fn into_file_request(self) -> Result<FileRequest, AppError> {
        let entries = self.to_entries()?;
        Ok(FileRequest::new(self.direction, self.effective_date, entries))
    }
}
