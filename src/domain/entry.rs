//! Payment entries and the originator profile

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::amount::{Cents, MAX_ENTRY_CENTS};
use super::company::CompanyId;
use super::error::DomainError;
use super::routing::RoutingNumber;

/// Which side originates the file.
///
/// A debit file pulls money from the debit side of every entry; a credit file
/// pushes money to the credit side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "DR", alias = "dr", alias = "debit")]
    Debit,
    #[serde(rename = "CR", alias = "cr", alias = "credit")]
    Credit,
}

impl Direction {
    pub fn code(&self) -> &'static str {
        match self {
            Direction::Debit => "DR",
            Direction::Credit => "CR",
        }
    }

    /// Batch service class code
    pub fn service_class_code(&self) -> &'static str {
        match self {
            Direction::Debit => "225",
            Direction::Credit => "220",
        }
    }

    /// Entry detail transaction code (checking account)
    pub fn transaction_code(&self) -> &'static str {
        match self {
            Direction::Debit => "27",
            Direction::Credit => "22",
        }
    }

    pub fn entry_description(&self) -> String {
        format!("{} PAYMENT", self.code())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DR" | "DEBIT" => Ok(Direction::Debit),
            "CR" | "CREDIT" => Ok(Direction::Credit),
            other => Err(DomainError::invalid_field(
                "direction",
                format!("expected DR or CR, got {other:?}"),
            )),
        }
    }
}

/// One side of a payment: the bank account money leaves or arrives at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub routing: RoutingNumber,
    pub account: String,
    pub identifier: String,
    pub name: String,
}

impl Party {
    pub fn new(
        routing: RoutingNumber,
        account: impl Into<String>,
        identifier: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            routing,
            account: account.into(),
            identifier: identifier.into(),
            name: name.into(),
        }
    }
}

/// One instruction to move money from the debit party to the credit party.
///
/// # Invariants
/// - Routing numbers are 9 digits (guaranteed by [`RoutingNumber`])
/// - Amount is positive and fits the 10-digit entry amount field
///
/// Free-text fields are not length-checked here; the encoder truncates them
/// to their fixed widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentEntry {
    debit: Party,
    credit: Party,
    amount: Cents,
}

impl PaymentEntry {
    pub fn new(debit: Party, credit: Party, amount: Cents) -> Result<Self, DomainError> {
        if amount.is_zero() {
            return Err(DomainError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        if amount.value() > MAX_ENTRY_CENTS {
            return Err(DomainError::InvalidAmount(format!(
                "{amount} exceeds the entry limit of {}",
                Cents::new(MAX_ENTRY_CENTS)
            )));
        }
        if debit.account.trim().is_empty() {
            return Err(DomainError::invalid_field("debit_account", "must not be empty"));
        }
        if credit.account.trim().is_empty() {
            return Err(DomainError::invalid_field("credit_account", "must not be empty"));
        }
        Ok(Self {
            debit,
            credit,
            amount,
        })
    }

    pub fn debit(&self) -> &Party {
        &self.debit
    }

    pub fn credit(&self) -> &Party {
        &self.credit
    }

    pub fn amount(&self) -> Cents {
        self.amount
    }

    /// The party whose bank receives the entry in a file of this direction.
    pub fn receiver(&self, direction: Direction) -> &Party {
        match direction {
            Direction::Debit => &self.debit,
            Direction::Credit => &self.credit,
        }
    }
}

/// Static identity of the company originating ACH files.
///
/// Routing numbers and the company identification are validated types, so a
/// profile that exists always renders well-formed headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginatorProfile {
    /// Routing number of the ACH operator or receiving point
    pub immediate_destination: RoutingNumber,
    /// Routing number of the sending point
    pub immediate_origin: RoutingNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_name: Option<String>,
    pub company_name: String,
    pub company_id: CompanyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discretionary_data: Option<String>,
    /// Only the first 8 digits are written
    pub originating_dfi: RoutingNumber,
}

impl OriginatorProfile {
    /// The originating DFI defaults to the immediate origin.
    pub fn new(
        immediate_destination: RoutingNumber,
        immediate_origin: RoutingNumber,
        company_name: impl Into<String>,
        company_id: CompanyId,
    ) -> Self {
        Self {
            immediate_destination,
            originating_dfi: immediate_origin.clone(),
            immediate_origin,
            destination_name: None,
            origin_name: None,
            company_name: company_name.into(),
            company_id,
            discretionary_data: None,
        }
    }

    /// Parse and validate raw identifiers.
    pub fn try_new(
        immediate_destination: &str,
        immediate_origin: &str,
        company_name: impl Into<String>,
        company_id: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self::new(
            RoutingNumber::parse(immediate_destination)?,
            RoutingNumber::parse(immediate_origin)?,
            company_name,
            CompanyId::parse(company_id)?,
        ))
    }

    pub fn with_originating_dfi(mut self, dfi: RoutingNumber) -> Self {
        self.originating_dfi = dfi;
        self
    }

    pub fn with_names(mut self, destination: impl Into<String>, origin: impl Into<String>) -> Self {
        self.destination_name = Some(destination.into());
        self.origin_name = Some(origin.into());
        self
    }

    pub fn with_discretionary_data(mut self, data: impl Into<String>) -> Self {
        self.discretionary_data = Some(data.into());
        self
    }

    /// Falls back to the destination routing number when no name is configured.
    pub fn destination_name(&self) -> &str {
        self.destination_name
            .as_deref()
            .unwrap_or(self.immediate_destination.as_str())
    }

    pub fn origin_name(&self) -> &str {
        self.origin_name
            .as_deref()
            .unwrap_or(self.immediate_origin.as_str())
    }

    /// First 8 digits of the originating DFI routing number.
    pub fn dfi_prefix(&self) -> &str {
        self.originating_dfi.prefix()
    }

    /// DFI prefix as a number, the high-order part of every trace number.
    pub fn dfi_prefix_value(&self) -> u64 {
        self.originating_dfi.prefix_value()
    }
}
