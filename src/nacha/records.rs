//! NACHA record layouts
//!
//! One field table per record type. Widths are fixed by the NACHA format
//! and every table adds up to 94 characters.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Cents, Direction, OriginatorProfile, Party};

use super::field::{render_record, FieldSpec, Justify, RECORD_LENGTH};

/// Entry hashes keep the low-order 10 digits.
pub const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

pub const BATCH_NUMBER: &str = "0000001";

/// Lines per block
pub const BLOCKING_FACTOR: usize = 10;

/// Largest entry count that fits the 6-digit batch control count field.
pub const MAX_BATCH_ENTRIES: usize = 999_999;

/// Record type '9' filler used to complete the last block.
pub fn filler_record() -> String {
    "9".repeat(RECORD_LENGTH)
}

fn yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

// =========================================================================
// File Header (1)
// =========================================================================

pub struct FileHeader<'a> {
    pub profile: &'a OriginatorProfile,
    pub created_at: NaiveDateTime,
    pub file_id_modifier: u8,
}

pub fn file_header_layout<'a>() -> [FieldSpec<FileHeader<'a>>; 13] {
    [
        FieldSpec::literal("record_type", "1"),
        FieldSpec::literal("priority_code", "01"),
        FieldSpec::right("immediate_destination", 10, |r| {
            r.profile.immediate_destination.to_string()
        }),
        FieldSpec::right("immediate_origin", 10, |r| r.profile.immediate_origin.to_string()),
        FieldSpec::text("file_creation_date", 6, |r| {
            r.created_at.format("%y%m%d").to_string()
        }),
        FieldSpec::text("file_creation_time", 4, |r| {
            r.created_at.format("%H%M").to_string()
        }),
        FieldSpec::padded("file_id_modifier", 1, Justify::Right, 'A', |r| {
            r.file_id_modifier.to_string()
        }),
        FieldSpec::literal("record_size", "094"),
        FieldSpec::literal("blocking_factor", "10"),
        FieldSpec::literal("format_code", "1"),
        FieldSpec::text("immediate_destination_name", 23, |r| {
            r.profile.destination_name().to_string()
        }),
        FieldSpec::text("immediate_origin_name", 23, |r| {
            r.profile.origin_name().to_string()
        }),
        FieldSpec::blank("reference_code", 8),
    ]
}

// =========================================================================
// Batch Header (5)
// =========================================================================

pub struct BatchHeader<'a> {
    pub profile: &'a OriginatorProfile,
    pub direction: Direction,
    pub effective_date: NaiveDate,
}

pub fn batch_header_layout<'a>() -> [FieldSpec<BatchHeader<'a>>; 13] {
    [
        FieldSpec::literal("record_type", "5"),
        FieldSpec::text("service_class_code", 3, |r| {
            r.direction.service_class_code().to_string()
        }),
        FieldSpec::text("company_name", 16, |r| r.profile.company_name.clone()),
        FieldSpec::text("company_discretionary_data", 20, |r| {
            r.profile.discretionary_data.clone().unwrap_or_default()
        }),
        FieldSpec::text("company_identification", 10, |r| r.profile.company_id.to_string()),
        FieldSpec::literal("standard_entry_class", "CCD"),
        FieldSpec::text("company_entry_description", 10, |r| {
            r.direction.entry_description()
        }),
        FieldSpec::blank("company_descriptive_date", 6),
        FieldSpec::text("effective_entry_date", 6, |r| yymmdd(r.effective_date)),
        FieldSpec::blank("settlement_date", 3),
        FieldSpec::literal("originator_status_code", "1"),
        FieldSpec::text("originating_dfi", 8, |r| r.profile.dfi_prefix().to_string()),
        FieldSpec::literal("batch_number", BATCH_NUMBER),
    ]
}

// =========================================================================
// Entry Detail (6)
// =========================================================================

pub struct EntryDetail<'a> {
    pub direction: Direction,
    /// The party on the receiving side for this file's direction
    pub receiver: &'a Party,
    pub amount: Cents,
    pub trace_number: u64,
}

pub fn entry_detail_layout<'a>() -> [FieldSpec<EntryDetail<'a>>; 11] {
    [
        FieldSpec::literal("record_type", "6"),
        FieldSpec::text("transaction_code", 2, |r| {
            r.direction.transaction_code().to_string()
        }),
        FieldSpec::text("receiving_dfi", 8, |r| r.receiver.routing.prefix().to_string()),
        FieldSpec::text("check_digit", 1, |r| {
            r.receiver.routing.check_digit().to_string()
        }),
        FieldSpec::right("dfi_account_number", 17, |r| r.receiver.account.clone()),
        FieldSpec::numeric("amount", 10, |r| r.amount.value().to_string()),
        FieldSpec::right("individual_identification", 15, |r| {
            r.receiver.identifier.clone()
        }),
        FieldSpec::text("individual_name", 22, |r| r.receiver.name.clone()),
        FieldSpec::blank("discretionary_data", 2),
        FieldSpec::literal("addenda_record_indicator", "0"),
        FieldSpec::numeric("trace_number", 15, |r| r.trace_number.to_string()),
    ]
}

// =========================================================================
// Batch Control (8)
// =========================================================================

pub struct BatchControl<'a> {
    pub profile: &'a OriginatorProfile,
    pub direction: Direction,
    pub entry_count: usize,
    pub entry_hash: u64,
    pub total: Cents,
}

impl BatchControl<'_> {
    fn debit_total(&self) -> u64 {
        match self.direction {
            Direction::Debit => self.total.value(),
            Direction::Credit => 0,
        }
    }

    fn credit_total(&self) -> u64 {
        match self.direction {
            Direction::Debit => 0,
            Direction::Credit => self.total.value(),
        }
    }
}

pub fn batch_control_layout<'a>() -> [FieldSpec<BatchControl<'a>>; 11] {
    [
        FieldSpec::literal("record_type", "8"),
        FieldSpec::text("service_class_code", 3, |r| {
            r.direction.service_class_code().to_string()
        }),
        FieldSpec::numeric("entry_addenda_count", 6, |r| r.entry_count.to_string()),
        FieldSpec::numeric("entry_hash", 10, |r| {
            (r.entry_hash % ENTRY_HASH_MODULUS).to_string()
        }),
        FieldSpec::numeric("total_debit_amount", 12, |r| r.debit_total().to_string()),
        FieldSpec::numeric("total_credit_amount", 12, |r| r.credit_total().to_string()),
        FieldSpec::text("company_identification", 10, |r| r.profile.company_id.to_string()),
        FieldSpec::blank("message_authentication_code", 19),
        FieldSpec::blank("reserved", 6),
        FieldSpec::text("originating_dfi", 8, |r| r.profile.dfi_prefix().to_string()),
        FieldSpec::literal("batch_number", BATCH_NUMBER),
    ]
}

// =========================================================================
// File Control (9)
// =========================================================================

pub struct FileControl {
    pub block_count: usize,
    pub entry_count: usize,
    pub entry_hash: u64,
    pub total: Cents,
}

pub fn file_control_layout() -> [FieldSpec<FileControl>; 8] {
    [
        FieldSpec::literal("record_type", "9"),
        FieldSpec::literal("batch_count", "000001"),
        FieldSpec::numeric("block_count", 6, |r| r.block_count.to_string()),
        FieldSpec::numeric("entry_addenda_count", 8, |r| r.entry_count.to_string()),
        FieldSpec::numeric("entry_hash", 10, |r| {
            (r.entry_hash % ENTRY_HASH_MODULUS).to_string()
        }),
        FieldSpec::numeric("total_debit_amount", 12, |r| r.total.value().to_string()),
        FieldSpec::numeric("total_credit_amount", 12, |r| r.total.value().to_string()),
        FieldSpec::blank("reserved", 39),
    ]
}

impl FileHeader<'_> {
    pub fn render(&self) -> String {
        render_record(&file_header_layout(), self)
    }
}

impl BatchHeader<'_> {
    pub fn render(&self) -> String {
        render_record(&batch_header_layout(), self)
    }
}

impl EntryDetail<'_> {
    pub fn render(&self) -> String {
        render_record(&entry_detail_layout(), self)
    }
}

impl BatchControl<'_> {
    pub fn render(&self) -> String {
        render_record(&batch_control_layout(), self)
    }
}

impl FileControl {
    pub fn render(&self) -> String {
        render_record(&file_control_layout(), self)
    }
}

/// Block count written into the file control record, `ceil((5 + n) / 10)`.
///
/// This counts one record more than the file holds, so a file that fills its
/// last block exactly reports an extra block.
pub fn block_count(entry_count: usize) -> usize {
    (5 + entry_count).div_ceil(BLOCKING_FACTOR)
}
