//! NACHA file encoder
//!
//! Turns an ordered list of payment entries into a single-batch CCD file:
//! file header, batch header, one entry detail per payment, batch control,
//! file control, and filler records up to a whole block.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    content_digest, Cents, Direction, GeneratedFile, OriginatorProfile, PaymentEntry,
    MAX_TOTAL_CENTS,
};

use super::error::NachaError;
use super::field::RECORD_LENGTH;
use super::records::{
    block_count, filler_record, BatchControl, BatchHeader, EntryDetail, FileControl, FileHeader,
    BLOCKING_FACTOR, MAX_BATCH_ENTRIES,
};
use super::sequence::SequenceStore;
use super::trace::{trace_number, TraceSource};

/// Structural check result. Advisory only: a valid report does not mean a
/// bank will accept the file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Generates NACHA files for one originator.
///
/// `generate` only reads the sequence counter, so the encoder can be shared
/// across threads; `advance_sequence` is the single mutating operation.
pub struct NachaEncoder {
    profile: OriginatorProfile,
    sequence: Arc<dyn SequenceStore>,
    trace: Arc<dyn TraceSource>,
}

impl NachaEncoder {
    pub fn new(
        profile: OriginatorProfile,
        sequence: Arc<dyn SequenceStore>,
        trace: Arc<dyn TraceSource>,
    ) -> Self {
        Self {
            profile,
            sequence,
            trace,
        }
    }

    /// Generate a file stamped with the current local time.
    pub fn generate(
        &self,
        entries: &[PaymentEntry],
        effective_date: NaiveDate,
        direction: Direction,
    ) -> Result<GeneratedFile, NachaError> {
        self.generate_at(entries, effective_date, direction, Local::now().naive_local())
    }

    /// Generate a file with an explicit creation instant.
    ///
    /// Entries are written in the order given. The sequence counter is read
    /// but not advanced.
    pub fn generate_at(
        &self,
        entries: &[PaymentEntry],
        effective_date: NaiveDate,
        direction: Direction,
        created_at: NaiveDateTime,
    ) -> Result<GeneratedFile, NachaError> {
        check_entry_count(entries.len())?;

        let total_amount = batch_total(entries)?;
        let file_id_modifier = self.sequence.current()?;

        let content = self.render(
            entries,
            effective_date,
            direction,
            created_at,
            file_id_modifier,
            total_amount,
        );
        let filename = filename(direction, effective_date, created_at);

        tracing::info!(
            filename = %filename,
            direction = %direction,
            entry_count = entries.len(),
            total_cents = total_amount.value(),
            file_id_modifier,
            "Generated NACHA file"
        );

        Ok(GeneratedFile {
            id: Uuid::new_v4(),
            filename,
            content_sha256: content_digest(&content),
            content,
            entry_count: entries.len(),
            total_amount,
            effective_date,
            direction,
            file_id_modifier,
            created_at,
            transmitted: false,
        })
    }

    pub fn current_sequence(&self) -> Result<u8, NachaError> {
        Ok(self.sequence.current()?)
    }

    /// Advance the file sequence counter, wrapping 9 back to 1.
    ///
    /// Call only after the generated file has been persisted.
    pub fn advance_sequence(&self) -> Result<u8, NachaError> {
        let next = self.sequence.advance()?;
        tracing::debug!(sequence = next, "Advanced file sequence");
        Ok(next)
    }

    /// See [`validate`].
    pub fn validate(&self, content: &str) -> ValidationReport {
        validate(content)
    }

    fn render(
        &self,
        entries: &[PaymentEntry],
        effective_date: NaiveDate,
        direction: Direction,
        created_at: NaiveDateTime,
        file_id_modifier: u8,
        total: Cents,
    ) -> String {
        let mut lines = Vec::with_capacity(entries.len() + BLOCKING_FACTOR + 4);

        lines.push(
            FileHeader {
                profile: &self.profile,
                created_at,
                file_id_modifier,
            }
            .render(),
        );
        lines.push(
            BatchHeader {
                profile: &self.profile,
                direction,
                effective_date,
            }
            .render(),
        );

        let dfi_prefix = self.profile.dfi_prefix_value();
        for entry in entries {
            lines.push(
                EntryDetail {
                    direction,
                    receiver: entry.receiver(direction),
                    amount: entry.amount(),
                    trace_number: trace_number(dfi_prefix, self.trace.next_suffix()),
                }
                .render(),
            );
        }

        lines.push(
            BatchControl {
                profile: &self.profile,
                direction,
                entry_count: entries.len(),
                entry_hash: batch_entry_hash(entries, direction),
                total,
            }
            .render(),
        );
        lines.push(
            FileControl {
                block_count: block_count(entries.len()),
                entry_count: entries.len(),
                entry_hash: file_entry_hash(entries),
                total,
            }
            .render(),
        );

        while lines.len() % BLOCKING_FACTOR != 0 {
            lines.push(filler_record());
        }

        lines.join("\n")
    }
}

/// A batch needs at least one entry and no more than the count fields hold.
pub fn check_entry_count(count: usize) -> Result<(), NachaError> {
    if count == 0 {
        return Err(NachaError::EmptyBatch);
    }
    if count > MAX_BATCH_ENTRIES {
        return Err(NachaError::TooManyEntries {
            count,
            limit: MAX_BATCH_ENTRIES,
        });
    }
    Ok(())
}

/// Exact sum of entry amounts, limited to the 12-digit control fields.
pub fn batch_total(entries: &[PaymentEntry]) -> Result<Cents, NachaError> {
    Cents::total(entries.iter().map(PaymentEntry::amount))
        .filter(|total| total.value() <= MAX_TOTAL_CENTS)
        .ok_or_else(|| NachaError::AmountOverflow {
            total_cents: entries.iter().map(|e| u128::from(e.amount().value())).sum(),
        })
}

/// Sum of the receiving side's 8-digit routing prefixes.
pub fn batch_entry_hash(entries: &[PaymentEntry], direction: Direction) -> u64 {
    entries
        .iter()
        .map(|e| e.receiver(direction).routing.prefix_value())
        .sum()
}

/// Sum of both sides' routing prefixes over every entry.
///
/// Unlike the batch hash this counts debit and credit routing numbers alike;
/// kept as the reconciliation files have always been produced.
pub fn file_entry_hash(entries: &[PaymentEntry]) -> u64 {
    entries
        .iter()
        .map(|e| e.debit().routing.prefix_value() + e.credit().routing.prefix_value())
        .sum()
}

/// `ACH_{DR|CR}_{YYYYMMDD}_{HHMMSS}.txt`
pub fn filename(
    direction: Direction,
    effective_date: NaiveDate,
    created_at: NaiveDateTime,
) -> String {
    format!(
        "ACH_{}_{}_{}.txt",
        direction.code(),
        effective_date.format("%Y%m%d"),
        created_at.format("%H%M%S")
    )
}

/// Lightweight structural check of generated content.
///
/// Looks at the record order of the first two lines and line widths only.
pub fn validate(content: &str) -> ValidationReport {
    let mut errors = Vec::new();
    let lines: Vec<&str> = content.split('\n').collect();

    if lines.len() < 4 {
        errors.push(
            "File must have at least 4 records (header, batch header, batch control, file control)"
                .to_string(),
        );
    }

    if !lines.first().is_some_and(|l| l.starts_with('1')) {
        errors.push("First record must be File Header (type 1)".to_string());
    }

    if lines.len() > 1 && !lines[1].starts_with('5') {
        errors.push("Second record must be Batch Header (type 5)".to_string());
    }

    let last = lines.len().saturating_sub(1);
    for (index, line) in lines.iter().enumerate() {
        if index < last && line.chars().count() != RECORD_LENGTH {
            errors.push(format!(
                "Line {} must be exactly {} characters (found {})",
                index + 1,
                RECORD_LENGTH,
                line.chars().count()
            ));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Party, RoutingNumber};
    use crate::nacha::sequence::InMemorySequenceStore;
    use crate::nacha::trace::SequentialTraceSource;

    fn encoder() -> NachaEncoder {
        let profile =
            OriginatorProfile::try_new("091000019", "123456789", "ACME CORP", "1234567890")
                .unwrap();
        NachaEncoder::new(
            profile,
            Arc::new(InMemorySequenceStore::new()),
            Arc::new(SequentialTraceSource::new(1)),
        )
    }

    fn entry(debit_routing: &str, credit_routing: &str, cents: u64) -> PaymentEntry {
        PaymentEntry::new(
            Party::new(RoutingNumber::parse(debit_routing).unwrap(), "111111", "DR-ID", "PAYER"),
            Party::new(RoutingNumber::parse(credit_routing).unwrap(), "222222", "CR-ID", "PAYEE"),
            Cents::new(cents),
        )
        .unwrap()
    }

    fn created_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 15)
            .unwrap()
    }

    fn effective() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    #[test]
    fn test_empty_batch_rejected() {
        let result = encoder().generate(&[], effective(), Direction::Debit);
        assert!(matches!(result, Err(NachaError::EmptyBatch)));
    }

    #[test]
    fn test_entry_count_limit() {
        assert!(check_entry_count(1).is_ok());
        assert!(check_entry_count(MAX_BATCH_ENTRIES).is_ok());

        let err = check_entry_count(MAX_BATCH_ENTRIES + 1).unwrap_err();
        assert!(matches!(err, NachaError::TooManyEntries { count: 1_000_000, limit: 999_999 }));
        assert!(err.is_precondition_failure());
        assert!(matches!(check_entry_count(0), Err(NachaError::EmptyBatch)));
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            filename(Direction::Debit, effective(), created_at()),
            "ACH_DR_20261020_093015.txt"
        );
    }

    #[test]
    fn test_layout_and_padding() {
        let file = encoder()
            .generate_at(
                &[entry("021000021", "011000015", 100)],
                effective(),
                Direction::Debit,
                created_at(),
            )
            .unwrap();

        let lines: Vec<&str> = file.content.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines.iter().all(|l| l.len() == 94));
        assert!(lines[0].starts_with('1'));
        assert!(lines[1].starts_with('5'));
        assert!(lines[2].starts_with('6'));
        assert!(lines[3].starts_with('8'));
        assert!(lines[4].starts_with('9'));
        assert!(lines[5..].iter().all(|l| *l == "9".repeat(94)));
        assert!(!file.content.ends_with('\n'));
    }

    #[test]
    fn test_exact_block_needs_no_filler() {
        let entries: Vec<_> = (0..6).map(|i| entry("021000021", "011000015", 100 + i)).collect();
        let file = encoder()
            .generate_at(&entries, effective(), Direction::Credit, created_at())
            .unwrap();
        assert_eq!(file.line_count(), 10);
        assert!(!file.content.contains(&"9".repeat(94)));
    }

    #[test]
    fn test_entry_hashes() {
        let entries = vec![
            entry("021000021", "011000015", 100),
            entry("021000021", "091000019", 200),
        ];
        // credit side: 01100001 + 09100001
        assert_eq!(batch_entry_hash(&entries, Direction::Credit), 1_100_001 + 9_100_001);
        // debit side: 02100002 twice
        assert_eq!(batch_entry_hash(&entries, Direction::Debit), 4_200_004);
        assert_eq!(
            file_entry_hash(&entries),
            4_200_004 + 1_100_001 + 9_100_001
        );
    }

    #[test]
    fn test_trace_numbers_follow_dfi_prefix() {
        let entries = vec![
            entry("021000021", "011000015", 100),
            entry("021000021", "011000015", 200),
        ];
        let file = encoder()
            .generate_at(&entries, effective(), Direction::Debit, created_at())
            .unwrap();
        let lines: Vec<&str> = file.content.lines().collect();
        assert_eq!(&lines[2][79..94], "123456780000001");
        assert_eq!(&lines[3][79..94], "123456780000002");
    }

    #[test]
    fn test_generate_does_not_advance_sequence() {
        let encoder = encoder();
        let entries = [entry("021000021", "011000015", 100)];
        let generate = || {
            encoder
                .generate_at(&entries, effective(), Direction::Debit, created_at())
                .unwrap()
        };
        let first = generate();
        let second = generate();
        assert_eq!(first.file_id_modifier, 1);
        assert_eq!(second.file_id_modifier, 1);

        assert_eq!(encoder.advance_sequence().unwrap(), 2);
        let third = generate();
        assert_eq!(third.file_id_modifier, 2);
        assert_eq!(&third.content[33..34], "2");
    }

    #[test]
    fn test_total_overflow() {
        let entries: Vec<_> = (0..101)
            .map(|_| entry("021000021", "011000015", crate::domain::MAX_ENTRY_CENTS))
            .collect();
        let result = encoder().generate_at(&entries, effective(), Direction::Debit, created_at());
        assert!(matches!(result, Err(NachaError::AmountOverflow { .. })));
    }

    #[test]
    fn test_digest_matches_content() {
        let entries = [entry("021000021", "011000015", 100)];
        let file = encoder()
            .generate_at(&entries, effective(), Direction::Debit, created_at())
            .unwrap();
        assert!(file.verify_digest());
        assert!(!file.transmitted);
    }

    #[test]
    fn test_validate_reports_defects() {
        let report = validate("5short\n1line");
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 4);
        assert!(report.errors[0].contains("at least 4 records"));
        assert!(report.errors[1].contains("type 1"));
        assert!(report.errors[2].contains("type 5"));
        assert!(report.errors[3].starts_with("Line 1"));
    }

    #[test]
    fn test_validate_ignores_last_line_width() {
        let line = "1".to_string() + &" ".repeat(93);
        let batch = "5".to_string() + &" ".repeat(93);
        let content = format!("{line}\n{batch}\n{line}\nshort");
        assert_eq!(validate(&content), ValidationReport { valid: true, errors: vec![] });
    }
}
