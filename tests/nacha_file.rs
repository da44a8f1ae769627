//! Integration tests for NACHA file generation

use std::sync::Arc;

use ach_origination::domain::{Cents, Direction, PaymentEntry, RoutingNumber};
use ach_origination::nacha::{validate, InMemorySequenceStore, SequentialTraceSource};
use ach_origination::NachaEncoder;

mod common;

use common::{created_at, encoder, entry, party, profile, ymd};

// =========================================================================
// Layout
// =========================================================================

#[test]
fn test_credit_file_round_trip() {
    let entries = vec![entry(10000), entry(25050)];
    let file = encoder()
        .generate_at(&entries, ymd(2026, 10, 21), Direction::Credit, created_at())
        .unwrap();

    let report = validate(&file.content);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);

    let lines: Vec<&str> = file.content.split('\n').collect();
    let batch_control = lines[4];
    assert!(batch_control.starts_with("8220"));
    assert_eq!(&batch_control[20..32], "000000000000");
    assert_eq!(&batch_control[32..44], "000000035050");
    assert_eq!(file.total_amount, Cents::new(35050));
    assert_eq!(file.filename, "ACH_CR_20261021_140509.txt");
}

#[test]
fn test_every_line_is_94_and_blocks_are_full() {
    for count in [1usize, 5, 6, 7, 16, 23] {
        let entries: Vec<PaymentEntry> = (0..count).map(|i| entry(100 + i as u64)).collect();
        let file = encoder()
            .generate_at(&entries, ymd(2026, 10, 20), Direction::Debit, created_at())
            .unwrap();

        let lines: Vec<&str> = file.content.split('\n').collect();
        assert_eq!(lines.len() % 10, 0, "{count} entries");
        assert!(lines.iter().all(|l| l.len() == 94), "{count} entries");
        assert_eq!(lines.iter().filter(|l| l.starts_with('6')).count(), count);
    }
}

#[test]
fn test_headers() {
    let file = encoder()
        .generate_at(&[entry(100)], ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    let lines: Vec<&str> = file.content.split('\n').collect();

    let header = lines[0];
    assert_eq!(&header[0..3], "101");
    assert_eq!(&header[3..13], " 091000019");
    assert_eq!(&header[13..23], " 123456789");
    assert_eq!(&header[23..29], "261019");
    assert_eq!(&header[29..33], "1405");
    assert_eq!(&header[33..34], "1");
    assert_eq!(&header[34..40], "094101");
    assert_eq!(header[40..63].trim_end(), "FEDERAL RESERVE BANK");

    let batch = lines[1];
    assert_eq!(&batch[1..4], "225");
    assert_eq!(batch[4..20].trim_end(), "ACME CORP");
    assert_eq!(&batch[50..53], "CCD");
    assert_eq!(batch[53..63].trim_end(), "DR PAYMENT");
    assert_eq!(&batch[69..75], "261020");
    assert_eq!(&batch[79..87], "12345678");
    assert_eq!(&batch[87..94], "0000001");
}

#[test]
fn test_separate_originating_dfi_drives_traces() {
    let profile = profile().with_originating_dfi(RoutingNumber::parse("987654321").unwrap());
    let encoder = NachaEncoder::new(
        profile,
        Arc::new(InMemorySequenceStore::new()),
        Arc::new(SequentialTraceSource::new(1)),
    );
    let entries = [entry(100), entry(200)];
    let file = encoder
        .generate_at(&entries, ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    let lines: Vec<&str> = file.content.split('\n').collect();

    // immediate origin is untouched
    assert_eq!(&lines[0][13..23], " 123456789");
    assert_eq!(&lines[1][79..87], "98765432");
    for detail in &lines[2..4] {
        assert_eq!(&detail[79..87], &lines[1][79..87]);
    }
    assert_eq!(&lines[5][13..21], "00000002");
    assert!(validate(&file.content).valid);
}

#[test]
fn test_debit_entry_uses_debit_side() {
    let file = encoder()
        .generate_at(&[entry(12345)], ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    let detail = file.content.split('\n').nth(2).unwrap();

    assert_eq!(&detail[0..3], "627");
    assert_eq!(&detail[3..11], "02100002");
    assert_eq!(&detail[11..12], "1");
    assert_eq!(detail[12..29].trim_start(), "1000200030");
    assert_eq!(&detail[29..39], "0000012345");
    assert_eq!(detail[54..76].trim_end(), "ACME OPERATING");
    assert_eq!(&detail[78..79], "0");
    assert_eq!(&detail[79..94], "123456780000001");
}

#[test]
fn test_long_name_truncated_to_22() {
    let long_name = "ABCDEFGHIJKLMNOPQRSTUVWXYZABCD";
    assert_eq!(long_name.len(), 30);
    let payment = PaymentEntry::new(
        party("021000021", "1000200030", long_name),
        party("011000015", "9876543210", "JANE DOE"),
        Cents::new(500),
    )
    .unwrap();

    let file = encoder()
        .generate_at(&[payment], ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    let detail = file.content.split('\n').nth(2).unwrap();

    assert_eq!(detail.len(), 94);
    assert_eq!(&detail[54..76], "ABCDEFGHIJKLMNOPQRSTUV");
}

// =========================================================================
// Control totals
// =========================================================================

#[test]
fn test_file_control_totals_are_exact() {
    let entries = vec![entry(999_999_999), entry(1), entry(4_242)];
    let file = encoder()
        .generate_at(&entries, ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    let lines: Vec<&str> = file.content.split('\n').collect();
    let control = lines[6];

    assert!(control.starts_with("9000001"));
    assert_eq!(&control[7..13], "000001");
    assert_eq!(&control[13..21], "00000003");
    // 3 x (02100002 + 01100001)
    assert_eq!(&control[21..31], "0009600009");
    assert_eq!(&control[31..43], "001000004242");
    assert_eq!(&control[43..55], "001000004242");
}

#[test]
fn test_twelve_digit_total() {
    let max = ach_origination::domain::MAX_ENTRY_CENTS;
    let entries: Vec<PaymentEntry> = (0..100).map(|_| entry(max)).collect();
    let file = encoder()
        .generate_at(&entries, ymd(2026, 10, 20), Direction::Credit, created_at())
        .unwrap();
    assert_eq!(file.total_amount.value(), 999_999_999_900);

    let batch_control = file.content.split('\n').nth(102).unwrap();
    assert!(batch_control.starts_with('8'));
    assert_eq!(&batch_control[32..44], "999999999900");
}

// =========================================================================
// Sequence
// =========================================================================

#[test]
fn test_sequence_wraps_after_nine_advances() {
    let encoder = encoder();
    assert_eq!(encoder.current_sequence().unwrap(), 1);
    for _ in 0..9 {
        encoder.advance_sequence().unwrap();
    }
    assert_eq!(encoder.current_sequence().unwrap(), 1);
}

#[test]
fn test_modifier_follows_sequence() {
    let encoder = encoder();
    encoder.advance_sequence().unwrap();
    encoder.advance_sequence().unwrap();
    let file = encoder
        .generate_at(&[entry(100)], ymd(2026, 10, 20), Direction::Debit, created_at())
        .unwrap();
    assert_eq!(file.file_id_modifier, 3);
    assert_eq!(&file.content[33..34], "3");
}
