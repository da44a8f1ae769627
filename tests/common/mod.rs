//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use ach_origination::domain::{Cents, OriginatorProfile, Party, PaymentEntry, RoutingNumber};
use ach_origination::nacha::{InMemorySequenceStore, SequentialTraceSource};
use ach_origination::NachaEncoder;
use chrono::{NaiveDate, NaiveDateTime};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fixed creation instant so filenames and headers are predictable
pub fn created_at() -> NaiveDateTime {
    ymd(2026, 10, 19).and_hms_opt(14, 5, 9).unwrap()
}

pub fn profile() -> OriginatorProfile {
    OriginatorProfile::try_new("091000019", "123456789", "ACME CORP", "1234567890")
        .unwrap()
        .with_names("FEDERAL RESERVE BANK", "ACME BANK")
}

/// Encoder with an in-memory sequence starting at 1 and trace suffixes from 1
pub fn encoder() -> NachaEncoder {
    NachaEncoder::new(
        profile(),
        Arc::new(InMemorySequenceStore::new()),
        Arc::new(SequentialTraceSource::new(1)),
    )
}

pub fn party(routing: &str, account: &str, name: &str) -> Party {
    Party::new(RoutingNumber::parse(routing).unwrap(), account, "CUST-001", name)
}

pub fn entry(cents: u64) -> PaymentEntry {
    PaymentEntry::new(
        party("021000021", "1000200030", "ACME OPERATING"),
        party("011000015", "9876543210", "JANE DOE"),
        Cents::new(cents),
    )
    .unwrap()
}
