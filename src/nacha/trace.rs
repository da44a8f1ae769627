//! Trace number suffixes
//!
//! A trace number is the originating DFI's 8-digit prefix followed by a
//! 7-digit per-entry suffix. The suffix source is injected so tests can make
//! files reproducible.

use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};

/// Exclusive upper bound of a trace suffix (7 digits).
pub const TRACE_SUFFIX_LIMIT: u32 = 10_000_000;

/// Supplies the low-order 7 digits of trace numbers.
pub trait TraceSource: Send + Sync {
    /// A value in `0..TRACE_SUFFIX_LIMIT`.
    fn next_suffix(&self) -> u32;
}

/// Build a 15-digit trace number from a DFI prefix and a suffix.
pub fn trace_number(dfi_prefix: u64, suffix: u32) -> u64 {
    dfi_prefix * u64::from(TRACE_SUFFIX_LIMIT) + u64::from(suffix % TRACE_SUFFIX_LIMIT)
}

/// Pseudo-random suffixes. Not unique across files.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTraceSource;

impl TraceSource for RandomTraceSource {
    fn next_suffix(&self) -> u32 {
        rand::thread_rng().gen_range(0..TRACE_SUFFIX_LIMIT)
    }
}

/// Consecutive suffixes starting from a given value.
#[derive(Debug)]
pub struct SequentialTraceSource {
    next: AtomicU32,
}

impl SequentialTraceSource {
    pub fn new(start: u32) -> Self {
        Self {
            next: AtomicU32::new(start % TRACE_SUFFIX_LIMIT),
        }
    }
}

impl TraceSource for SequentialTraceSource {
    fn next_suffix(&self) -> u32 {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                Some((v + 1) % TRACE_SUFFIX_LIMIT)
            })
            .unwrap_or_else(|v| v)
    }
}
