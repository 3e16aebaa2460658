//! Chain verification: recompute every digest and report the first mismatch.
//!
//! Two modes:
//! - **full**: walk from genesis, starting at the sentinel hash.
//! - **window**: walk `start..=end`, starting at the *stored* chain hash of
//!   entry `start - 1`. This is a relative check. A window can pass while
//!   the full walk fails if tampering happened before the window, so the
//!   two results are always reported separately.
//!
//! The walk stops at the first failing entry. Everything after a forged
//! entry is already untrustworthy, so later mismatches are not reported.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::crypto::Hash256;
use crate::entry::{compute_chain_hash, compute_payload_hash, LedgerEntry};
use crate::error::{IntegrityViolation, LedgerError, Result};

/// Outcome of a verification walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether every checked entry matched.
    pub valid: bool,

    /// Sequence id (by position) of the first entry that failed.
    pub first_failure_sequence_id: Option<u64>,

    /// Entries examined, including the failing one.
    pub checked_count: u64,

    /// What was wrong with the failing entry.
    pub failure: Option<IntegrityViolation>,
}

impl VerificationResult {
    /// A passing result over `checked_count` entries.
    pub fn ok(checked_count: u64) -> Self {
        Self {
            valid: true,
            first_failure_sequence_id: None,
            checked_count,
            failure: None,
        }
    }

    /// A failing result.
    pub fn failed(sequence_id: u64, checked_count: u64, violation: IntegrityViolation) -> Self {
        Self {
            valid: false,
            first_failure_sequence_id: Some(sequence_id),
            checked_count,
            failure: Some(violation),
        }
    }
}

/// Verify an entire chain from genesis.
///
/// An empty chain is valid with zero entries checked.
pub fn verify_full(entries: &[LedgerEntry]) -> VerificationResult {
    walk(entries, 1, Hash256::ZERO)
}

/// Verify entries `start..=end` (sequence ids, inclusive).
///
/// Fails with `RangeError` if `start` is 0, `start > end`, or `end` is past
/// the last entry.
pub fn verify_window(entries: &[LedgerEntry], start: u64, end: u64) -> Result<VerificationResult> {
    let len = entries.len() as u64;
    if start == 0 || start > end || end > len {
        return Err(LedgerError::RangeError { start, end, len });
    }

    let first = (start - 1) as usize;
    let prev = match first.checked_sub(1) {
        Some(before) => entries[before].chain_hash,
        None => Hash256::ZERO,
    };
    Ok(walk(&entries[first..end as usize], start, prev))
}

/// Verify the last `count` entries, or all of them if fewer exist.
pub fn verify_recent(entries: &[LedgerEntry], count: usize) -> VerificationResult {
    let take = count.min(entries.len());
    if take == 0 {
        return VerificationResult::ok(0);
    }
    let start = entries.len() - take;
    let prev = match start.checked_sub(1) {
        Some(before) => entries[before].chain_hash,
        None => Hash256::ZERO,
    };
    walk(&entries[start..], start as u64 + 1, prev)
}

/// Verify a detached run of entries whose predecessor is not at hand, such
/// as the tail of an audit export.
///
/// The first entry's stored `sequence_id` and `prev_chain_hash` are taken as
/// the anchor, so this only shows the run is internally consistent.
pub fn verify_detached(entries: &[LedgerEntry]) -> VerificationResult {
    match entries.first() {
        Some(first) => walk(entries, first.sequence_id, first.prev_chain_hash),
        None => VerificationResult::ok(0),
    }
}

/// Check a single entry against the hash it should link to.
pub fn check_entry(
    entry: &LedgerEntry,
    expected_sequence_id: u64,
    expected_prev: &Hash256,
) -> std::result::Result<(), IntegrityViolation> {
    if entry.sequence_id != expected_sequence_id {
        return Err(IntegrityViolation::SequenceGap);
    }
    if entry.prev_chain_hash != *expected_prev {
        return Err(IntegrityViolation::PrevHashMismatch);
    }

    let payload_hash =
        compute_payload_hash(&entry.payload).map_err(|_| IntegrityViolation::InvalidPayload)?;
    if payload_hash != entry.payload_hash {
        return Err(IntegrityViolation::PayloadHashMismatch);
    }

    let timestamp = entry.timestamp().ok_or(IntegrityViolation::MissingTimestamp)?;
    if compute_chain_hash(expected_prev, &payload_hash, timestamp) != entry.chain_hash {
        return Err(IntegrityViolation::ChainHashMismatch);
    }
    Ok(())
}

fn walk(entries: &[LedgerEntry], first_sequence_id: u64, mut prev: Hash256) -> VerificationResult {
    let mut checked = 0u64;
    for (offset, entry) in entries.iter().enumerate() {
        checked += 1;

        // A detached run anchored near u64::MAX cannot be contiguous. The
        // position has no u64 id, so the stored one is reported.
        let Some(expected_id) = first_sequence_id.checked_add(offset as u64) else {
            warn!(
                anchor = first_sequence_id,
                offset,
                "ledger verification failed: sequence id out of range"
            );
            return VerificationResult::failed(
                entry.sequence_id,
                checked,
                IntegrityViolation::SequenceGap,
            );
        };

        if let Err(violation) = check_entry(entry, expected_id, &prev) {
            warn!(
                seq = expected_id,
                violation = violation.as_str(),
                "ledger verification failed"
            );
            return VerificationResult::failed(expected_id, checked, violation);
        }
        prev = entry.chain_hash;
    }
    VerificationResult::ok(checked)
}
