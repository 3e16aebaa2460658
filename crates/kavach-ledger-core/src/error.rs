//! Error types for the Kavach ledger core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Both variants are recoverable by the caller: retry the append with a
/// corrected payload, or retry verification with a range inside the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The payload contains a value the canonical encoder cannot represent,
    /// or lacks a usable `timestamp`. The chain is left untouched.
    #[error("invalid payload at {path}: {reason}")]
    InvalidPayload { path: String, reason: String },

    /// A verification window references sequence ids outside the chain.
    #[error("window {start}..={end} is outside the chain (length {len})")]
    RangeError { start: u64, end: u64, len: u64 },
}

impl LedgerError {
    pub(crate) fn invalid_payload(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::InvalidPayload {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// What the verifier found wrong with an entry.
///
/// This is a reportable fact carried inside a
/// [`VerificationResult`](crate::verify::VerificationResult), never an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// Stored `sequence_id` does not match the entry's position.
    SequenceGap,
    /// Stored `prev_chain_hash` does not match the predecessor.
    PrevHashMismatch,
    /// Recomputed payload digest differs from the stored `payload_hash`.
    PayloadHashMismatch,
    /// Recomputed chain digest differs from the stored `chain_hash`.
    ChainHashMismatch,
    /// Stored payload no longer carries a string `timestamp`.
    MissingTimestamp,
    /// Stored payload can no longer be canonicalized.
    InvalidPayload,
}

impl IntegrityViolation {
    /// Short machine-friendly name, used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            IntegrityViolation::SequenceGap => "sequence_gap",
            IntegrityViolation::PrevHashMismatch => "prev_hash_mismatch",
            IntegrityViolation::PayloadHashMismatch => "payload_hash_mismatch",
            IntegrityViolation::ChainHashMismatch => "chain_hash_mismatch",
            IntegrityViolation::MissingTimestamp => "missing_timestamp",
            IntegrityViolation::InvalidPayload => "invalid_payload",
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
