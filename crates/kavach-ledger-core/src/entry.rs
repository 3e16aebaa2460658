//! Ledger entries and the two digests that bind them.
//!
//! An entry is sealed exactly once, when it is appended. Its
//! `payload_hash` covers the canonical payload bytes; its `chain_hash`
//! covers the predecessor's chain hash, the payload hash and the payload
//! timestamp:
//!
//! ```text
//! chain_hash = SHA256(prev_chain_hash "|" payload_hash "|" timestamp "|" "0")
//! ```
//!
//! Both hashes are 64 hex characters and cannot contain `|`, so the
//! timestamp is the only variable-length field and sits between two fixed
//! positions; the input splits back into its fields unambiguously.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_payload_bytes;
use crate::crypto::Hash256;
use crate::error::{LedgerError, Result};
use crate::value::{Payload, Value, TIMESTAMP_KEY};

/// Field separator in the chain-hash input.
pub const CHAIN_SEPARATOR: &str = "|";

/// Fixed trailing field of the chain-hash input.
///
/// Always `"0"`. It has no meaning of its own and is kept so that chain
/// hashes stay compatible with chains already recorded in this format.
pub const CHAIN_RESERVED_FIELD: &str = "0";

/// One immutable record in the ledger.
///
/// Serializes to the flat audit record
/// `{sequence_id, event_type, payload, payload_hash, prev_chain_hash, chain_hash}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the chain, starting at 1, gapless.
    pub sequence_id: u64,

    /// Caller-supplied tag describing the event. Not interpreted.
    pub event_type: String,

    /// The event payload. Always carries a string `timestamp`.
    pub payload: Payload,

    /// SHA-256 of the canonical payload encoding.
    pub payload_hash: Hash256,

    /// Chain hash of the preceding entry, or [`Hash256::ZERO`] for the first.
    pub prev_chain_hash: Hash256,

    /// Digest binding `prev_chain_hash`, `payload_hash` and the timestamp.
    pub chain_hash: Hash256,
}

impl LedgerEntry {
    /// Seal a new entry on top of `prev_chain_hash`.
    ///
    /// Fails with `InvalidPayload` if the payload cannot be canonicalized or
    /// has no string `timestamp`.
    pub fn seal(
        sequence_id: u64,
        event_type: impl Into<String>,
        payload: Payload,
        prev_chain_hash: Hash256,
    ) -> Result<Self> {
        let payload_hash = compute_payload_hash(&payload)?;
        let timestamp = payload_timestamp(&payload)?;
        let chain_hash = compute_chain_hash(&prev_chain_hash, &payload_hash, timestamp);

        Ok(Self {
            sequence_id,
            event_type: event_type.into(),
            payload,
            payload_hash,
            prev_chain_hash,
            chain_hash,
        })
    }

    /// The payload's `timestamp`, if still present as a string.
    pub fn timestamp(&self) -> Option<&str> {
        self.payload.get(TIMESTAMP_KEY).and_then(Value::as_str)
    }

    /// Whether this is the genesis entry.
    pub fn is_first(&self) -> bool {
        self.sequence_id == 1
    }
}

/// SHA-256 over the canonical encoding of a payload.
pub fn compute_payload_hash(payload: &Payload) -> Result<Hash256> {
    let bytes = canonical_payload_bytes(payload)?;
    Ok(Hash256::hash(&bytes))
}

/// The exact byte string hashed into a chain hash.
pub fn chain_input(prev_chain_hash: &Hash256, payload_hash: &Hash256, timestamp: &str) -> Vec<u8> {
    let prev = prev_chain_hash.to_hex();
    let payload = payload_hash.to_hex();
    let mut input = Vec::with_capacity(
        prev.len() + payload.len() + timestamp.len() + CHAIN_RESERVED_FIELD.len() + 3,
    );
    input.extend_from_slice(prev.as_bytes());
    input.extend_from_slice(CHAIN_SEPARATOR.as_bytes());
    input.extend_from_slice(payload.as_bytes());
    input.extend_from_slice(CHAIN_SEPARATOR.as_bytes());
    input.extend_from_slice(timestamp.as_bytes());
    input.extend_from_slice(CHAIN_SEPARATOR.as_bytes());
    input.extend_from_slice(CHAIN_RESERVED_FIELD.as_bytes());
    input
}

/// Chain hash for an entry with the given predecessor, payload digest and
/// timestamp.
pub fn compute_chain_hash(
    prev_chain_hash: &Hash256,
    payload_hash: &Hash256,
    timestamp: &str,
) -> Hash256 {
    Hash256::hash(&chain_input(prev_chain_hash, payload_hash, timestamp))
}

/// Extract the `timestamp` field, which must be a string.
pub fn payload_timestamp(payload: &Payload) -> Result<&str> {
    match payload.get(TIMESTAMP_KEY) {
        Some(Value::String(ts)) => Ok(ts),
        Some(other) => Err(LedgerError::invalid_payload(
            format!("root.{TIMESTAMP_KEY}"),
            format!("timestamp must be a string, got {}", other.kind()),
        )),
        None => Err(LedgerError::invalid_payload(
            format!("root.{TIMESTAMP_KEY}"),
            "missing timestamp",
        )),
    }
}
