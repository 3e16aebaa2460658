//! Deliberate corruption of exported entries.
//!
//! Every helper works on an owned `[LedgerEntry]` (e.g. from
//! `HashChain::into_entries`) and leaves all other fields alone, so the
//! verifier sees exactly one altered field.

use kavach_ledger_core::{Hash256, LedgerEntry, Value};

/// Which stored field to corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TamperField {
    /// Add a field to the payload without re-hashing.
    Payload,
    /// Replace the stored payload digest.
    PayloadHash,
    /// Replace the stored predecessor link.
    PrevChainHash,
    /// Replace the stored chain digest.
    ChainHash,
}

impl TamperField {
    pub const ALL: [TamperField; 4] = [
        TamperField::Payload,
        TamperField::PayloadHash,
        TamperField::PrevChainHash,
        TamperField::ChainHash,
    ];
}

/// Corrupt one field of the entry with `sequence_id`.
///
/// Returns `false` if no entry has that sequence id.
pub fn tamper(entries: &mut [LedgerEntry], sequence_id: u64, field: TamperField) -> bool {
    let Some(entry) = entries.iter_mut().find(|e| e.sequence_id == sequence_id) else {
        return false;
    };
    match field {
        TamperField::Payload => {
            entry
                .payload
                .insert("tampered".to_string(), Value::Bool(true));
        }
        TamperField::PayloadHash => entry.payload_hash = flip(&entry.payload_hash),
        TamperField::PrevChainHash => entry.prev_chain_hash = flip(&entry.prev_chain_hash),
        TamperField::ChainHash => entry.chain_hash = flip(&entry.chain_hash),
    }
    true
}

/// Add a field to the payload of `sequence_id` without re-hashing.
pub fn corrupt_payload(entries: &mut [LedgerEntry], sequence_id: u64) -> bool {
    tamper(entries, sequence_id, TamperField::Payload)
}

pub fn corrupt_payload_hash(entries: &mut [LedgerEntry], sequence_id: u64) -> bool {
    tamper(entries, sequence_id, TamperField::PayloadHash)
}

pub fn corrupt_prev_chain_hash(entries: &mut [LedgerEntry], sequence_id: u64) -> bool {
    tamper(entries, sequence_id, TamperField::PrevChainHash)
}

pub fn corrupt_chain_hash(entries: &mut [LedgerEntry], sequence_id: u64) -> bool {
    tamper(entries, sequence_id, TamperField::ChainHash)
}

/// Replace the payload of an entry with `replacement`, keeping its hashes.
pub fn replace_payload(
    entries: &mut [LedgerEntry],
    sequence_id: u64,
    replacement: kavach_ledger_core::Payload,
) -> bool {
    match entries.iter_mut().find(|e| e.sequence_id == sequence_id) {
        Some(entry) => {
            entry.payload = replacement;
            true
        }
        None => false,
    }
}

/// Swap two entries in place, leaving their stored fields untouched.
pub fn swap_entries(entries: &mut [LedgerEntry], a: u64, b: u64) -> bool {
    let ia = entries.iter().position(|e| e.sequence_id == a);
    let ib = entries.iter().position(|e| e.sequence_id == b);
    match (ia, ib) {
        (Some(ia), Some(ib)) => {
            entries.swap(ia, ib);
            true
        }
        _ => false,
    }
}

/// A digest guaranteed to differ from `hash` in two nibbles.
pub fn flip(hash: &Hash256) -> Hash256 {
    let mut bytes = *hash.as_bytes();
    bytes[2] ^= 0x0f;
    bytes[8] ^= 0xf0;
    Hash256::from_bytes(bytes)
}
