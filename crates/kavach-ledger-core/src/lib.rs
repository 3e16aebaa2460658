//! # Kavach Ledger Core
//!
//! Pure primitives for the Kavach tamper-evident event ledger: canonical
//! payload encoding, hash-chained entries, and chain verification.
//!
//! This crate contains no I/O, no locks, no clocks. It is pure computation
//! over an owned entry sequence.
//!
//! ## Key Types
//!
//! - [`Value`] / [`Payload`] - Recursive payload values
//! - [`LedgerEntry`] - One immutable, hash-linked record
//! - [`HashChain`] - The ordered, append-only entry sequence
//! - [`VerificationResult`] - Outcome of a full or windowed verification
//!
//! ## Chaining
//!
//! ```text
//! payload_hash = SHA256(canonical(payload))
//! chain_hash   = SHA256(prev_chain_hash "|" payload_hash "|" timestamp "|" "0")
//! ```
//!
//! The first entry links to [`Hash256::ZERO`]. See [`canonical`] for the
//! encoding rules and [`verify`] for the verification modes.
//!
//! ```
//! use kavach_ledger_core::{payload, HashChain};
//!
//! let mut chain = HashChain::new();
//! chain.append("login", payload! { "timestamp" => "T1" }).unwrap();
//! chain.append("dispatch", payload! { "timestamp" => "T2" }).unwrap();
//!
//! let result = chain.verify_full();
//! assert!(result.valid);
//! assert_eq!(result.checked_count, 2);
//! ```

pub mod canonical;
pub mod chain;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod value;
pub mod verify;

pub use canonical::{canonical_payload_bytes, canonical_value_bytes};
pub use chain::HashChain;
pub use crypto::Hash256;
pub use entry::{
    chain_input, compute_chain_hash, compute_payload_hash, LedgerEntry, CHAIN_RESERVED_FIELD,
    CHAIN_SEPARATOR,
};
pub use error::{IntegrityViolation, LedgerError, Result};
pub use value::{payload_from_json, Payload, Value, TIMESTAMP_KEY};
pub use verify::VerificationResult;
