//! # Kavach Ledger Testkit
//!
//! Testing utilities for the Kavach ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: ready-made chains and security-operations payloads
//! - **Tamper**: helpers that corrupt exported entries to exercise the
//!   verifier's failure path. The production API is append-only; these only
//!   touch owned copies.
//! - **Generators**: proptest strategies for payload values
//! - **Golden vectors**: fixed inputs with expected canonical bytes and
//!   digests, for cross-implementation checks
//!
//! ## Tampering
//!
//! ```rust
//! use kavach_ledger_core::verify::verify_full;
//! use kavach_ledger_testkit::{fixtures::chain_of, tamper::{tamper, TamperField}};
//!
//! let mut entries = chain_of(3).into_entries();
//! assert!(tamper(&mut entries, 2, TamperField::ChainHash));
//!
//! let result = verify_full(&entries);
//! assert!(!result.valid);
//! assert_eq!(result.first_failure_sequence_id, Some(2));
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use kavach_ledger_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod tamper;
pub mod vectors;

pub use fixtures::{chain_of, login_dispatch_chain, ops_payload, OPS_EVENT_TYPES};
pub use generators::{payload_strategy, value_strategy};
pub use tamper::{
    corrupt_chain_hash, corrupt_payload, corrupt_payload_hash, corrupt_prev_chain_hash, tamper,
    TamperField,
};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
