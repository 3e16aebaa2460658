//! # Kavach Ledger
//!
//! A tamper-evident, append-only event ledger. Each entry is hash-linked to
//! its predecessor so that any later edit, removal or reordering is caught
//! by re-verification.
//!
//! ## Overview
//!
//! - **Append**: callers record `(event_type, payload)`; the returned
//!   [`LedgerEntry`] is a permanent receipt whose `chain_hash` can be quoted
//!   to auditors.
//! - **Verify**: [`Ledger::verify_full`] walks from genesis;
//!   [`Ledger::verify_window`] checks a sub-range relative to the entry
//!   before it. Tampering is reported as a value, never as an error.
//! - **Report**: [`Ledger::summary`] and [`Ledger::audit_export`] surface
//!   windowed and full-chain validity side by side.
//!
//! ## Usage
//!
//! ```rust
//! use kavach_ledger::{payload, Ledger, LedgerConfig};
//!
//! let ledger = Ledger::new(LedgerConfig::default());
//!
//! let a = ledger.append("login", payload! { "timestamp" => "T1" }).unwrap();
//! let b = ledger.append("dispatch", payload! { "timestamp" => "T2" }).unwrap();
//! assert_eq!(b.prev_chain_hash, a.chain_hash);
//!
//! let result = ledger.verify_full();
//! assert!(result.valid);
//! assert_eq!(result.checked_count, 2);
//! ```
//!
//! ## Re-exports
//!
//! - `kavach_ledger::core` - Pure primitives (encoder, chain, verifier)

pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod report;

pub use kavach_ledger_core as core;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LedgerConfig, TimestampFormat};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use report::{AuditExport, LedgerSummary, RecentEntry};

// Re-export commonly used core types
pub use kavach_ledger_core::{
    payload, Hash256, HashChain, IntegrityViolation, LedgerEntry, LedgerError, Payload, Value,
    VerificationResult,
};
