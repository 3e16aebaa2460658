//! Error types for the ledger API.

use kavach_ledger_core::LedgerError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected payload or out-of-range verification window.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// An audit export could not be rendered or parsed.
    #[error("export error: {0}")]
    Export(#[from] serde_json::Error),
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;
