//! Read-side reports: the dashboard summary and the audit export.
//!
//! Both carry a full-chain result and a windowed result as separate fields.
//! A window that verifies says nothing about entries before it.

use serde::{Deserialize, Serialize};

use kavach_ledger_core::verify::{verify_detached, verify_full, verify_recent};
use kavach_ledger_core::{Hash256, HashChain, LedgerEntry, VerificationResult};

use crate::error::Result;

/// Short form of an entry for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEntry {
    pub sequence_id: u64,
    pub event_type: String,
    pub chain_hash: Hash256,
}

impl From<&LedgerEntry> for RecentEntry {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            sequence_id: entry.sequence_id,
            event_type: entry.event_type.clone(),
            chain_hash: entry.chain_hash,
        }
    }
}

/// Chain status over a recent window plus the whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Total number of entries.
    pub length: u64,
    /// Window size requested.
    pub window: usize,
    /// Whether the last `window` entries verify relative to their anchor.
    pub recent_valid: bool,
    /// Whether the whole chain verifies from genesis.
    pub full_valid: bool,
    /// Detailed windowed result.
    pub recent_result: VerificationResult,
    /// Detailed full-chain result.
    pub full_result: VerificationResult,
    /// Chain hash of the newest entry.
    pub latest_chain_hash: Option<Hash256>,
    /// The entries covered by the window, oldest first.
    pub recent: Vec<RecentEntry>,
}

impl LedgerSummary {
    pub(crate) fn build(chain: &HashChain, window: usize) -> Self {
        let entries = chain.as_slice();
        let recent_result = verify_recent(entries, window);
        let full_result = verify_full(entries);
        let skip = entries.len().saturating_sub(window);

        Self {
            length: entries.len() as u64,
            window,
            recent_valid: recent_result.valid,
            full_valid: full_result.valid,
            recent_result,
            full_result,
            latest_chain_hash: chain.latest().map(|e| e.chain_hash),
            recent: entries[skip..].iter().map(RecentEntry::from).collect(),
        }
    }
}

/// A quotable export of the chain tail with the full-chain verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditExport {
    /// When the export was produced.
    pub generated_at: String,
    /// Total number of entries at export time.
    pub length: u64,
    /// Full-chain verification at export time.
    pub full: VerificationResult,
    /// The last entries of the chain, oldest first.
    pub tail: Vec<LedgerEntry>,
}

impl AuditExport {
    pub(crate) fn build(chain: &HashChain, tail: usize, generated_at: String) -> Self {
        let entries = chain.as_slice();
        let skip = entries.len().saturating_sub(tail);

        Self {
            generated_at,
            length: entries.len() as u64,
            full: verify_full(entries),
            tail: entries[skip..].to_vec(),
        }
    }

    /// Re-verify the exported tail on its own.
    ///
    /// The first tail entry's `prev_chain_hash` is trusted as the anchor, so
    /// this proves internal consistency of the tail only. The `full` field is
    /// the verdict on the whole chain.
    pub fn verify_tail(&self) -> VerificationResult {
        verify_detached(&self.tail)
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export previously rendered with [`to_json`](Self::to_json).
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kavach_ledger_core::{payload, Value};

    fn chain_of(n: usize) -> HashChain {
        let mut chain = HashChain::new();
        for i in 1..=n {
            chain
                .append(format!("evt_{i}"), payload! { "timestamp" => format!("T{i}") })
                .unwrap();
        }
        chain
    }

    #[test]
    fn test_summary_of_empty_chain() {
        let summary = LedgerSummary::build(&HashChain::new(), 25);
        assert_eq!(summary.length, 0);
        assert!(summary.recent_valid);
        assert!(summary.full_valid);
        assert!(summary.latest_chain_hash.is_none());
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_summary_window_clips() {
        let chain = chain_of(5);
        let summary = LedgerSummary::build(&chain, 3);
        let ids: Vec<u64> = summary.recent.iter().map(|r| r.sequence_id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(summary.recent_result.checked_count, 3);
        assert_eq!(summary.full_result.checked_count, 5);
        assert_eq!(summary.latest_chain_hash, chain.latest().map(|e| e.chain_hash));

        let wide = LedgerSummary::build(&chain, 100);
        assert_eq!(wide.recent.len(), 5);
    }

    #[test]
    fn test_summary_surfaces_both_verdicts() {
        let mut entries = chain_of(4).into_entries();
        entries[0].payload.insert("forged".into(), Value::Bool(true));
        let summary = LedgerSummary::build(&HashChain::from_entries(entries), 2);
        assert!(summary.recent_valid);
        assert!(!summary.full_valid);
        assert_eq!(summary.full_result.first_failure_sequence_id, Some(1));
    }

    #[test]
    fn test_export_roundtrip_and_tail_check() {
        let chain = chain_of(6);
        let export = AuditExport::build(&chain, 4, "2025-01-01T00:00:00.000000Z".into());
        assert_eq!(export.length, 6);
        assert_eq!(export.tail.len(), 4);
        assert_eq!(export.tail[0].sequence_id, 3);
        assert!(export.full.valid);
        assert!(export.verify_tail().valid);

        let parsed = AuditExport::from_json(&export.to_json().unwrap()).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_export_tail_with_overflowing_sequence_id() {
        let mut export = AuditExport::build(&chain_of(2), 2, "T".into());
        export.tail[0].sequence_id = u64::MAX;

        let parsed = AuditExport::from_json(&export.to_json().unwrap()).unwrap();
        let result = parsed.verify_tail();
        assert!(!result.valid);
        assert_eq!(result.checked_count, 2);
        assert_eq!(result.failure, Some(kavach_ledger_core::IntegrityViolation::SequenceGap));
    }

    #[test]
    fn test_export_rejects_garbage() {
        assert!(AuditExport::from_json("{not json").is_err());
    }
}
