//! The Ledger: a shared handle over one hash chain.
//!
//! Appends take the write lock; reads and verification take the read lock
//! and may run concurrently with each other, never with an append. An entry
//! is fully sealed before it is pushed, so a reader can never observe a
//! half-built entry.

use std::ops::RangeBounds;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use kavach_ledger_core::{
    HashChain, LedgerEntry, Payload, Value, VerificationResult, TIMESTAMP_KEY,
};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::Result;
use crate::report::{AuditExport, LedgerSummary};

/// Shared handle to a tamper-evident event ledger.
///
/// Cloning is cheap and every clone sees the same chain. Pass the handle to
/// whatever needs to record or verify events.
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Arc<RwLock<HashChain>>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create an empty ledger using the system clock.
    pub fn new(config: LedgerConfig) -> Self {
        let clock = SystemClock::new(config.timestamp_format);
        Self::with_clock(config, clock)
    }

    /// Create an empty ledger with an explicit clock.
    pub fn with_clock(config: LedgerConfig, clock: impl Clock + 'static) -> Self {
        Self::from_chain(config, Arc::new(clock), HashChain::new())
    }

    /// Adopt previously exported entries. Their hashes are not re-derived;
    /// call [`verify_full`](Self::verify_full) to check them.
    pub fn from_entries(config: LedgerConfig, entries: Vec<LedgerEntry>) -> Self {
        let clock = SystemClock::new(config.timestamp_format);
        Self::from_entries_with_clock(config, clock, entries)
    }

    /// [`from_entries`](Self::from_entries) with an explicit clock for later
    /// appends and exports.
    pub fn from_entries_with_clock(
        config: LedgerConfig,
        clock: impl Clock + 'static,
        entries: Vec<LedgerEntry>,
    ) -> Self {
        Self::from_chain(config, Arc::new(clock), HashChain::from_entries(entries))
    }

    /// Adopt entries from a JSON array of flat entry records.
    pub fn from_json(config: LedgerConfig, text: &str) -> Result<Self> {
        let entries: Vec<LedgerEntry> = serde_json::from_str(text)?;
        Ok(Self::from_entries(config, entries))
    }

    /// [`from_json`](Self::from_json) with an explicit clock.
    pub fn from_json_with_clock(
        config: LedgerConfig,
        clock: impl Clock + 'static,
        text: &str,
    ) -> Result<Self> {
        let entries: Vec<LedgerEntry> = serde_json::from_str(text)?;
        Ok(Self::from_entries_with_clock(config, clock, entries))
    }

    fn from_chain(config: LedgerConfig, clock: Arc<dyn Clock>, chain: HashChain) -> Self {
        info!(
            entries = chain.len(),
            summary_window = config.summary_window,
            export_tail = config.export_tail,
            "ledger opened"
        );
        Self {
            chain: Arc::new(RwLock::new(chain)),
            clock,
            config,
        }
    }

    /// The configuration this ledger was created with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // Appends never panic between sealing and pushing, so a poisoned lock
    // still guards a consistent chain.
    fn read(&self) -> RwLockReadGuard<'_, HashChain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashChain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Append
    // ─────────────────────────────────────────────────────────────────────────

    /// Record an event and return its sealed entry.
    ///
    /// A caller-supplied `timestamp` is used as-is; otherwise one is taken
    /// from the clock. Rejected payloads leave the chain unchanged.
    pub fn append(
        &self,
        event_type: impl Into<String>,
        mut payload: Payload,
    ) -> Result<LedgerEntry> {
        if !payload.contains_key(TIMESTAMP_KEY) {
            payload.insert(TIMESTAMP_KEY.to_string(), Value::String(self.clock.now()));
        }

        let mut chain = self.write();
        let entry = chain.append(event_type, payload)?;
        Ok(entry.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// The most recently appended entry.
    pub fn latest(&self) -> Option<LedgerEntry> {
        self.read().latest().cloned()
    }

    /// Copies of the entries whose sequence ids fall in `range`.
    ///
    /// Only the requested entries are cloned. Ids outside the chain are
    /// clipped.
    pub fn entries<R: RangeBounds<u64>>(&self, range: R) -> Vec<LedgerEntry> {
        self.read().entries(range).to_vec()
    }

    /// Entry by sequence id.
    pub fn get(&self, sequence_id: u64) -> Option<LedgerEntry> {
        self.read().get(sequence_id).cloned()
    }

    /// Borrow the chain under the read lock without copying.
    pub fn with_chain<T>(&self, f: impl FnOnce(&HashChain) -> T) -> T {
        f(&self.read())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify the whole chain from genesis.
    pub fn verify_full(&self) -> VerificationResult {
        self.read().verify_full()
    }

    /// Verify `start..=end` relative to the stored hash just before `start`.
    pub fn verify_window(&self, start: u64, end: u64) -> Result<VerificationResult> {
        Ok(self.read().verify_window(start, end)?)
    }

    /// Verify the last `count` entries.
    pub fn verify_recent(&self, count: usize) -> VerificationResult {
        self.read().verify_recent(count)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    /// Windowed and full-chain status in one consistent snapshot.
    pub fn summary(&self, window: usize) -> LedgerSummary {
        LedgerSummary::build(&self.read(), window)
    }

    /// [`summary`](Self::summary) with the configured window.
    pub fn summary_default(&self) -> LedgerSummary {
        self.summary(self.config.summary_window)
    }

    /// Export the last `tail` entries with the full-chain verdict.
    pub fn audit_export(&self, tail: usize) -> AuditExport {
        let generated_at = self.clock.now();
        let export = AuditExport::build(&self.read(), tail, generated_at);
        info!(
            length = export.length,
            tail = export.tail.len(),
            full_valid = export.full.valid,
            "audit export generated"
        );
        export
    }

    /// [`audit_export`](Self::audit_export) with the configured tail length.
    pub fn audit_export_default(&self) -> AuditExport {
        self.audit_export(self.config.export_tail)
    }

    /// All entries as a JSON array of flat records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self.read().as_slice())?)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::Error;
    use kavach_ledger_core::{payload, LedgerError};

    fn fixed_ledger() -> Ledger {
        Ledger::with_clock(LedgerConfig::default(), FixedClock::new("2025-01-01T00:00:00.000000Z"))
    }

    #[test]
    fn test_missing_timestamp_filled_from_clock() {
        let ledger = fixed_ledger();
        let entry = ledger.append("login", payload! { "user" => "op" }).unwrap();
        assert_eq!(entry.timestamp(), Some("2025-01-01T00:00:00.000000Z"));
    }

    #[test]
    fn test_caller_timestamp_kept() {
        let ledger = fixed_ledger();
        let entry = ledger.append("login", payload! { "timestamp" => "T1" }).unwrap();
        assert_eq!(entry.timestamp(), Some("T1"));
    }

    #[test]
    fn test_non_string_timestamp_rejected() {
        let ledger = fixed_ledger();
        let err = ledger.append("login", payload! { "timestamp" => 5 }).unwrap_err();
        assert!(matches!(err, Error::Ledger(LedgerError::InvalidPayload { .. })));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_clones_share_chain() {
        let ledger = fixed_ledger();
        let other = ledger.clone();
        other.append("a", Payload::new()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest(), other.latest());
    }

    #[test]
    fn test_window_range_error_propagates() {
        let ledger = fixed_ledger();
        let err = ledger.verify_window(1, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::RangeError { start: 1, end: 1, len: 0 })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let ledger = fixed_ledger();
        ledger.append("a", payload! { "n" => 1 }).unwrap();
        ledger.append("b", payload! { "f" => 2.5 }).unwrap();

        let restored =
            Ledger::from_json(LedgerConfig::default(), &ledger.to_json().unwrap()).unwrap();
        assert_eq!(restored.entries(..), ledger.entries(..));
        assert!(restored.verify_full().valid);
    }

    #[test]
    fn test_from_json_rejects_oversized_integer() {
        let zero = "0".repeat(64);
        let record = format!(
            r#"[{{"sequence_id":1,"event_type":"login",
                "payload":{{"n":18446744073709551616,"timestamp":"T1"}},
                "payload_hash":"{zero}","prev_chain_hash":"{zero}","chain_hash":"{zero}"}}]"#
        );
        let err = Ledger::from_json(LedgerConfig::default(), &record).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }

    #[test]
    fn test_restored_ledger_uses_injected_clock() {
        let source = fixed_ledger();
        source.append("login", payload! { "timestamp" => "T1" }).unwrap();

        let restored = Ledger::from_json_with_clock(
            LedgerConfig::default(),
            FixedClock::new("2030-06-01T12:00:00.000000Z"),
            &source.to_json().unwrap(),
        )
        .unwrap();
        let entry = restored.append("dispatch", Payload::new()).unwrap();
        assert_eq!(entry.timestamp(), Some("2030-06-01T12:00:00.000000Z"));
        assert_eq!(restored.audit_export(1).generated_at, "2030-06-01T12:00:00.000000Z");
        assert!(restored.verify_full().valid);

        let adopted = Ledger::from_entries_with_clock(
            LedgerConfig::default(),
            FixedClock::new("T9"),
            source.entries(..),
        );
        assert_eq!(adopted.append("x", Payload::new()).unwrap().timestamp(), Some("T9"));
    }

    #[test]
    fn test_with_chain_borrows() {
        let ledger = fixed_ledger();
        ledger.append("a", Payload::new()).unwrap();
        let head = ledger.with_chain(|chain| chain.head_hash());
        assert_eq!(Some(head), ledger.latest().map(|e| e.chain_hash));
    }
}
