//! HashChain: an ordered, append-only sequence of ledger entries.
//!
//! The chain is plain data plus `&mut self` appends. Sharing it between
//! threads is the job of the owner (see the `kavach-ledger` crate).

use std::ops::{Bound, RangeBounds};

use tracing::debug;

use crate::crypto::Hash256;
use crate::entry::LedgerEntry;
use crate::error::Result;
use crate::value::Payload;
use crate::verify::{self, VerificationResult};

/// The append-only hash chain.
#[derive(Debug, Clone, Default)]
pub struct HashChain {
    entries: Vec<LedgerEntry>,
}

impl HashChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing entry list (e.g. a deserialized audit export).
    ///
    /// Hashes are taken as stored; run [`verify_full`](Self::verify_full)
    /// to find out whether they hold.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chain hash the next entry will link to.
    pub fn head_hash(&self) -> Hash256 {
        self.entries
            .last()
            .map_or(Hash256::ZERO, |entry| entry.chain_hash)
    }

    /// Append an event.
    ///
    /// The payload must carry a string `timestamp`; it is used as-is. On
    /// error nothing is appended and no sequence id is consumed.
    pub fn append(
        &mut self,
        event_type: impl Into<String>,
        payload: Payload,
    ) -> Result<&LedgerEntry> {
        let sequence_id = self.entries.len() as u64 + 1;
        let entry = LedgerEntry::seal(sequence_id, event_type, payload, self.head_hash())?;

        debug!(
            seq = entry.sequence_id,
            event_type = %entry.event_type,
            chain_hash = %entry.chain_hash.short(),
            "appended ledger entry"
        );

        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// The most recently appended entry.
    pub fn latest(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Entry by sequence id.
    pub fn get(&self, sequence_id: u64) -> Option<&LedgerEntry> {
        let idx = usize::try_from(sequence_id.checked_sub(1)?).ok()?;
        self.entries.get(idx)
    }

    /// Entries whose sequence ids fall in `range`.
    ///
    /// Ids outside the chain are clipped, so this never fails; an empty slice
    /// means nothing in the chain matched.
    pub fn entries<R: RangeBounds<u64>>(&self, range: R) -> &[LedgerEntry] {
        let len = self.entries.len() as u64;
        let first = match range.start_bound() {
            Bound::Included(&s) => s.max(1),
            Bound::Excluded(&s) => s.saturating_add(1).max(1),
            Bound::Unbounded => 1,
        };
        let last = match range.end_bound() {
            Bound::Included(&e) => e.min(len),
            Bound::Excluded(&e) => e.saturating_sub(1).min(len),
            Bound::Unbounded => len,
        };
        if first > last {
            return &[];
        }
        &self.entries[(first - 1) as usize..last as usize]
    }

    /// All entries in order.
    pub fn as_slice(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Give up ownership of the entries.
    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }

    /// Verify the whole chain from genesis.
    pub fn verify_full(&self) -> VerificationResult {
        verify::verify_full(&self.entries)
    }

    /// Verify `start..=end` relative to the stored hash just before `start`.
    pub fn verify_window(&self, start: u64, end: u64) -> Result<VerificationResult> {
        verify::verify_window(&self.entries, start, end)
    }

    /// Verify the last `count` entries (all of them if fewer exist).
    pub fn verify_recent(&self, count: usize) -> VerificationResult {
        verify::verify_recent(&self.entries, count)
    }
}
