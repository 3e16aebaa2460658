//! Ledger configuration.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Default number of recent entries covered by [`Ledger::summary_default`].
///
/// [`Ledger::summary_default`]: crate::Ledger::summary_default
pub const DEFAULT_SUMMARY_WINDOW: usize = 25;

/// Default number of trailing entries in an audit export.
pub const DEFAULT_EXPORT_TAIL: usize = 50;

/// Configuration for a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Window used by `summary_default`.
    pub summary_window: usize,
    /// Tail length used by `audit_export_default`.
    pub export_tail: usize,
    /// How the system clock renders timestamps it inserts.
    pub timestamp_format: TimestampFormat,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            summary_window: DEFAULT_SUMMARY_WINDOW,
            export_tail: DEFAULT_EXPORT_TAIL,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

/// Rendering of clock-supplied timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2025-01-01T00:00:00.000000Z`
    #[default]
    IsoMicros,
    /// `2025-01-01T00:00:00.000Z`
    Rfc3339Millis,
}

impl TimestampFormat {
    /// Render a UTC instant.
    pub fn render(self, at: DateTime<Utc>) -> String {
        match self {
            TimestampFormat::IsoMicros => at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339Millis => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
