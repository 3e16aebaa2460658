//! Timestamp sources for payloads that arrive without one.

use std::fmt;

use chrono::Utc;

use crate::config::TimestampFormat;

/// Supplies the `timestamp` inserted into payloads that lack one.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current time, already rendered.
    fn now(&self) -> String;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    format: TimestampFormat,
}

impl SystemClock {
    pub fn new(format: TimestampFormat) -> Self {
        Self { format }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> String {
        self.format.render(Utc::now())
    }
}

/// Always returns the same timestamp. For deterministic tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}
