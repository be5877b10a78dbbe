//! Time Source
//!
//! Order records capture a purchase timestamp. The engine never reads the
//! wall clock directly; hosts inject a [`Clock`] so replays and tests stay
//! deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

use lib_ledger::Timestamp;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// Fixed time for deterministic tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
