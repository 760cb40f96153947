//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use hashcash_types::Clock;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to. Thread-safe so it can sit
/// behind a shared verifier.
pub struct NullClock {
    current: AtomicI64,
}

impl NullClock {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self::from_secs(initial.timestamp())
    }

    /// Start at a Unix timestamp in seconds.
    pub fn from_secs(secs: i64) -> Self {
        Self {
            current: AtomicI64::new(secs),
        }
    }

    /// Advance time by a number of seconds (negative moves it back).
    pub fn advance(&self, secs: i64) {
        self.current.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.current.store(instant.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.current.load(Ordering::SeqCst), 0).unwrap_or_default()
    }
}
