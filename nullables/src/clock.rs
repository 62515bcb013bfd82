//! Nullable clock: deterministic logical time for testing.

use charter_store::ClockSource;
use charter_types::LogicalTime;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial: u64) -> Self {
        Self {
            current: AtomicU64::new(initial),
        }
    }

    /// Advance time by a number of units.
    pub fn advance(&self, units: u64) {
        self.current.fetch_add(units, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    ///
    /// Moving backwards breaks the monotonic contract; tests use this only to
    /// jump forward.
    pub fn set(&self, units: u64) {
        self.current.store(units, Ordering::SeqCst);
    }
}

impl ClockSource for NullClock {
    fn now(&self) -> LogicalTime {
        LogicalTime::new(self.current.load(Ordering::SeqCst))
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_set() {
        let clock = NullClock::new(10);
        assert_eq!(clock.now(), LogicalTime::new(10));
        clock.advance(5);
        assert_eq!(clock.now(), LogicalTime::new(15));
        clock.set(100);
        assert_eq!(clock.now(), LogicalTime::new(100));
    }
}
