//! Logical clock trait.

use charter_types::LogicalTime;

/// Source of monotonically non-decreasing logical time (e.g. block height).
pub trait ClockSource: Send + Sync {
    fn now(&self) -> LogicalTime;
}
