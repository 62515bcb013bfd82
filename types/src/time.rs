//! Logical time as reported by the external clock.
//!
//! Values are opaque monotonic units (block heights in a ledger deployment).
//! Nothing in the workspace reads the wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A reading of the logical clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalTime(u64);

impl LogicalTime {
    pub fn new(units: u64) -> Self {
        Self(units)
    }

    pub fn as_units(&self) -> u64 {
        self.0
    }

    /// This time shifted forward by `units`, or `None` on overflow.
    pub fn checked_add(self, units: u64) -> Option<Self> {
        self.0.checked_add(units).map(Self)
    }
}

impl fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
