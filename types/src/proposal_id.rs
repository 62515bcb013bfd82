//! Sequential proposal identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a proposal. The first proposal is 1; 0 is never allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    /// The first id handed out by an engine.
    pub const FIRST: Self = Self(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Zero-based slot of this id in a dense table, or `None` for id 0
    /// and ids past the platform's `usize`.
    pub fn index(&self) -> Option<usize> {
        self.0.checked_sub(1).and_then(|i| usize::try_from(i).ok())
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ProposalId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_one_based() {
        assert_eq!(ProposalId::new(0).index(), None);
        assert_eq!(ProposalId::FIRST.index(), Some(0));
        assert_eq!(ProposalId::new(7).index(), Some(6));
    }

    #[test]
    fn index_never_wraps() {
        let raw = u64::MAX;
        let expected = usize::try_from(raw - 1).ok();
        assert_eq!(ProposalId::new(raw).index(), expected);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn index_past_usize_is_none() {
        assert_eq!(ProposalId::new((1u64 << 32) + 1).index(), None);
    }
}
