//! Voting-power oracle trait.

use crate::StoreError;
use charter_types::{AccountId, Weight};

/// Read-only view of the weighted-asset ledger.
///
/// Queries are side-effect free. Both values are read live; the engine never
/// caches them across operations.
pub trait VotingPowerOracle: Send + Sync {
    /// Current voting weight held by `account` (zero if unknown).
    fn weight_of(&self, account: &AccountId) -> Result<Weight, StoreError>;

    /// Total outstanding weight across all accounts.
    fn total_weight(&self) -> Result<Weight, StoreError>;
}
