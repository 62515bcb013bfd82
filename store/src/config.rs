//! Protected configuration store trait.

use crate::StoreError;
use charter_types::{AccountId, ProposalId};

/// Holder of the single governed value.
///
/// Implementations must reject `update` calls whose `caller` is not the
/// governor they were bound to, returning [`StoreError::Unauthorized`].
///
/// `caller` is a trusted in-process identity, not a capability: any code
/// holding the store can pass the governor's name. Authenticate callers
/// before they reach the engine.
pub trait ConfigurationStore: Send + Sync {
    /// Replace the governed value with `payload` on behalf of `proposal`.
    fn update(
        &self,
        caller: &AccountId,
        payload: &str,
        proposal: ProposalId,
    ) -> Result<(), StoreError>;

    /// Read the current governed value.
    fn current(&self) -> Result<String, StoreError>;
}
