//! In-memory instruction store guarded by a governor identity.

use crate::document::InstructionDocument;
use charter_store::{ConfigurationStore, StoreError};
use charter_types::{AccountId, ProposalId};
use std::sync::Mutex;

/// Holds the instruction document; only the bound governor may replace it.
pub struct InstructionStore {
    governor: AccountId,
    document: Mutex<InstructionDocument>,
}

impl InstructionStore {
    /// Bind a store to `governor`, starting from the genesis `text`.
    pub fn new(governor: AccountId, text: impl Into<String>) -> Self {
        Self {
            governor,
            document: Mutex::new(InstructionDocument::genesis(text)),
        }
    }

    /// The only identity allowed to call [`ConfigurationStore::update`].
    pub fn governor(&self) -> &AccountId {
        &self.governor
    }

    /// A copy of the current document with its revision metadata.
    pub fn document(&self) -> Result<InstructionDocument, StoreError> {
        self.document
            .lock()
            .map(|doc| doc.clone())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl ConfigurationStore for InstructionStore {
    fn update(
        &self,
        caller: &AccountId,
        payload: &str,
        proposal: ProposalId,
    ) -> Result<(), StoreError> {
        if *caller != self.governor {
            tracing::warn!(%caller, %proposal, "instruction update rejected: not the governor");
            return Err(StoreError::Unauthorized(caller.to_string()));
        }
        let mut doc = self
            .document
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        *doc = doc.revise(payload, proposal);
        tracing::info!(%proposal, version = doc.version, "instruction text replaced");
        Ok(())
    }

    fn current(&self) -> Result<String, StoreError> {
        Ok(self.document()?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn governor() -> AccountId {
        AccountId::new("governor")
    }

    #[test]
    fn governor_can_update() {
        let store = InstructionStore::new(governor(), "v0");
        store.update(&governor(), "v1", ProposalId::new(1)).unwrap();
        assert_eq!(store.current().unwrap(), "v1");
        let doc = store.document().unwrap();
        assert_eq!(doc.version, 1);
        assert_eq!(doc.last_proposal, Some(ProposalId::new(1)));
    }

    #[test]
    fn other_callers_are_rejected() {
        let store = InstructionStore::new(governor(), "v0");
        let err = store
            .update(&AccountId::new("mallory"), "evil", ProposalId::new(1))
            .unwrap_err();
        assert_eq!(err, StoreError::Unauthorized("mallory".into()));
        assert_eq!(store.current().unwrap(), "v0");
        assert_eq!(store.document().unwrap().version, 0);
    }
}
