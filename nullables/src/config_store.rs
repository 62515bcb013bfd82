//! Nullable configuration store: records updates instead of applying them.

use charter_store::{ConfigurationStore, StoreError};
use charter_types::{AccountId, ProposalId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// One accepted call to [`ConfigurationStore::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub caller: AccountId,
    pub payload: String,
    pub proposal: ProposalId,
}

/// A test configuration store.
///
/// Bound to a governor like a real store. Can be told to fail the next
/// update so tests can observe rollback.
pub struct NullConfigStore {
    governor: AccountId,
    value: Mutex<String>,
    updates: Mutex<Vec<RecordedUpdate>>,
    fail_next: AtomicBool,
}

impl NullConfigStore {
    pub fn new(governor: impl Into<AccountId>, initial: impl Into<String>) -> Self {
        Self {
            governor: governor.into(),
            value: Mutex::new(initial.into()),
            updates: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Reject the next update with [`StoreError::Rejected`].
    pub fn fail_next_update(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// All accepted updates, in order (for assertions).
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }
}

impl ConfigurationStore for NullConfigStore {
    fn update(
        &self,
        caller: &AccountId,
        payload: &str,
        proposal: ProposalId,
    ) -> Result<(), StoreError> {
        if *caller != self.governor {
            return Err(StoreError::Unauthorized(caller.to_string()));
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Rejected("null store told to fail".into()));
        }
        *self.value.lock().unwrap() = payload.to_string();
        self.updates.lock().unwrap().push(RecordedUpdate {
            caller: caller.clone(),
            payload: payload.to_string(),
            proposal,
        });
        Ok(())
    }

    fn current(&self) -> Result<String, StoreError> {
        Ok(self.value())
    }
}
