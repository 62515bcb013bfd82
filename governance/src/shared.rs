//! Thread-safe engine handle with a reentrancy guard.
//!
//! A configuration store (or any listener) that holds a handle to the engine
//! could try to call back into it while `execute_proposal` is still running.
//! With a plain mutex that call would deadlock; here it fails with
//! [`GovernanceError::Reentrant`]. Calls from other threads queue on the
//! mutex and run one at a time.

use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::params::GovernanceParameters;
use crate::proposal::{ProposalDetails, ProposalState, Receipt};
use charter_types::{AccountId, ProposalId};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

pub struct SharedEngine {
    engine: Mutex<GovernanceEngine>,
    /// Thread currently inside an operation.
    in_progress: Mutex<Option<ThreadId>>,
}

/// Clears the in-progress marker when an operation finishes, even by panic.
struct InProgress<'a> {
    marker: &'a Mutex<Option<ThreadId>>,
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        *lock_marker(self.marker) = None;
    }
}

fn lock_marker(marker: &Mutex<Option<ThreadId>>) -> MutexGuard<'_, Option<ThreadId>> {
    // The marker is a plain value; a panic elsewhere cannot leave it torn.
    marker.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SharedEngine {
    pub fn new(engine: GovernanceEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
            in_progress: Mutex::new(None),
        }
    }

    /// Run `op` with exclusive access to the engine.
    ///
    /// Fails with `Reentrant` if the calling thread is already inside an
    /// operation on this engine.
    pub fn with_engine<T>(
        &self,
        op: impl FnOnce(&mut GovernanceEngine) -> Result<T, GovernanceError>,
    ) -> Result<T, GovernanceError> {
        let me = thread::current().id();
        if *lock_marker(&self.in_progress) == Some(me) {
            tracing::warn!("re-entrant governance call rejected");
            return Err(GovernanceError::Reentrant);
        }
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| GovernanceError::Poisoned)?;
        *lock_marker(&self.in_progress) = Some(me);
        let _in_progress = InProgress {
            marker: &self.in_progress,
        };
        op(&mut engine)
    }

    pub fn create_proposal(
        &self,
        proposer: &AccountId,
        title: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        self.with_engine(|e| e.create_proposal(proposer, title, description, payload))
    }

    pub fn cast_vote(
        &self,
        id: ProposalId,
        voter: &AccountId,
        support: bool,
    ) -> Result<Receipt, GovernanceError> {
        self.with_engine(|e| e.cast_vote(id, voter, support))
    }

    pub fn cancel_proposal(&self, id: ProposalId, caller: &AccountId) -> Result<(), GovernanceError> {
        self.with_engine(|e| e.cancel_proposal(id, caller))
    }

    pub fn execute_proposal(&self, id: ProposalId) -> Result<(), GovernanceError> {
        self.with_engine(|e| e.execute_proposal(id))
    }

    pub fn update_governance_parameters(
        &self,
        caller: &AccountId,
        params: GovernanceParameters,
    ) -> Result<(), GovernanceError> {
        self.with_engine(|e| e.update_governance_parameters(caller, params))
    }

    pub fn transfer_admin(&self, caller: &AccountId, new_admin: AccountId) -> Result<(), GovernanceError> {
        self.with_engine(|e| e.transfer_admin(caller, new_admin))
    }

    pub fn state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError> {
        self.with_engine(|e| e.state(id))
    }

    pub fn proposal_details(&self, id: ProposalId) -> Result<ProposalDetails, GovernanceError> {
        self.with_engine(|e| e.proposal_details(id))
    }

    pub fn receipt(&self, id: ProposalId, voter: &AccountId) -> Result<Receipt, GovernanceError> {
        self.with_engine(|e| e.receipt(id, voter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Collaborators;
    use charter_nullables::{NullClock, NullConfigStore, NullOracle};
    use charter_store::{ConfigurationStore, StoreError};
    use std::sync::{Arc, OnceLock};

    /// A store that tries to vote from inside `update`.
    struct CallbackStore {
        inner: NullConfigStore,
        engine: OnceLock<Arc<SharedEngine>>,
        reentry: Mutex<Option<Result<Receipt, GovernanceError>>>,
    }

    impl ConfigurationStore for CallbackStore {
        fn update(
            &self,
            caller: &AccountId,
            payload: &str,
            proposal: ProposalId,
        ) -> Result<(), StoreError> {
            if let Some(engine) = self.engine.get() {
                let result = engine.cast_vote(proposal, &AccountId::new("sneaky"), true);
                *self.reentry.lock().unwrap() = Some(result);
            }
            self.inner.update(caller, payload, proposal)
        }

        fn current(&self) -> Result<String, StoreError> {
            self.inner.current()
        }
    }

    fn succeeded_engine(
        store: Arc<dyn ConfigurationStore>,
    ) -> (Arc<SharedEngine>, Arc<NullClock>, ProposalId) {
        let oracle = Arc::new(NullOracle::with_balances([
            ("proposer", 200_000),
            ("alice", 800_000),
            ("sneaky", 1),
        ]));
        let clock = Arc::new(NullClock::new(0));
        let engine = GovernanceEngine::new(
            AccountId::new("admin"),
            AccountId::new("governor"),
            GovernanceParameters::new(10, 100_000, 1000).unwrap(),
            Collaborators {
                oracle,
                clock: clock.clone(),
                store,
            },
        );
        let shared = Arc::new(SharedEngine::new(engine));
        let id = shared
            .create_proposal(&AccountId::new("proposer"), "t", "d", "payload")
            .unwrap();
        clock.advance(1);
        shared.cast_vote(id, &AccountId::new("alice"), true).unwrap();
        clock.advance(10);
        (shared, clock, id)
    }

    #[test]
    fn callback_into_engine_is_rejected_not_deadlocked() {
        let store = Arc::new(CallbackStore {
            inner: NullConfigStore::new("governor", "genesis"),
            engine: OnceLock::new(),
            reentry: Mutex::new(None),
        });
        let (shared, _clock, id) = succeeded_engine(store.clone());
        assert!(store.engine.set(Arc::clone(&shared)).is_ok());

        shared.execute_proposal(id).unwrap();

        let reentry = store.reentry.lock().unwrap().take().unwrap();
        assert!(matches!(reentry, Err(GovernanceError::Reentrant)));
        assert_eq!(shared.state(id).unwrap(), ProposalState::Executed);
        assert_eq!(store.inner.value(), "payload");
        assert!(!shared
            .receipt(id, &AccountId::new("sneaky"))
            .unwrap()
            .has_voted);
    }

    #[test]
    fn guard_is_released_after_each_call() {
        let store = Arc::new(NullConfigStore::new("governor", "genesis"));
        let (shared, _clock, id) = succeeded_engine(store);
        assert_eq!(shared.state(id).unwrap(), ProposalState::Succeeded);
        assert_eq!(shared.state(id).unwrap(), ProposalState::Succeeded);
        shared.execute_proposal(id).unwrap();
        assert!(matches!(
            shared.execute_proposal(id),
            Err(GovernanceError::NotSucceeded { .. })
        ));
    }

    #[test]
    fn concurrent_voters_are_serialized() {
        let oracle = Arc::new(NullOracle::new());
        oracle.set_weight("proposer", 200_000);
        for i in 0..8 {
            oracle.set_weight(format!("voter{i}"), 10);
        }
        let clock = Arc::new(NullClock::new(0));
        let engine = GovernanceEngine::new(
            AccountId::new("admin"),
            AccountId::new("governor"),
            GovernanceParameters::new(100, 100_000, 0).unwrap(),
            Collaborators {
                oracle,
                clock: clock.clone(),
                store: Arc::new(NullConfigStore::new("governor", "")),
            },
        );
        let shared = Arc::new(SharedEngine::new(engine));
        let id = shared
            .create_proposal(&AccountId::new("proposer"), "t", "d", "p")
            .unwrap();
        clock.advance(1);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let voter = AccountId::new(format!("voter{i}"));
                    shared.cast_vote(id, &voter, i % 2 == 0).unwrap();
                    // Second attempt from the same voter always loses.
                    assert!(shared.cast_vote(id, &voter, true).is_err());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let details = shared.proposal_details(id).unwrap();
        assert_eq!(details.voter_count, 8);
        assert_eq!(details.for_votes.raw(), 40);
        assert_eq!(details.against_votes.raw(), 40);
    }
}
