//! Nullable oracle: programmable voting weights.

use charter_store::{StoreError, VotingPowerOracle};
use charter_types::{AccountId, Weight};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory weight ledger for testing.
///
/// Total weight is the sum of all balances unless pinned with
/// [`NullOracle::set_total`], which lets tests model supply held by accounts
/// that never vote.
pub struct NullOracle {
    balances: Mutex<HashMap<AccountId, Weight>>,
    total_override: Mutex<Option<Weight>>,
    unavailable: AtomicBool,
}

impl NullOracle {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            total_override: Mutex::new(None),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Create an oracle pre-loaded with `(account, weight)` pairs.
    pub fn with_balances<I, A>(balances: I) -> Self
    where
        I: IntoIterator<Item = (A, u128)>,
        A: Into<AccountId>,
    {
        let oracle = Self::new();
        for (account, weight) in balances {
            oracle.set_weight(account, weight);
        }
        oracle
    }

    pub fn set_weight(&self, account: impl Into<AccountId>, weight: u128) {
        self.balances
            .lock()
            .unwrap()
            .insert(account.into(), Weight::new(weight));
    }

    /// Pin the reported total weight regardless of individual balances.
    pub fn set_total(&self, total: u128) {
        *self.total_override.lock().unwrap() = Some(Weight::new(total));
    }

    /// Make every query fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null oracle switched off".into()));
        }
        Ok(())
    }
}

impl Default for NullOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VotingPowerOracle for NullOracle {
    fn weight_of(&self, account: &AccountId) -> Result<Weight, StoreError> {
        self.check_available()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or(Weight::ZERO))
    }

    fn total_weight(&self) -> Result<Weight, StoreError> {
        self.check_available()?;
        if let Some(total) = *self.total_override.lock().unwrap() {
            return Ok(total);
        }
        self.balances
            .lock()
            .unwrap()
            .values()
            .try_fold(Weight::ZERO, |acc, w| acc.checked_add(*w))
            .ok_or_else(|| StoreError::Backend("total weight overflow".into()))
    }
}
