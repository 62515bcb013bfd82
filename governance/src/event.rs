//! Notifications emitted by the engine for indexers and interfaces.

use crate::params::GovernanceParameters;
use charter_types::{AccountId, BasisPoints, LogicalTime, ProposalId, Weight};
use serde::Serialize;

/// Governance events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: AccountId,
        title: String,
        description: String,
        payload: String,
        start_time: LogicalTime,
        end_time: LogicalTime,
    },
    VoteCast {
        voter: AccountId,
        proposal_id: ProposalId,
        support: bool,
        weight: Weight,
    },
    ProposalExecuted {
        proposal_id: ProposalId,
    },
    ProposalCanceled {
        proposal_id: ProposalId,
    },
    GovernanceParametersUpdated {
        voting_period: u64,
        proposal_threshold: Weight,
        quorum_threshold: BasisPoints,
    },
    AdminTransferred {
        previous: AccountId,
        new: AccountId,
    },
}

impl GovernanceEvent {
    pub(crate) fn parameters_updated(params: &GovernanceParameters) -> Self {
        Self::GovernanceParametersUpdated {
            voting_period: params.voting_period,
            proposal_threshold: params.proposal_threshold,
            quorum_threshold: params.quorum_threshold,
        }
    }
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the emitting call, after the state change they
/// report has been applied. They receive a shared reference and cannot reach
/// the engine through it.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
