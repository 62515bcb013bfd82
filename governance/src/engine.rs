//! Core governance engine: proposal lifecycle, weighted voting and execution.

use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::params::GovernanceParameters;
use crate::proposal::{Proposal, ProposalDetails, ProposalState, Receipt};
use charter_store::{ClockSource, ConfigurationStore, VotingPowerOracle};
use charter_types::{AccountId, LogicalTime, ProposalId};
use std::sync::Arc;

/// The external collaborators an engine is wired to at construction.
///
/// Referenced, never owned: the same oracle or clock may back several engines.
#[derive(Clone)]
pub struct Collaborators {
    pub oracle: Arc<dyn VotingPowerOracle>,
    pub clock: Arc<dyn ClockSource>,
    pub store: Arc<dyn ConfigurationStore>,
}

/// The governance state machine.
///
/// Owns every proposal and receipt. Each public operation runs to completion
/// against a single clock reading and leaves no partial state on error.
/// Mutating operations take `&mut self`; share an engine across threads or
/// callbacks through [`crate::SharedEngine`].
pub struct GovernanceEngine {
    admin: AccountId,
    /// Identity this engine presents to the configuration store.
    governor: AccountId,
    params: GovernanceParameters,
    /// Dense table: proposal `n` lives at index `n - 1`.
    proposals: Vec<Proposal>,
    oracle: Arc<dyn VotingPowerOracle>,
    clock: Arc<dyn ClockSource>,
    store: Arc<dyn ConfigurationStore>,
    events: EventBus,
}

impl GovernanceEngine {
    pub fn new(
        admin: AccountId,
        governor: AccountId,
        params: GovernanceParameters,
        collaborators: Collaborators,
    ) -> Self {
        tracing::info!(
            %admin,
            %governor,
            voting_period = params.voting_period,
            proposal_threshold = %params.proposal_threshold,
            quorum_threshold = %params.quorum_threshold,
            "governance engine initialised"
        );
        Self {
            admin,
            governor,
            params,
            proposals: Vec::new(),
            oracle: collaborators.oracle,
            clock: collaborators.clock,
            store: collaborators.store,
            events: EventBus::new(),
        }
    }

    /// Register a listener for every event this engine emits.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&GovernanceEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn governor(&self) -> &AccountId {
        &self.governor
    }

    pub fn parameters(&self) -> &GovernanceParameters {
        &self.params
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// All proposals in id order, including canceled and executed ones.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    /// Look up a proposal by id.
    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.index_of(id).map(|index| &self.proposals[index])
    }

    fn index_of(&self, id: ProposalId) -> Result<usize, GovernanceError> {
        id.index()
            .filter(|&index| index < self.proposals.len())
            .ok_or(GovernanceError::InvalidProposalId(id))
    }

    // ── Proposals ──────────────────────────────────────────────────────

    /// Open a new proposal to replace the instruction text with `payload`.
    ///
    /// The proposer's weight is read now and must meet the proposal threshold.
    /// Voting opens after the current clock reading and closes
    /// `voting_period` units later; both bounds are fixed here.
    pub fn create_proposal(
        &mut self,
        proposer: &AccountId,
        title: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<ProposalId, GovernanceError> {
        let weight = self.oracle.weight_of(proposer)?;
        if weight < self.params.proposal_threshold {
            return Err(GovernanceError::InsufficientPower {
                have: weight,
                need: self.params.proposal_threshold,
            });
        }

        let id = ProposalId::new(self.proposal_count())
            .next()
            .ok_or(GovernanceError::Overflow)?;
        let start_time = self.clock.now();
        let end_time = start_time
            .checked_add(self.params.voting_period)
            .ok_or(GovernanceError::Overflow)?;

        let proposal = Proposal::new(
            id,
            proposer.clone(),
            title.into(),
            description.into(),
            payload.into(),
            start_time,
            end_time,
        );
        let event = GovernanceEvent::ProposalCreated {
            id,
            proposer: proposal.proposer.clone(),
            title: proposal.title.clone(),
            description: proposal.description.clone(),
            payload: proposal.payload.clone(),
            start_time,
            end_time,
        };
        self.proposals.push(proposal);

        tracing::info!(
            proposal = %id,
            %proposer,
            %weight,
            %start_time,
            %end_time,
            "proposal created"
        );
        self.events.emit(&event);
        Ok(id)
    }

    /// Cast `voter`'s current weight for or against an active proposal.
    ///
    /// Weight is read live at this call, not snapshotted at creation.
    pub fn cast_vote(
        &mut self,
        id: ProposalId,
        voter: &AccountId,
        support: bool,
    ) -> Result<Receipt, GovernanceError> {
        let index = self.index_of(id)?;
        let now = self.clock.now();
        let state = self.state_at(&self.proposals[index], now)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::NotActive {
                proposal: id,
                state,
            });
        }
        if self.proposals[index].receipt(voter).is_some() {
            return Err(GovernanceError::AlreadyVoted {
                voter: voter.clone(),
                proposal: id,
            });
        }

        let weight = self.oracle.weight_of(voter)?;
        let receipt = self.proposals[index].record_vote(voter, support, weight)?;

        tracing::info!(proposal = %id, %voter, support, %weight, "vote cast");
        self.events.emit(&GovernanceEvent::VoteCast {
            voter: voter.clone(),
            proposal_id: id,
            support,
            weight,
        });
        Ok(receipt)
    }

    /// Cancel a pending or active proposal.
    ///
    /// The proposer may always cancel. Anyone else may cancel once the
    /// proposer's current weight has fallen below the proposal threshold.
    pub fn cancel_proposal(
        &mut self,
        id: ProposalId,
        caller: &AccountId,
    ) -> Result<(), GovernanceError> {
        let index = self.index_of(id)?;
        let now = self.clock.now();
        let state = self.state_at(&self.proposals[index], now)?;
        if !state.is_cancelable() {
            return Err(GovernanceError::NotCancelable {
                proposal: id,
                state,
            });
        }

        let proposer = &self.proposals[index].proposer;
        if caller != proposer {
            let proposer_weight = self.oracle.weight_of(proposer)?;
            if proposer_weight >= self.params.proposal_threshold {
                return Err(GovernanceError::Unauthorized {
                    caller: caller.clone(),
                    proposal: id,
                });
            }
            tracing::debug!(
                proposal = %id,
                %proposer,
                %proposer_weight,
                "proposer fell below threshold, cancel open to all"
            );
        }

        self.proposals[index].canceled = true;
        tracing::info!(proposal = %id, %caller, previous_state = %state, "proposal canceled");
        self.events
            .emit(&GovernanceEvent::ProposalCanceled { proposal_id: id });
        Ok(())
    }

    /// Write a succeeded proposal's payload to the configuration store.
    ///
    /// Runs at most once per proposal: afterwards the state is `Executed` and
    /// a repeat call fails with `NotSucceeded`. If the store rejects the
    /// update the proposal is left unexecuted and the call may be retried.
    pub fn execute_proposal(&mut self, id: ProposalId) -> Result<(), GovernanceError> {
        let index = self.index_of(id)?;
        let now = self.clock.now();
        let state = self.state_at(&self.proposals[index], now)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::NotSucceeded {
                proposal: id,
                state,
            });
        }

        self.proposals[index].executed = true;
        let result = self
            .store
            .update(&self.governor, &self.proposals[index].payload, id);
        if let Err(source) = result {
            self.proposals[index].executed = false;
            tracing::warn!(proposal = %id, error = %source, "execution rolled back");
            return Err(GovernanceError::ConfigurationUpdateFailed {
                proposal: id,
                source,
            });
        }

        tracing::info!(proposal = %id, "proposal executed");
        self.events
            .emit(&GovernanceEvent::ProposalExecuted { proposal_id: id });
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Current state of a proposal, computed fresh.
    pub fn state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError> {
        let proposal = self.proposal(id)?;
        self.state_at(proposal, self.clock.now())
    }

    /// Evaluate a proposal against one clock reading.
    ///
    /// Total weight is read only when the tally decides, and at most once.
    fn state_at(
        &self,
        proposal: &Proposal,
        now: LogicalTime,
    ) -> Result<ProposalState, GovernanceError> {
        if let Some(state) = proposal.phase_at(now) {
            return Ok(state);
        }
        let total_weight = self.oracle.total_weight()?;
        let state = proposal.closing_state(total_weight, self.params.quorum_threshold);
        tracing::debug!(
            proposal = %proposal.id,
            for_votes = %proposal.for_votes,
            against_votes = %proposal.against_votes,
            %total_weight,
            quorum = %self.params.quorum_threshold,
            %state,
            "closed proposal evaluated"
        );
        Ok(state)
    }

    /// Stored fields of a proposal plus its computed state.
    pub fn proposal_details(&self, id: ProposalId) -> Result<ProposalDetails, GovernanceError> {
        let proposal = self.proposal(id)?;
        let state = self.state_at(proposal, self.clock.now())?;
        Ok(ProposalDetails::from_proposal(proposal, state))
    }

    /// The receipt `voter` holds on a proposal; empty if they have not voted.
    pub fn receipt(&self, id: ProposalId, voter: &AccountId) -> Result<Receipt, GovernanceError> {
        let proposal = self.proposal(id)?;
        Ok(proposal.receipt(voter).copied().unwrap_or_default())
    }

    /// Every receipt `voter` holds, in proposal order.
    pub fn voting_history(&self, voter: &AccountId) -> Vec<(ProposalId, Receipt)> {
        self.proposals
            .iter()
            .filter_map(|p| p.receipt(voter).map(|r| (p.id, *r)))
            .collect()
    }

    // ── Administration ────────────────────────────────────────────────

    /// Replace the governance parameters.
    ///
    /// Applies immediately to every later state evaluation, including the
    /// quorum of proposals already open. Start and end times already fixed
    /// are untouched.
    pub fn update_governance_parameters(
        &mut self,
        caller: &AccountId,
        params: GovernanceParameters,
    ) -> Result<(), GovernanceError> {
        self.require_admin(caller)?;
        self.params = params;
        tracing::info!(
            voting_period = params.voting_period,
            proposal_threshold = %params.proposal_threshold,
            quorum_threshold = %params.quorum_threshold,
            "governance parameters updated"
        );
        self.events
            .emit(&GovernanceEvent::parameters_updated(&self.params));
        Ok(())
    }

    /// Hand the administrative role to `new_admin`.
    pub fn transfer_admin(
        &mut self,
        caller: &AccountId,
        new_admin: AccountId,
    ) -> Result<(), GovernanceError> {
        self.require_admin(caller)?;
        let previous = std::mem::replace(&mut self.admin, new_admin);
        tracing::info!(%previous, new = %self.admin, "governance admin transferred");
        self.events.emit(&GovernanceEvent::AdminTransferred {
            previous,
            new: self.admin.clone(),
        });
        Ok(())
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), GovernanceError> {
        if *caller != self.admin {
            return Err(GovernanceError::AdminOnly(caller.clone()));
        }
        Ok(())
    }
}
