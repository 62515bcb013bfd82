//! Proposals, receipts and the lifecycle states they move through.

use crate::error::GovernanceError;
use charter_types::{AccountId, BasisPoints, LogicalTime, ProposalId, Weight, BPS_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Largest combined tally the quorum computation can scale by 10000 without
/// overflowing.
pub const MAX_TOTAL_VOTES: u128 = u128::MAX / BPS_DENOMINATOR as u128;

/// Where a proposal stands, computed fresh from its fields, the clock and the
/// total outstanding weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created, voting has not opened yet.
    Pending,
    /// Accepting votes.
    Active,
    /// Withdrawn before voting closed.
    Canceled,
    /// Voting closed without quorum or without a strict majority.
    Defeated,
    /// Voting closed with quorum and a strict majority; ready to execute.
    Succeeded,
    /// The payload has been written to the configuration store.
    Executed,
}

impl ProposalState {
    /// Whether a proposal in this state may still be canceled.
    pub fn is_cancelable(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Canceled => "Canceled",
            Self::Defeated => "Defeated",
            Self::Succeeded => "Succeeded",
            Self::Executed => "Executed",
        };
        f.write_str(name)
    }
}

/// One voter's participation in one proposal. Never overwritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub has_voted: bool,
    pub support: bool,
    pub weight: Weight,
}

/// A governance proposal to replace the instruction text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: AccountId,
    pub title: String,
    pub description: String,
    /// Candidate instruction text written on execution.
    pub payload: String,
    pub start_time: LogicalTime,
    pub end_time: LogicalTime,
    pub for_votes: Weight,
    pub against_votes: Weight,
    pub executed: bool,
    pub canceled: bool,
    receipts: HashMap<AccountId, Receipt>,
}

impl Proposal {
    pub(crate) fn new(
        id: ProposalId,
        proposer: AccountId,
        title: String,
        description: String,
        payload: String,
        start_time: LogicalTime,
        end_time: LogicalTime,
    ) -> Self {
        Self {
            id,
            proposer,
            title,
            description,
            payload,
            start_time,
            end_time,
            for_votes: Weight::ZERO,
            against_votes: Weight::ZERO,
            executed: false,
            canceled: false,
            receipts: HashMap::new(),
        }
    }

    /// The receipt written for `voter`, if any.
    pub fn receipt(&self, voter: &AccountId) -> Option<&Receipt> {
        self.receipts.get(voter)
    }

    pub fn receipts(&self) -> impl Iterator<Item = (&AccountId, &Receipt)> {
        self.receipts.iter()
    }

    pub fn voter_count(&self) -> usize {
        self.receipts.len()
    }

    /// Sum of both tallies.
    pub fn total_votes(&self) -> Weight {
        // Bounded by MAX_TOTAL_VOTES on every write.
        self.for_votes + self.against_votes
    }

    /// Record a vote and return the receipt written.
    ///
    /// The only path that touches the tallies. Nothing changes on error.
    pub(crate) fn record_vote(
        &mut self,
        voter: &AccountId,
        support: bool,
        weight: Weight,
    ) -> Result<Receipt, GovernanceError> {
        if self.receipts.contains_key(voter) {
            return Err(GovernanceError::AlreadyVoted {
                voter: voter.clone(),
                proposal: self.id,
            });
        }
        self.total_votes()
            .checked_add(weight)
            .filter(|t| t.raw() <= MAX_TOTAL_VOTES)
            .ok_or(GovernanceError::Overflow)?;
        if support {
            self.for_votes = self.for_votes + weight;
        } else {
            self.against_votes = self.against_votes + weight;
        }
        let receipt = Receipt {
            has_voted: true,
            support,
            weight,
        };
        self.receipts.insert(voter.clone(), receipt);
        Ok(receipt)
    }

    /// The state implied by stored flags and the clock alone, or `None` once
    /// voting has closed and the tally decides.
    pub fn phase_at(&self, now: LogicalTime) -> Option<ProposalState> {
        if self.canceled {
            Some(ProposalState::Canceled)
        } else if self.executed {
            Some(ProposalState::Executed)
        } else if now <= self.start_time {
            Some(ProposalState::Pending)
        } else if now <= self.end_time {
            Some(ProposalState::Active)
        } else {
            None
        }
    }

    /// `floor((for + against) * 10000 / total_weight) >= quorum`.
    ///
    /// The division truncates; it is not rounded. A total weight of zero never
    /// reaches quorum.
    pub fn quorum_reached(&self, total_weight: Weight, quorum: BasisPoints) -> bool {
        BasisPoints::ratio_floor(self.total_votes(), total_weight)
            .map(|participation| participation >= quorum.get() as u128)
            .unwrap_or(false)
    }

    /// Strict majority: a tie is a loss.
    pub fn vote_succeeded(&self) -> bool {
        self.for_votes > self.against_votes
    }

    /// Outcome of a closed vote.
    pub fn closing_state(&self, total_weight: Weight, quorum: BasisPoints) -> ProposalState {
        if self.quorum_reached(total_weight, quorum) && self.vote_succeeded() {
            ProposalState::Succeeded
        } else {
            ProposalState::Defeated
        }
    }
}

/// Read-only projection of a proposal plus its computed state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDetails {
    pub id: ProposalId,
    pub proposer: AccountId,
    pub title: String,
    pub description: String,
    pub payload: String,
    pub start_time: LogicalTime,
    pub end_time: LogicalTime,
    pub for_votes: Weight,
    pub against_votes: Weight,
    pub executed: bool,
    pub canceled: bool,
    pub voter_count: usize,
    pub state: ProposalState,
}

impl ProposalDetails {
    pub(crate) fn from_proposal(proposal: &Proposal, state: ProposalState) -> Self {
        Self {
            id: proposal.id,
            proposer: proposal.proposer.clone(),
            title: proposal.title.clone(),
            description: proposal.description.clone(),
            payload: proposal.payload.clone(),
            start_time: proposal.start_time,
            end_time: proposal.end_time,
            for_votes: proposal.for_votes,
            against_votes: proposal.against_votes,
            executed: proposal.executed,
            canceled: proposal.canceled,
            voter_count: proposal.voter_count(),
            state,
        }
    }
}
