use crate::proposal::ProposalState;
use charter_store::StoreError;
use charter_types::{AccountId, ProposalId, TypeError, Weight};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} does not exist")]
    InvalidProposalId(ProposalId),

    #[error("insufficient voting power: have {have}, need {need}")]
    InsufficientPower { have: Weight, need: Weight },

    #[error("proposal {proposal} is not active (state: {state})")]
    NotActive {
        proposal: ProposalId,
        state: ProposalState,
    },

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted {
        voter: AccountId,
        proposal: ProposalId,
    },

    #[error("proposal {proposal} cannot be canceled (state: {state})")]
    NotCancelable {
        proposal: ProposalId,
        state: ProposalState,
    },

    #[error("{caller} may not cancel proposal {proposal}")]
    Unauthorized {
        caller: AccountId,
        proposal: ProposalId,
    },

    #[error("proposal {proposal} has not succeeded (state: {state})")]
    NotSucceeded {
        proposal: ProposalId,
        state: ProposalState,
    },

    #[error("{0} is not the governance administrator")]
    AdminOnly(AccountId),

    #[error("invalid governance parameters: {0}")]
    InvalidParameters(String),

    #[error("re-entrant call into the governance engine")]
    Reentrant,

    #[error("governance engine lock poisoned by a panicked operation")]
    Poisoned,

    #[error("configuration update for proposal {proposal} failed: {source}")]
    ConfigurationUpdateFailed {
        proposal: ProposalId,
        #[source]
        source: StoreError,
    },

    #[error("voting power oracle error: {0}")]
    Oracle(#[from] StoreError),

    #[error("arithmetic overflow in governance computation")]
    Overflow,
}

impl From<TypeError> for GovernanceError {
    fn from(e: TypeError) -> Self {
        Self::InvalidParameters(e.to_string())
    }
}
