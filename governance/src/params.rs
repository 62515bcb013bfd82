//! Adjustable governance parameters.
//!
//! One set per engine. Every state evaluation reads the values in effect at
//! evaluation time; only a proposal's start and end times freeze the voting
//! period at creation.

use crate::error::GovernanceError;
use charter_types::{BasisPoints, Weight};
use serde::{Deserialize, Serialize};

/// The trio controlling the proposal process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParameters {
    /// How long a proposal accepts votes, in clock units.
    pub voting_period: u64,
    /// Minimum weight an account needs to create a proposal.
    pub proposal_threshold: Weight,
    /// Minimum participation, as a fraction of total weight.
    pub quorum_threshold: BasisPoints,
}

impl GovernanceParameters {
    /// Build a parameter set, rejecting a quorum above 10000 basis points.
    pub fn new(
        voting_period: u64,
        proposal_threshold: u128,
        quorum_threshold_bps: u32,
    ) -> Result<Self, GovernanceError> {
        Ok(Self {
            voting_period,
            proposal_threshold: Weight::new(proposal_threshold),
            quorum_threshold: BasisPoints::new(quorum_threshold_bps)?,
        })
    }
}

impl Default for GovernanceParameters {
    /// Three days of 15-unit blocks, 100k weight to propose, 10% quorum.
    fn default() -> Self {
        Self {
            voting_period: 17_280,
            proposal_threshold: Weight::new(100_000),
            quorum_threshold: BasisPoints::saturating(1_000),
        }
    }
}
