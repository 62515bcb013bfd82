//! Weighted governance over the agent's instruction text.
//!
//! Lifecycle: Pending → Active → (Succeeded → Executed | Defeated), with
//! Canceled reachable from Pending or Active.
//!
//! Key principles:
//! - Voting weight is read live from the ledger when each vote is cast.
//! - Quorum is `floor((for + against) * 10000 / total_weight) >= quorum_bps`;
//!   a tie never passes.
//! - A succeeded proposal writes its payload to the instruction store exactly once.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod params;
pub mod proposal;
pub mod shared;

pub use config::{ConfigError, GovernanceConfig};
pub use engine::{Collaborators, GovernanceEngine};
pub use error::GovernanceError;
pub use event::{EventBus, GovernanceEvent};
pub use params::GovernanceParameters;
pub use proposal::{Proposal, ProposalDetails, ProposalState, Receipt};
pub use shared::SharedEngine;
