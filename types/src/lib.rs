//! Fundamental types for Charter governance.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account identities, proposal ids, voting weights, logical time and basis points.

pub mod account;
pub mod bps;
pub mod error;
pub mod proposal_id;
pub mod time;
pub mod weight;

pub use account::AccountId;
pub use bps::{BasisPoints, BPS_DENOMINATOR};
pub use error::TypeError;
pub use proposal_id::ProposalId;
pub use time::LogicalTime;
pub use weight::Weight;
