//! Collaborator traits consumed by the governance engine.
//!
//! The voting-power ledger, the logical clock and the protected configuration
//! value all live outside the engine. Every backend (a ledger bridge, an
//! in-memory double for testing) implements these traits. The engine depends
//! only on the traits.

pub mod clock;
pub mod config;
pub mod error;
pub mod oracle;

pub use clock::ClockSource;
pub use config::ConfigurationStore;
pub use error::StoreError;
pub use oracle::VotingPowerOracle;
