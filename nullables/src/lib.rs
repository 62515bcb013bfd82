//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators of the engine (clock, voting-power oracle,
//! configuration store) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record what the engine asked of them
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod config_store;
pub mod oracle;

pub use clock::NullClock;
pub use config_store::{NullConfigStore, RecordedUpdate};
pub use oracle::NullOracle;
