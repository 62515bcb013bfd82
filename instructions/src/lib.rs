//! The agent's instruction document.
//!
//! A single block of text decides how the agent behaves. It is only ever
//! replaced through an executed governance proposal: the store accepts
//! updates from the governor it was bound to, and from nobody else.

pub mod document;
pub mod store;

pub use document::InstructionDocument;
pub use store::InstructionStore;
