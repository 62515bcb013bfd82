//! The current state of the instruction text.

use charter_types::ProposalId;
use serde::{Deserialize, Serialize};

/// The instruction document and its revision metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionDocument {
    /// The full instruction text handed to the agent.
    pub text: String,
    /// Revision counter, incremented with each executed proposal.
    pub version: u64,
    /// The proposal that produced this revision (`None` at genesis).
    pub last_proposal: Option<ProposalId>,
}

impl InstructionDocument {
    /// Create the genesis document (version 0).
    pub fn genesis(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: 0,
            last_proposal: None,
        }
    }

    /// Produce the next revision carrying `text`.
    pub fn revise(&self, text: &str, proposal: ProposalId) -> Self {
        Self {
            text: text.to_string(),
            version: self.version + 1,
            last_proposal: Some(proposal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_starts_at_version_zero() {
        let doc = InstructionDocument::genesis("be helpful");
        assert_eq!(doc.version, 0);
        assert_eq!(doc.last_proposal, None);
    }

    #[test]
    fn revise_bumps_version_and_records_proposal() {
        let doc = InstructionDocument::genesis("v0").revise("v1", ProposalId::new(3));
        assert_eq!(doc.text, "v1");
        assert_eq!(doc.version, 1);
        assert_eq!(doc.last_proposal, Some(ProposalId::new(3)));
    }

    #[test]
    fn document_serializes_to_json() {
        let doc = InstructionDocument::genesis("hello").revise("world", ProposalId::new(1));
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"text":"world","version":1,"last_proposal":1}"#);
    }
}
