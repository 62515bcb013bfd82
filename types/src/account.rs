//! Account identity type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// An account known to the voting-power ledger.
///
/// Identities are opaque strings; the engine only compares them for equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse an identity, rejecting empty or whitespace-padded input.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        if raw.is_empty() || raw.trim() != raw {
            return Err(TypeError::InvalidAccount(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
