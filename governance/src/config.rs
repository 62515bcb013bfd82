//! Governance configuration with TOML file support.

use crate::params::GovernanceParameters;
use charter_types::AccountId;
use charter_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for one governance engine.
///
/// Can be loaded from a TOML file via [`GovernanceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Voting window length in clock units.
    #[serde(default = "default_voting_period")]
    pub voting_period: u64,

    /// Minimum weight needed to create a proposal.
    #[serde(default = "default_proposal_threshold")]
    pub proposal_threshold: u64,

    /// Minimum participation in basis points (0–10000).
    #[serde(default = "default_quorum_threshold_bps")]
    pub quorum_threshold_bps: u32,

    /// Account allowed to change parameters.
    #[serde(default = "default_admin")]
    pub admin: String,

    /// Identity the engine presents to the instruction store.
    #[serde(default = "default_governor")]
    pub governor: String,

    /// Instruction text in force before any proposal executes.
    #[serde(default)]
    pub genesis_instructions: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_voting_period() -> u64 {
    GovernanceParameters::default().voting_period
}

fn default_proposal_threshold() -> u64 {
    GovernanceParameters::default().proposal_threshold.raw() as u64
}

fn default_quorum_threshold_bps() -> u32 {
    GovernanceParameters::default().quorum_threshold.get()
}

fn default_admin() -> String {
    "admin".to_string()
}

fn default_governor() -> String {
    "governor".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GovernanceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The validated parameter set this config describes.
    pub fn parameters(&self) -> Result<GovernanceParameters, ConfigError> {
        GovernanceParameters::new(
            self.voting_period,
            self.proposal_threshold as u128,
            self.quorum_threshold_bps,
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn admin_id(&self) -> Result<AccountId, ConfigError> {
        AccountId::parse(&self.admin).map_err(|e| ConfigError::Invalid(format!("admin: {e}")))
    }

    pub fn governor_id(&self) -> Result<AccountId, ConfigError> {
        AccountId::parse(&self.governor)
            .map_err(|e| ConfigError::Invalid(format!("governor: {e}")))
    }

    /// Check every field that can be invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parameters()?;
        let admin = self.admin_id()?;
        let governor = self.governor_id()?;
        if admin == governor {
            return Err(ConfigError::Invalid(
                "admin and governor must be distinct identities".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            voting_period: default_voting_period(),
            proposal_threshold: default_proposal_threshold(),
            quorum_threshold_bps: default_quorum_threshold_bps(),
            admin: default_admin(),
            governor: default_governor(),
            genesis_instructions: String::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = GovernanceConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = GovernanceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = GovernanceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.voting_period, 17_280);
        assert_eq!(config.proposal_threshold, 100_000);
        assert_eq!(config.quorum_threshold_bps, 1_000);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.parameters().unwrap(), GovernanceParameters::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            voting_period = 40
            quorum_threshold_bps = 2500
            log_format = "json"
        "#;
        let config = GovernanceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.voting_period, 40);
        let params = config.parameters().unwrap();
        assert_eq!(params.quorum_threshold.get(), 2_500);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.admin, "admin"); // default
    }

    #[test]
    fn quorum_above_full_is_invalid() {
        let config = GovernanceConfig::from_toml_str("quorum_threshold_bps = 10001").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn admin_and_governor_must_differ() {
        let config =
            GovernanceConfig::from_toml_str("admin = \"same\"\ngovernor = \"same\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unparsable_toml_is_a_parse_error() {
        assert!(matches!(
            GovernanceConfig::from_toml_str("voting_period = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "proposal_threshold = 5\ngenesis_instructions = \"be kind\"").unwrap();
        let config = GovernanceConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.proposal_threshold, 5);
        assert_eq!(config.genesis_instructions, "be kind");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GovernanceConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
