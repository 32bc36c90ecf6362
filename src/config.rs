//! Configuration management for GusCoin chain selection

use crate::chainparams::{ChainParams, Network};
use crate::consensus::DeploymentPos;
use crate::error::ChainError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "guscoin.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChainConfig {
    #[serde(default = "default_network")]
    pub network: String,
    /// Version-bits window overrides, only honoured on regtest.
    #[serde(default)]
    pub vbparams: Vec<VersionBitsOverride>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            vbparams: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionBitsOverride {
    pub deployment: String,
    pub start_time: i64,
    pub timeout: i64,
}

fn default_network() -> String {
    Network::Main.as_str().to_string()
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ChainError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        let network: Network = self.chain.network.parse()?;

        if !self.chain.vbparams.is_empty() && network != Network::Regtest {
            return Err(ChainError::Config(format!(
                "vbparams may only be set on regtest, not {}",
                network
            )));
        }

        for entry in &self.chain.vbparams {
            entry.deployment.parse::<DeploymentPos>()?;
            if entry.timeout < entry.start_time {
                return Err(ChainError::Config(format!(
                    "vbparams for {}: timeout {} precedes start {}",
                    entry.deployment, entry.timeout, entry.start_time
                )));
            }
        }
        Ok(())
    }

    pub fn network(&self) -> Result<Network, ChainError> {
        self.chain.network.parse()
    }

    /// Applies the configured version-bits overrides to `params`.
    pub fn apply_to(&self, params: &mut ChainParams) -> Result<(), ChainError> {
        for entry in &self.chain.vbparams {
            let pos: DeploymentPos = entry.deployment.parse()?;
            params.update_version_bits_parameters(pos, entry.start_time, entry.timeout);
        }
        Ok(())
    }
}

/// Loads configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<Config, ChainError> {
    if !path.exists() {
        warn!("{} not found, using default configuration", path.display());
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)?;
    Config::from_toml(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chainparams::regtest_params;

    #[test]
    fn test_defaults_to_main() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.network().unwrap(), Network::Main);
        assert!(config.chain.vbparams.is_empty());
    }

    #[test]
    fn test_unknown_network_rejected() {
        let err = Config::from_toml("[chain]\nnetwork = \"signet\"\n").unwrap_err();
        assert_eq!(err, ChainError::UnknownNetwork("signet".to_string()));
    }

    #[test]
    fn test_vbparams_only_on_regtest() {
        let text = r#"
            [chain]
            network = "test"

            [[chain.vbparams]]
            deployment = "csv"
            start_time = 1
            timeout = 2
        "#;
        assert!(matches!(Config::from_toml(text), Err(ChainError::Config(_))));
    }

    #[test]
    fn test_vbparams_unknown_deployment() {
        let text = r#"
            [chain]
            network = "regtest"

            [[chain.vbparams]]
            deployment = "taproot"
            start_time = 1
            timeout = 2
        "#;
        assert_eq!(
            Config::from_toml(text).unwrap_err(),
            ChainError::UnknownDeployment("taproot".to_string())
        );
    }

    #[test]
    fn test_apply_overrides() {
        let text = r#"
            [chain]
            network = "regtest"

            [[chain.vbparams]]
            deployment = "segwit"
            start_time = 100
            timeout = 200
        "#;
        let config = Config::from_toml(text).unwrap();
        let mut params = regtest_params().unwrap();
        config.apply_to(&mut params).unwrap();

        let segwit = params.consensus.deployment(DeploymentPos::Segwit);
        assert_eq!((segwit.bit, segwit.start_time, segwit.timeout), (1, 100, 200));
        assert_eq!(params.consensus.deployment(DeploymentPos::Csv).start_time, 0);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/guscoin.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
