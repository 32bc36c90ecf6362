//! Consensus-critical parameters shared by every node on a network.

use crate::error::ChainError;
use crate::hash::Hash256;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Soft forks that signal through version bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentPos {
    TestDummy,
    /// BIP68, BIP112 and BIP113.
    Csv,
    /// BIP141, BIP143 and BIP147.
    Segwit,
}

pub const MAX_VERSION_BITS_DEPLOYMENTS: usize = 3;

impl DeploymentPos {
    pub const ALL: [DeploymentPos; MAX_VERSION_BITS_DEPLOYMENTS] =
        [DeploymentPos::TestDummy, DeploymentPos::Csv, DeploymentPos::Segwit];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
            DeploymentPos::Segwit => "segwit",
        }
    }
}

impl fmt::Display for DeploymentPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentPos {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentPos::ALL
            .into_iter()
            .find(|pos| pos.name() == s)
            .ok_or_else(|| ChainError::UnknownDeployment(s.to_string()))
    }
}

/// Signalling window for one version-bits deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bip9Deployment {
    /// Bit position in the block version.
    pub bit: u8,
    /// Median time past at which signalling may begin.
    pub start_time: i64,
    /// Median time past after which the attempt is abandoned.
    pub timeout: i64,
}

/// Timeout used where a deployment should never expire in practice.
pub const NO_TIMEOUT: i64 = 999_999_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsensusParams {
    pub hash_genesis_block: Hash256,
    pub subsidy_halving_interval: u32,
    /// Block height and hash at which BIP34 becomes active.
    pub bip34_height: u32,
    pub bip34_hash: Hash256,
    /// Block height at which BIP65 becomes active.
    pub bip65_height: u32,
    /// Block height at which BIP66 becomes active.
    pub bip66_height: u32,
    pub pow_limit: Hash256,
    pub pow_allow_min_difficulty_blocks: bool,
    pub pow_no_retargeting: bool,
    pub pow_target_spacing: i64,
    pub pow_target_timespan: i64,
    /// Blocks in a confirmation window that must signal for a deployment
    /// to lock in.
    pub rule_change_activation_threshold: u32,
    pub miner_confirmation_window: u32,
    pub deployments: [Bip9Deployment; MAX_VERSION_BITS_DEPLOYMENTS],
    /// The best chain should have at least this much work.
    pub minimum_chain_work: Hash256,
    /// Signatures in ancestors of this block are assumed valid.
    pub default_assume_valid: Hash256,
}

impl ConsensusParams {
    pub fn deployment(&self, pos: DeploymentPos) -> &Bip9Deployment {
        &self.deployments[pos.index()]
    }

    pub fn deployment_mut(&mut self, pos: DeploymentPos) -> &mut Bip9Deployment {
        &mut self.deployments[pos.index()]
    }

    pub fn difficulty_adjustment_interval(&self) -> i64 {
        self.pow_target_timespan / self.pow_target_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_names_roundtrip() {
        for pos in DeploymentPos::ALL {
            assert_eq!(pos.to_string().parse::<DeploymentPos>().unwrap(), pos);
        }
        assert!(matches!(
            "taproot".parse::<DeploymentPos>(),
            Err(ChainError::UnknownDeployment(name)) if name == "taproot"
        ));
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, pos) in DeploymentPos::ALL.iter().enumerate() {
            assert_eq!(pos.index(), i);
        }
    }
}
