//! Per-network chain parameters.
//!
//! The three supported networks share one shape, [`ChainParams`], and differ
//! only in the values filled in by [`main_params`], [`testnet_params`] and
//! [`regtest_params`]. Each builder recomputes its genesis block and refuses
//! to return a profile whose genesis hash or merkle root disagree with the
//! pinned values.

use crate::block::Block;
use crate::consensus::{Bip9Deployment, ConsensusParams, DeploymentPos, NO_TIMEOUT};
use crate::error::ChainError;
use crate::genesis::{default_genesis_block, verify_genesis};
use crate::hash::Hash256;
use crate::transaction::COIN;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| ChainError::UnknownNetwork(s.to_string()))
    }
}

/// Kinds of base58 version prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
    ScriptAddress2,
    SecretKey,
    ExtPublicKey,
    ExtSecretKey,
}

impl Base58Type {
    pub const ALL: [Base58Type; 6] = [
        Base58Type::PubkeyAddress,
        Base58Type::ScriptAddress,
        Base58Type::ScriptAddress2,
        Base58Type::SecretKey,
        Base58Type::ExtPublicKey,
        Base58Type::ExtSecretKey,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Base58Prefixes {
    pub pubkey_address: Vec<u8>,
    pub script_address: Vec<u8>,
    pub script_address2: Vec<u8>,
    pub secret_key: Vec<u8>,
    pub ext_public_key: Vec<u8>,
    pub ext_secret_key: Vec<u8>,
}

impl Base58Prefixes {
    pub fn get(&self, kind: Base58Type) -> &[u8] {
        match kind {
            Base58Type::PubkeyAddress => &self.pubkey_address,
            Base58Type::ScriptAddress => &self.script_address,
            Base58Type::ScriptAddress2 => &self.script_address2,
            Base58Type::SecretKey => &self.secret_key,
            Base58Type::ExtPublicKey => &self.ext_public_key,
            Base58Type::ExtSecretKey => &self.ext_secret_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsSeed {
    pub host: String,
    /// Whether the seeder answers service-bit filtered queries.
    pub supports_service_bits: bool,
}

impl DnsSeed {
    fn new(host: &str, supports_service_bits: bool) -> Self {
        Self {
            host: host.to_string(),
            supports_service_bits,
        }
    }
}

/// Hard-coded block hashes by height. A `BTreeMap` keeps heights strictly
/// increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckpointData {
    pub checkpoints: BTreeMap<u32, Hash256>,
}

impl CheckpointData {
    pub fn last_checkpoint(&self) -> Option<(u32, Hash256)> {
        self.checkpoints.iter().next_back().map(|(h, hash)| (*h, *hash))
    }
}

/// Transaction counts used to estimate sync progress. Not consensus relevant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChainTxData {
    /// UNIX timestamp of the last known transaction count.
    pub time: i64,
    /// Transactions between genesis and `time`.
    pub tx_count: u64,
    /// Estimated transactions per second after `time`.
    pub tx_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    /// Message framing bytes. Rarely used upper ASCII, not valid UTF-8, and a
    /// large 32-bit integer at any alignment.
    pub message_start: [u8; 4],
    pub default_port: u16,
    pub prune_after_height: u64,
    pub genesis: Block,
    pub fixed_seeds: Vec<SocketAddr>,
    pub dns_seeds: Vec<DnsSeed>,
    pub base58_prefixes: Base58Prefixes,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub checkpoints: CheckpointData,
    pub chain_tx_data: ChainTxData,
}

impl ChainParams {
    pub fn for_network(network: Network) -> Result<Self, ChainError> {
        debug!("building chain params for {}", network);
        match network {
            Network::Main => main_params(),
            Network::Test => testnet_params(),
            Network::Regtest => regtest_params(),
        }
    }

    pub fn network_id(&self) -> &'static str {
        self.network.as_str()
    }

    pub fn is_test_chain(&self) -> bool {
        self.network != Network::Main
    }

    pub fn base58_prefix(&self, kind: Base58Type) -> &[u8] {
        self.base58_prefixes.get(kind)
    }

    /// Moves the signalling window of one deployment, keeping its bit.
    pub fn update_version_bits_parameters(&mut self, pos: DeploymentPos, start_time: i64, timeout: i64) {
        let deployment = self.consensus.deployment_mut(pos);
        deployment.start_time = start_time;
        deployment.timeout = timeout;
    }
}

/// Builds the parameters for a network named `main`, `test` or `regtest`.
pub fn create_chain_params(chain: &str) -> Result<ChainParams, ChainError> {
    let network: Network = chain.parse()?;
    ChainParams::for_network(network)
}

const GENESIS_HASH: &str = "0x9129d5e2e95570efcc7404d55f925539eee5ad1c8083fffeb8b5c9e30d7708b0";
const GENESIS_MERKLE_ROOT: &str = "0x211c9a816143aa151e5836230d09f6b8462b571f245606564f4b1b77e49b8bb8";

const GENESIS_TIME: u32 = 1515315613;
const GENESIS_NONCE: u32 = 201873;
const GENESIS_BITS: u32 = 0x1e0ffff0;

/// January 1, 2008 to December 31, 2008.
const TESTDUMMY: Bip9Deployment = Bip9Deployment {
    bit: 28,
    start_time: 1199145601,
    timeout: 1230767999,
};

/// Builds the shared genesis block and checks it against the pinned values.
fn checked_genesis(network: Network) -> Result<(Block, Hash256), ChainError> {
    let genesis = default_genesis_block(GENESIS_TIME, GENESIS_NONCE, GENESIS_BITS, 1, 50 * COIN);
    let expected_hash = Hash256::from_hex(GENESIS_HASH)?;
    let expected_merkle_root = Hash256::from_hex(GENESIS_MERKLE_ROOT)?;
    verify_genesis(network.as_str(), &genesis, &expected_hash, &expected_merkle_root)?;
    Ok((genesis, expected_hash))
}

fn genesis_checkpoint() -> Result<CheckpointData, ChainError> {
    let mut checkpoints = BTreeMap::new();
    checkpoints.insert(0, Hash256::from_hex(GENESIS_HASH)?);
    Ok(CheckpointData { checkpoints })
}

/// Main network.
pub fn main_params() -> Result<ChainParams, ChainError> {
    let (genesis, hash_genesis_block) = checked_genesis(Network::Main)?;

    let consensus = ConsensusParams {
        hash_genesis_block,
        subsidy_halving_interval: 840000,
        bip34_height: 710000,
        bip34_hash: Hash256::from_hex("fa09d204a83a768ed5a7c8d441fa62f2043abf420cff1226c7b4329aeb9d51cf")?,
        // bab3041e8977e0dc3eeff63fe707b92bde1dd449d8efafb248c27c8264cc311a
        bip65_height: 918684,
        // 7aceee012833fa8952f8835d8b1b3ae233cd6ab08fdb27a771d2bd7bdc491894
        bip66_height: 811879,
        pow_limit: Hash256::from_hex("00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")?,
        pow_allow_min_difficulty_blocks: false,
        pow_no_retargeting: false,
        pow_target_spacing: 30,
        pow_target_timespan: 10 * 30,
        rule_change_activation_threshold: 6048, // 75% of 8064
        miner_confirmation_window: 8064,
        deployments: [
            TESTDUMMY,
            // January 28, 2017 to January 31, 2018
            Bip9Deployment { bit: 0, start_time: 1485561600, timeout: 1517356801 },
            Bip9Deployment { bit: 1, start_time: 1485561600, timeout: 1517356801 },
        ],
        minimum_chain_work: Hash256::from_hex("0x00000000000000000000000000000000000000000000000ba50a60f8b56c7fe0")?,
        // height 1259849
        default_assume_valid: Hash256::from_hex("0x9ff8aec1244f9cb6ce7a077983c9c2ce119808cc9ffa316be1bb3b3c5a4c7150")?,
    };

    Ok(ChainParams {
        network: Network::Main,
        consensus,
        message_start: [0xa7, 0xab, 0x27, 0xd6],
        default_port: 28333,
        prune_after_height: 100000,
        genesis,
        fixed_seeds: Vec::new(),
        dns_seeds: Vec::new(),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![48],
            script_address: vec![16],
            script_address2: vec![50],
            secret_key: vec![204],
            ext_public_key: vec![0x04, 0x88, 0xB2, 0x1E],
            ext_secret_key: vec![0x04, 0x88, 0xAD, 0xE4],
        },
        default_consistency_checks: false,
        require_standard: true,
        mine_blocks_on_demand: false,
        checkpoints: genesis_checkpoint()?,
        chain_tx_data: ChainTxData {
            time: 1515315613,
            tx_count: 0,
            tx_rate: 500.0,
        },
    })
}

/// Public test network.
pub fn testnet_params() -> Result<ChainParams, ChainError> {
    let (genesis, hash_genesis_block) = checked_genesis(Network::Test)?;
    let bip34_hash = Hash256::from_hex("8075c771ed8b495ffd943980a95f702ab34fce3c8c54e379548bda33cc8c0573")?;

    let consensus = ConsensusParams {
        hash_genesis_block,
        subsidy_halving_interval: 840000,
        bip34_height: 76,
        bip34_hash,
        bip65_height: 76,
        bip66_height: 76,
        pow_limit: Hash256::from_hex("00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")?,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: false,
        pow_target_spacing: 30,
        pow_target_timespan: 7 * 12 * 60 * 60, // 3.5 days
        rule_change_activation_threshold: 1512, // 75% of 2016
        miner_confirmation_window: 2016,
        deployments: [
            TESTDUMMY,
            // January 1, 2017 to January 31, 2018
            Bip9Deployment { bit: 0, start_time: 1483228800, timeout: 1517356801 },
            Bip9Deployment { bit: 1, start_time: 1483228800, timeout: 1517356801 },
        ],
        minimum_chain_work: Hash256::from_hex("0x0000000000000000000000000000000000000000000000000000364b0cbc3568")?,
        // height 153490
        default_assume_valid: Hash256::from_hex("0xad8ff6c2f5580d2b50bd881e11312425ea84fa99f322bf132beb722f97971bba")?,
    };

    Ok(ChainParams {
        network: Network::Test,
        consensus,
        message_start: [0xfd, 0xd2, 0xc8, 0xf1],
        default_port: 29335,
        prune_after_height: 1000,
        genesis,
        fixed_seeds: Vec::new(),
        // seeders with service-bit filtering first
        dns_seeds: vec![
            DnsSeed::new("testnet-seed.guscointools.com", true),
            DnsSeed::new("seed-b.guscoin.loshan.co.uk", true),
            DnsSeed::new("dnsseed-testnet.thrasher.io", true),
        ],
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![111],
            script_address: vec![196],
            script_address2: vec![58],
            secret_key: vec![239],
            ext_public_key: vec![0x04, 0x35, 0x87, 0xCF],
            ext_secret_key: vec![0x04, 0x35, 0x83, 0x94],
        },
        default_consistency_checks: false,
        require_standard: false,
        mine_blocks_on_demand: false,
        checkpoints: genesis_checkpoint()?,
        chain_tx_data: ChainTxData {
            time: 1515315613,
            tx_count: 1,
            tx_rate: 28.0,
        },
    })
}

/// Local regression test network. Every deployment is active from genesis.
pub fn regtest_params() -> Result<ChainParams, ChainError> {
    let (genesis, hash_genesis_block) = checked_genesis(Network::Regtest)?;
    let always = |bit| Bip9Deployment {
        bit,
        start_time: 0,
        timeout: NO_TIMEOUT,
    };

    let consensus = ConsensusParams {
        hash_genesis_block,
        subsidy_halving_interval: 150,
        // far in the future so version 1 blocks are not rejected in tests
        bip34_height: 100_000_000,
        bip34_hash: Hash256::ZERO,
        bip65_height: 1351,
        bip66_height: 1251,
        pow_limit: Hash256::from_hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff")?,
        pow_allow_min_difficulty_blocks: true,
        pow_no_retargeting: true,
        pow_target_spacing: 30,
        pow_target_timespan: 7 * 12 * 60 * 60,
        rule_change_activation_threshold: 108, // 75% of 144
        miner_confirmation_window: 144,
        deployments: [always(28), always(0), always(1)],
        minimum_chain_work: Hash256::ZERO,
        default_assume_valid: Hash256::ZERO,
    };

    Ok(ChainParams {
        network: Network::Regtest,
        consensus,
        message_start: [0xa8, 0xac, 0x28, 0xda],
        default_port: 29444,
        prune_after_height: 1000,
        genesis,
        fixed_seeds: Vec::new(),
        dns_seeds: Vec::new(),
        base58_prefixes: Base58Prefixes {
            pubkey_address: vec![122],
            script_address: vec![188],
            script_address2: vec![60],
            secret_key: vec![250],
            ext_public_key: vec![0x04, 0x5f, 0x1c, 0xf6],
            ext_secret_key: vec![0x04, 0x5f, 0x18, 0xbc],
        },
        default_consistency_checks: true,
        require_standard: false,
        mine_blocks_on_demand: true,
        checkpoints: genesis_checkpoint()?,
        chain_tx_data: ChainTxData::default(),
    })
}
