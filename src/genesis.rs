//! Genesis block construction
//!
//! The genesis block is a pure function of a handful of scalars. Every
//! network profile hard-codes the hash and merkle root this module must
//! reproduce, so nothing in here may depend on the clock, randomness or
//! process state.

use crate::block::{Block, BlockHeader};
use crate::error::ChainError;
use crate::hash::Hash256;
use crate::pow::Target;
use crate::script::{opcodes::OP_CHECKSIG, Script};
use crate::transaction::{Amount, OutPoint, Transaction, TxIn, TxOut, SEQUENCE_FINAL};
use rayon::prelude::*;
use tracing::{debug, info};

/// Headline embedded in the coinbase of every GusCoin genesis block.
pub const GENESIS_TIMESTAMP_TEXT: &str =
    "NY Times 01/JAN/2018 Trump Defends Mental Fitness Saying He is a Stable Genius";

/// Uncompressed public key paid by the genesis coinbase.
pub const GENESIS_OUTPUT_PUBKEY: [u8; 65] = [
    0x04, 0x09, 0x44, 0x23, 0x36, 0xe1, 0xc5, 0x7c,
    0xf0, 0xdd, 0xad, 0x15, 0xb2, 0xec, 0xa4, 0xde,
    0xba, 0x85, 0xdd, 0xd1, 0x3c, 0x13, 0xd5, 0x22,
    0x34, 0xbf, 0x1d, 0xa8, 0xe6, 0x18, 0xbb, 0x54,
    0xd4, 0x00, 0x0f, 0x5f, 0x40, 0xe8, 0x40, 0x70,
    0x73, 0xb2, 0xf0, 0x5f, 0xa9, 0x86, 0xae, 0x2e,
    0x4c, 0x1f, 0xec, 0xa9, 0xe3, 0xf9, 0xe4, 0xf6,
    0x58, 0xbc, 0x8f, 0x3d, 0xf5, 0xeb, 0x12, 0x4b,
    0x76,
];

/// First push of the coinbase script (0x1d00ffff, the upstream genesis bits).
pub const COINBASE_BITS_PUSH: i64 = 486_604_799;
pub const COINBASE_EXTRA_NONCE: i64 = 4;

/// Scalar inputs that fully determine a genesis block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisInputs {
    pub timestamp_text: String,
    pub output_script: Script,
    pub time: u32,
    pub nonce: u32,
    pub bits: u32,
    pub version: i32,
    pub reward: Amount,
}

impl GenesisInputs {
    /// Inputs using the network-wide headline and output script.
    pub fn standard(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Self {
        Self {
            timestamp_text: GENESIS_TIMESTAMP_TEXT.to_string(),
            output_script: genesis_output_script(),
            time,
            nonce,
            bits,
            version,
            reward,
        }
    }
}

pub fn genesis_output_script() -> Script {
    Script::new()
        .push_slice(&GENESIS_OUTPUT_PUBKEY)
        .push_opcode(OP_CHECKSIG)
}

/// Builds the single-transaction genesis block described by `inputs`.
///
/// The coinbase output cannot be spent since it never entered the UTXO set.
pub fn create_genesis_block(inputs: &GenesisInputs) -> Block {
    let script_sig = Script::new()
        .push_int(COINBASE_BITS_PUSH)
        .push_num(COINBASE_EXTRA_NONCE)
        .push_slice(inputs.timestamp_text.as_bytes());

    let coinbase = Transaction {
        version: 1,
        inputs: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: SEQUENCE_FINAL,
        }],
        outputs: vec![TxOut {
            value: inputs.reward,
            script_pubkey: inputs.output_script.clone(),
        }],
        lock_time: 0,
    };

    // one leaf: the merkle root is the coinbase txid itself
    let merkle_root = coinbase.txid();

    Block {
        header: BlockHeader {
            version: inputs.version,
            prev_blockhash: Hash256::ZERO,
            merkle_root,
            time: inputs.time,
            bits: inputs.bits,
            nonce: inputs.nonce,
        },
        transactions: vec![coinbase],
    }
}

pub fn default_genesis_block(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Block {
    create_genesis_block(&GenesisInputs::standard(time, nonce, bits, version, reward))
}

/// Checks a freshly built genesis block against the values a profile pins.
pub fn verify_genesis(
    network: &str,
    block: &Block,
    expected_hash: &Hash256,
    expected_merkle_root: &Hash256,
) -> Result<(), ChainError> {
    let merkle_root = block.compute_merkle_root();
    if merkle_root != block.header.merkle_root || merkle_root != *expected_merkle_root {
        return Err(ChainError::GenesisIntegrity {
            network: network.to_string(),
            field: "merkle root",
            expected: expected_merkle_root.to_hex(),
            computed: merkle_root.to_hex(),
        });
    }

    let hash = block.hash();
    if hash != *expected_hash {
        return Err(ChainError::GenesisIntegrity {
            network: network.to_string(),
            field: "block hash",
            expected: expected_hash.to_hex(),
            computed: hash.to_hex(),
        });
    }

    debug!("{} genesis verified: {}", network, hash);
    Ok(())
}

/// Searches for the lowest nonce at or above `start_nonce` whose scrypt
/// proof-of-work hash meets the block's own compact target.
///
/// Only needed when minting parameters for a new network. Runs across the
/// rayon thread pool.
pub fn mine_genesis_nonce(block: &Block, start_nonce: u32) -> Result<u32, ChainError> {
    let target = Target::from_compact(block.header.bits)?;
    info!(
        "searching genesis nonce from {} for bits {:#010x}",
        start_nonce, block.header.bits
    );

    let header = block.header;
    let found = (start_nonce..=u32::MAX).into_par_iter().find_map_first(|nonce| {
        let mut candidate = header;
        candidate.nonce = nonce;
        match candidate.pow_hash() {
            Ok(pow) if target.is_met_by(&pow) => Some(Ok((nonce, pow))),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        }
    });

    match found {
        Some(Ok((nonce, pow))) => {
            let mut mined = header;
            mined.nonce = nonce;
            info!("genesis nonce {} gives pow hash {} and block hash {}", nonce, pow, mined.hash());
            Ok(nonce)
        }
        Some(Err(err)) => Err(err),
        None => Err(ChainError::NonceSpaceExhausted),
    }
}
