//! GusCoin - consensus parameters and genesis construction
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Primitives
//! - [`hash`] - 256-bit hashes and double SHA-256
//! - [`script`] - Script construction for coinbase inputs and outputs
//! - [`transaction`] - Transaction types and wire serialization
//! - [`block`] - Block headers, block hashes and merkle roots
//! - [`pow`] - Compact target decoding
//!
//! ## Chain Parameters
//! - [`genesis`] - Deterministic genesis block builder
//! - [`consensus`] - Consensus parameter record and version-bits deployments
//! - [`chainparams`] - Network profiles for main, test and regtest
//! - [`params`] - Process-wide active profile
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Primitives
// ============================================================================
pub mod block;
pub mod hash;
pub mod pow;
pub mod script;
pub mod transaction;

// ============================================================================
// Chain Parameters
// ============================================================================
pub mod chainparams;
pub mod consensus;
pub mod genesis;
pub mod params;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use chainparams::{create_chain_params, ChainParams, Network};
pub use error::{ChainError, Result};
pub use params::{params, select_params, update_version_bits_parameters};
