//! Error types for GusCoin chain parameters

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Unknown chain {0}")]
    UnknownNetwork(String),
    #[error("Genesis integrity failure on {network}: {field} is {computed}, expected {expected}")]
    GenesisIntegrity {
        network: String,
        field: &'static str,
        expected: String,
        computed: String,
    },
    #[error("Unknown deployment: {0}")]
    UnknownDeployment(String),
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Invalid compact target: {0:#010x}")]
    InvalidCompactTarget(u32),
    #[error("Proof-of-work hash failed: {0}")]
    PowHash(String),
    #[error("Nonce space exhausted without meeting target")]
    NonceSpaceExhausted,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::Config(err.to_string())
    }
}

impl From<hex::FromHexError> for ChainError {
    fn from(err: hex::FromHexError) -> Self {
        ChainError::InvalidHex(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
