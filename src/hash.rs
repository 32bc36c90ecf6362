//! Hash primitives for GusCoin

use crate::error::ChainError;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 256-bit hash held in internal byte order.
///
/// The reference client stores hashes little-endian and prints them
/// byte-reversed, so `Display` and `from_hex` both work in the reversed
/// (big-endian) form that block explorers show.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Hash256(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parses a display-order hex string.
    ///
    /// Accepts an optional `0x` prefix and inputs shorter than 64 digits,
    /// which are left-padded with zeros (`"0x00"` is the null hash).
    pub fn from_hex(input: &str) -> Result<Self, ChainError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || digits.len() > 64 {
            return Err(ChainError::InvalidHex(format!(
                "expected 1 to 64 hex digits, got {}",
                digits.len()
            )));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| ChainError::InvalidHex(format!("{}: {}", input, e)))?;
        bytes.reverse();
        Ok(Hash256(bytes))
    }

    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// The hash as a big-endian 256-bit integer, for target comparisons.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut reversed = self.0;
        reversed.reverse();
        reversed
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash256::from_hex(s)
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// SHA-256 applied twice, as used for block and transaction ids.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    Hash256(Sha256::digest(first).into())
}

/// scrypt with N=1024, r=1, p=1 and `data` as both password and salt.
pub fn scrypt_hash(data: &[u8]) -> Result<Hash256, ChainError> {
    let params = scrypt::Params::new(10, 1, 1, 32).map_err(|e| ChainError::PowHash(e.to_string()))?;
    let mut out = [0u8; 32];
    scrypt::scrypt(data, data, &params, &mut out).map_err(|e| ChainError::PowHash(e.to_string()))?;
    Ok(Hash256(out))
}
