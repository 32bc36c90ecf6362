//! Compact ("nBits") target decoding

use crate::error::ChainError;
use crate::hash::Hash256;
use std::fmt;

/// A 256-bit proof-of-work target, big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Target([u8; 32]);

impl Target {
    /// Decodes a compact target. Negative and overflowing encodings are
    /// rejected; a zero mantissa decodes to the zero target.
    pub fn from_compact(bits: u32) -> Result<Self, ChainError> {
        let size = (bits >> 24) as usize;
        let word = bits & 0x007f_ffff;

        if word != 0 && bits & 0x0080_0000 != 0 {
            return Err(ChainError::InvalidCompactTarget(bits));
        }
        if word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32)) {
            return Err(ChainError::InvalidCompactTarget(bits));
        }

        let mut out = [0u8; 32];
        if size <= 3 {
            let value = word >> (8 * (3 - size));
            out[28..].copy_from_slice(&value.to_be_bytes());
        } else {
            let mantissa = word.to_le_bytes();
            for (i, byte) in mantissa.iter().take(3).enumerate() {
                // byte i sits at little-endian position (size - 3 + i)
                let pos = size - 3 + i;
                if pos < 32 {
                    out[31 - pos] = *byte;
                }
            }
        }
        Ok(Target(out))
    }

    /// Interprets a display-order hash (such as a pow limit) as a target.
    pub fn from_hash(hash: &Hash256) -> Self {
        Target(hash.to_be_bytes())
    }

    pub fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True when `hash`, read as a 256-bit integer, does not exceed the target.
    pub fn is_met_by(&self, hash: &Hash256) -> bool {
        hash.to_be_bytes() <= self.0
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Target({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_genesis_bits() {
        let target = Target::from_compact(0x1e0ffff0).unwrap();
        let mut expected = [0u8; 32];
        expected[2] = 0x0f;
        expected[3] = 0xff;
        expected[4] = 0xf0;
        assert_eq!(target.as_be_bytes(), &expected);
    }

    #[test]
    fn test_decodes_regtest_bits() {
        let target = Target::from_compact(0x207fffff).unwrap();
        assert_eq!(&target.as_be_bytes()[..3], &[0x7f, 0xff, 0xff]);
        assert!(target.as_be_bytes()[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_small_size_shifts_right() {
        let target = Target::from_compact(0x01123456).unwrap();
        assert_eq!(target.as_be_bytes()[31], 0x12);
        assert!(target.as_be_bytes()[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_rejects_negative_and_overflow() {
        assert!(matches!(
            Target::from_compact(0x04923456),
            Err(ChainError::InvalidCompactTarget(_))
        ));
        assert!(Target::from_compact(0xff123456).is_err());
        // zero mantissa is never negative nor overflowing
        assert!(Target::from_compact(0xff000000).is_ok());
    }

    #[test]
    fn test_genesis_bits_within_pow_limit() {
        let limit = Hash256::from_hex(
            "00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .unwrap();
        let target = Target::from_compact(0x1e0ffff0).unwrap();
        assert!(target <= Target::from_hash(&limit));
    }

    #[test]
    fn test_is_met_by() {
        let target = Target::from_compact(0x207fffff).unwrap();
        assert!(target.is_met_by(&Hash256::ZERO));
        assert!(!target.is_met_by(&Hash256::from_bytes([0xff; 32])));
    }
}
