//! Block headers, blocks and merkle roots

use crate::error::ChainError;
use crate::hash::{double_sha256, scrypt_hash, Hash256};
use crate::transaction::Transaction;
use serde::Serialize;

pub const HEADER_SIZE: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_blockhash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.version.to_le_bytes());
        buf[4..36].copy_from_slice(self.prev_blockhash.as_bytes());
        buf[36..68].copy_from_slice(self.merkle_root.as_bytes());
        buf[68..72].copy_from_slice(&self.time.to_le_bytes());
        buf[72..76].copy_from_slice(&self.bits.to_le_bytes());
        buf[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        buf
    }

    /// Identity hash: double SHA-256 of the serialized header.
    pub fn hash(&self) -> Hash256 {
        double_sha256(&self.serialize())
    }

    /// Proof-of-work hash, compared against the compact target.
    pub fn pow_hash(&self) -> Result<Hash256, ChainError> {
        scrypt_hash(&self.serialize())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    /// Recomputes the merkle root from the block's transactions.
    pub fn compute_merkle_root(&self) -> Hash256 {
        let txids: Vec<Hash256> = self.transactions.iter().map(Transaction::txid).collect();
        merkle_root(&txids)
    }
}

/// Root of the merkle tree over `leaves`.
///
/// An odd node at any level is paired with itself. An empty list yields the
/// null hash; a single leaf is its own root.
pub fn merkle_root(leaves: &[Hash256]) -> Hash256 {
    if leaves.is_empty() {
        return Hash256::ZERO;
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(left.as_bytes());
                buf[32..].copy_from_slice(right.as_bytes());
                double_sha256(&buf)
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: u8) -> Hash256 {
        double_sha256(&[n])
    }

    fn pair(a: Hash256, b: Hash256) -> Hash256 {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(a.as_bytes());
        buf.extend_from_slice(b.as_bytes());
        double_sha256(&buf)
    }

    #[test]
    fn test_single_leaf_is_root() {
        let only = leaf(7);
        assert_eq!(merkle_root(&[only]), only);
    }

    #[test]
    fn test_empty_tree_is_null() {
        assert!(merkle_root(&[]).is_null());
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        let (a, b, c) = (leaf(1), leaf(2), leaf(3));
        let expected = pair(pair(a, b), pair(c, c));
        assert_eq!(merkle_root(&[a, b, c]), expected);
    }

    #[test]
    fn test_header_layout() {
        let header = BlockHeader {
            version: 1,
            prev_blockhash: Hash256::ZERO,
            merkle_root: leaf(1),
            time: 0x01020304,
            bits: 0x1e0ffff0,
            nonce: 201873,
        };
        let bytes = header.serialize();
        assert_eq!(&bytes[0..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[36..68], leaf(1).as_bytes());
        assert_eq!(&bytes[68..72], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[72..76], &[0xf0, 0xff, 0x0f, 0x1e]);
        assert_eq!(header.hash(), double_sha256(&bytes));
        assert_eq!(header.pow_hash().unwrap(), scrypt_hash(&bytes).unwrap());
        assert_ne!(header.pow_hash().unwrap(), header.hash());
    }
}
