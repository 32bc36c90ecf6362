//! Transaction types and their consensus serialization

use crate::hash::{double_sha256, Hash256};
use crate::script::Script;
use serde::Serialize;

/// Amount in the smallest currency unit.
pub type Amount = i64;

/// Smallest units per coin.
pub const COIN: Amount = 100_000_000;

pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OutPoint {
    pub txid: Hash256,
    pub vout: u32,
}

impl OutPoint {
    /// The sentinel referenced by coinbase inputs.
    pub const fn null() -> Self {
        OutPoint {
            txid: Hash256::ZERO,
            vout: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid.is_null() && self.vout == u32::MAX
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxIn {
    pub previous_output: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOut {
    pub value: Amount,
    pub script_pubkey: Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Legacy (non-witness) wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(&self.version.to_le_bytes());

        write_compact_size(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            buf.extend_from_slice(input.previous_output.txid.as_bytes());
            buf.extend_from_slice(&input.previous_output.vout.to_le_bytes());
            write_compact_size(&mut buf, input.script_sig.len() as u64);
            buf.extend_from_slice(input.script_sig.as_bytes());
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }

        write_compact_size(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            write_compact_size(&mut buf, output.script_pubkey.len() as u64);
            buf.extend_from_slice(output.script_pubkey.as_bytes());
        }

        buf.extend_from_slice(&self.lock_time.to_le_bytes());
        buf
    }

    pub fn txid(&self) -> Hash256 {
        double_sha256(&self.serialize())
    }
}

pub(crate) fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tx() -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: Script::from_bytes(vec![0x51]),
                sequence: SEQUENCE_FINAL,
            }],
            outputs: vec![TxOut {
                value: 50 * COIN,
                script_pubkey: Script::from_bytes(vec![0xac]),
            }],
            lock_time: 0,
        }
    }

    #[test]
    fn test_compact_size_boundaries() {
        let mut buf = Vec::new();
        write_compact_size(&mut buf, 0xfc);
        assert_eq!(buf, vec![0xfc]);

        buf.clear();
        write_compact_size(&mut buf, 0xfd);
        assert_eq!(buf, vec![0xfd, 0xfd, 0x00]);

        buf.clear();
        write_compact_size(&mut buf, 0x1_0000);
        assert_eq!(buf, vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_coinbase_detection() {
        let tx = sample_tx();
        assert!(tx.is_coinbase());

        let mut spend = tx.clone();
        spend.inputs[0].previous_output.vout = 0;
        assert!(!spend.is_coinbase());
    }

    #[test]
    fn test_serialized_layout() {
        let bytes = sample_tx().serialize();
        // version + count + outpoint + script + sequence + count + value + script + locktime
        assert_eq!(bytes.len(), 4 + 1 + 36 + 2 + 4 + 1 + 8 + 2 + 4);
        assert_eq!(&bytes[..5], &[1, 0, 0, 0, 1]);
        assert_eq!(&bytes[37..41], &[0xff; 4]);
    }

    #[test]
    fn test_txid_changes_with_content() {
        let tx = sample_tx();
        let mut other = tx.clone();
        other.outputs[0].value += 1;
        assert_ne!(tx.txid(), other.txid());
        assert_eq!(tx.txid(), sample_tx().txid());
    }
}
