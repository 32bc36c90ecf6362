//! Minimal script construction: just enough to build coinbase inputs and
//! pay-to-pubkey outputs.

use serde::{Serialize, Serializer};
use std::fmt;

pub mod opcodes {
    pub const OP_0: u8 = 0x00;
    pub const OP_PUSHDATA1: u8 = 0x4c;
    pub const OP_PUSHDATA2: u8 = 0x4d;
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_1: u8 = 0x51;
    pub const OP_CHECKSIG: u8 = 0xac;
}

use opcodes::*;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pushes an integer, using the single-byte small-integer opcodes where
    /// they apply and a minimally encoded script number otherwise.
    pub fn push_int(mut self, n: i64) -> Self {
        match n {
            0 => self.0.push(OP_0),
            -1 => self.0.push(OP_1NEGATE),
            1..=16 => self.0.push(OP_1 + (n as u8 - 1)),
            _ => return self.push_slice(&encode_script_num(n)),
        }
        self
    }

    /// Pushes the script-number encoding of `n` as data, never as an opcode.
    pub fn push_num(self, n: i64) -> Self {
        self.push_slice(&encode_script_num(n))
    }

    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len < OP_PUSHDATA1 as usize {
            self.0.push(len as u8);
        } else if len <= 0xff {
            self.0.push(OP_PUSHDATA1);
            self.0.push(len as u8);
        } else if len <= 0xffff {
            self.0.push(OP_PUSHDATA2);
            self.0.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.0.push(OP_PUSHDATA4);
            self.0.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.0.extend_from_slice(data);
        self
    }

    pub fn push_opcode(mut self, op: u8) -> Self {
        self.0.push(op);
        self
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({})", hex::encode(&self.0))
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

/// Little-endian sign-magnitude encoding with no redundant bytes.
pub fn encode_script_num(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // the top bit of the last byte is the sign
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_num_encoding() {
        assert!(encode_script_num(0).is_empty());
        assert_eq!(encode_script_num(4), vec![0x04]);
        assert_eq!(encode_script_num(-1), vec![0x81]);
        assert_eq!(encode_script_num(128), vec![0x80, 0x00]);
        assert_eq!(encode_script_num(-128), vec![0x80, 0x80]);
        assert_eq!(encode_script_num(486604799), vec![0xff, 0xff, 0x00, 0x1d]);
    }

    #[test]
    fn test_push_int_uses_small_opcodes() {
        let script = Script::new().push_int(0).push_int(-1).push_int(16).push_int(17);
        assert_eq!(script.as_bytes(), &[OP_0, OP_1NEGATE, 0x60, 0x01, 0x11]);
    }

    #[test]
    fn test_push_num_is_always_data() {
        let script = Script::new().push_num(4);
        assert_eq!(script.as_bytes(), &[0x01, 0x04]);
    }

    #[test]
    fn test_push_slice_length_prefixes() {
        let short = Script::new().push_slice(&[0xaa; 75]);
        assert_eq!(short.as_bytes()[0], 75);
        assert_eq!(short.len(), 76);

        let medium = Script::new().push_slice(&[0xaa; 78]);
        assert_eq!(&medium.as_bytes()[..2], &[OP_PUSHDATA1, 78]);

        let long = Script::new().push_slice(&[0xaa; 300]);
        assert_eq!(&long.as_bytes()[..3], &[OP_PUSHDATA2, 0x2c, 0x01]);
    }
}
