use serde::{Deserialize, Serialize};

/// Q-BRIDGE PortList: one bit per bridge port, MSB first, 8 ports per byte.
/// Port 1 is the high bit of byte 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortList {
    bytes: Vec<u8>,
}

impl PortList {
    /// Zero-filled list of `byte_count` bytes.
    pub fn with_len(byte_count: usize) -> Self {
        Self {
            bytes: vec![0; byte_count],
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Wire encoding for an SNMP SET (OCTET STRING payload).
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Number of addressable ports.
    pub fn port_capacity(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    fn locate(position: usize) -> Option<(usize, u8)> {
        if position == 0 {
            return None;
        }
        let bit = position - 1;
        Some((bit / 8, 0x80u8 >> (bit % 8)))
    }

    /// Bit for 1-based `position`; out-of-range positions read as unset.
    pub fn get(&self, position: usize) -> bool {
        match Self::locate(position) {
            Some((byte, mask)) => self.bytes.get(byte).is_some_and(|b| b & mask != 0),
            None => false,
        }
    }

    /// Set the bit for 1-based `position`, growing the list when needed.
    /// Position 0 is ignored.
    pub fn set(&mut self, position: usize, value: bool) {
        let Some((byte, mask)) = Self::locate(position) else {
            return;
        };
        if byte >= self.bytes.len() {
            if !value {
                return;
            }
            self.bytes.resize(byte + 1, 0);
        }
        if value {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }
    }

    /// Flip the bit order inside every byte, for agents that report LSB first.
    pub fn reverse_bits(&mut self) {
        for b in self.bytes.iter_mut() {
            *b = b.reverse_bits();
        }
    }

    /// 1-based positions of all set bits, ascending.
    pub fn ports(&self) -> Vec<usize> {
        (1..=self.port_capacity()).filter(|p| self.get(*p)).collect()
    }

    /// Lower-case hex rendering for diagnostics, e.g. "80ff00".
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
