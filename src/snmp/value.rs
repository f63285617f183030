use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Owned SNMP value, detached from the transport's borrowed PDU buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpValue {
    Integer(i64),
    OctetString(Vec<u8>),
    ObjectId(String),
    IpAddress([u8; 4]),
    Counter32(u32),
    Unsigned32(u32),
    Timeticks(u32),
    Counter64(u64),
    Null,
    /// NoSuchObject / NoSuchInstance / EndOfMibView and types we do not use.
    Other,
}

impl SnmpValue {
    pub fn string(s: &str) -> Self {
        SnmpValue::OctetString(s.as_bytes().to_vec())
    }

    /// Numeric view of any integer-like value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(i) => Some(*i),
            SnmpValue::Counter32(v) | SnmpValue::Unsigned32(v) | SnmpValue::Timeticks(v) => {
                Some(*v as i64)
            }
            SnmpValue::Counter64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_i64().and_then(|v| u32::try_from(v).ok())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            SnmpValue::OctetString(b) => Some(b),
            _ => None,
        }
    }

    /// Text view: octet strings decoded lossily with trailing NULs and
    /// whitespace removed, numbers rendered in decimal.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SnmpValue::OctetString(b) => Some(
                String::from_utf8_lossy(b)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string(),
            ),
            SnmpValue::ObjectId(oid) => Some(oid.clone()),
            SnmpValue::IpAddress(ip) => Some(Ipv4Addr::from(*ip).to_string()),
            other => other.as_i64().map(|v| v.to_string()),
        }
    }

    /// TruthValue / admin-status style integer: 1 = true, 2 = false.
    pub fn as_truth(&self) -> Option<bool> {
        match self.as_i64()? {
            1 => Some(true),
            2 => Some(false),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SnmpValue::Null | SnmpValue::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_view() {
        assert_eq!(
            SnmpValue::OctetString(b"uplink \0\0".to_vec()).as_text().as_deref(),
            Some("uplink")
        );
        assert_eq!(SnmpValue::Integer(-1).as_text().as_deref(), Some("-1"));
        assert_eq!(
            SnmpValue::IpAddress([10, 0, 0, 1]).as_text().as_deref(),
            Some("10.0.0.1")
        );
        assert_eq!(SnmpValue::Null.as_text(), None);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(SnmpValue::Counter32(7).as_u32(), Some(7));
        assert_eq!(SnmpValue::Integer(-5).as_u32(), None);
        assert_eq!(SnmpValue::Integer(1).as_truth(), Some(true));
        assert_eq!(SnmpValue::Integer(2).as_truth(), Some(false));
        assert_eq!(SnmpValue::Integer(3).as_truth(), None);
        assert!(SnmpValue::Other.is_missing());
    }
}
