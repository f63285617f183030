use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;

/// Display dialect for MAC addresses. Applied only when rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacFormat {
    /// aa:bb:cc:dd:ee:ff
    #[default]
    Colon,
    /// AA-BB-CC-DD-EE-FF
    Hyphen,
    /// aabb.ccdd.eeff
    Cisco,
}

impl MacFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colon" | ":" => Some(Self::Colon),
            "hyphen" | "dash" | "-" => Some(Self::Hyphen),
            "cisco" | "dot" | "." => Some(Self::Cisco),
            _ => None,
        }
    }
}

/// A 6-byte MAC address, stored without any formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.try_into().ok()?;
        Some(Self(octets))
    }

    /// Parse any common notation: colon, hyphen, dotted or bare hex.
    pub fn parse(s: &str) -> Option<Self> {
        let clean: Vec<u8> = s
            .chars()
            .filter(|c| c.is_ascii_hexdigit())
            .map(|c| c.to_digit(16).unwrap_or(0) as u8)
            .collect();
        let stripped: String = s.chars().filter(|c| !matches!(c, ':' | '-' | '.')).collect();
        if clean.len() != 12 || stripped.trim().len() != 12 {
            return None;
        }
        let mut octets = [0u8; 6];
        for (i, pair) in clean.chunks(2).enumerate() {
            octets[i] = (pair[0] << 4) | pair[1];
        }
        Some(Self(octets))
    }

    /// MAC encoded in the last six sub-identifiers of an OID index,
    /// e.g. "0.28.115.170.187.204".
    pub fn from_oid_index(index: &str) -> Option<Self> {
        let parts: Vec<&str> = index.split('.').collect();
        if parts.len() < 6 {
            return None;
        }
        let mut octets = [0u8; 6];
        for (i, p) in parts[parts.len() - 6..].iter().enumerate() {
            octets[i] = p.parse().ok()?;
        }
        Some(Self(octets))
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn oui(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn format(&self, format: MacFormat) -> String {
        let o = self.0;
        match format {
            MacFormat::Colon => format!(
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                o[0], o[1], o[2], o[3], o[4], o[5]
            ),
            MacFormat::Hyphen => format!(
                "{:02X}-{:02X}-{:02X}-{:02X}-{:02X}-{:02X}",
                o[0], o[1], o[2], o[3], o[4], o[5]
            ),
            MacFormat::Cisco => format!(
                "{:02x}{:02x}.{:02x}{:02x}.{:02x}{:02x}",
                o[0], o[1], o[2], o[3], o[4], o[5]
            ),
        }
    }

    /// Vendor name for the OUI, if it is one we know.
    pub fn vendor(&self) -> Option<&'static str> {
        let oui = self.oui();
        KNOWN_OUIS
            .iter()
            .find(|(prefix, _)| *prefix == oui)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(MacFormat::Colon))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MacAddress::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid MAC address: {}", s)))
    }
}

/// Small built-in OUI table for display hints.
const KNOWN_OUIS: &[([u8; 3], &str)] = &[
    ([0x00, 0x00, 0x0c], "Cisco"),
    ([0x00, 0x1b, 0x54], "Cisco"),
    ([0x00, 0x50, 0x56], "VMware"),
    ([0x00, 0x0c, 0x29], "VMware"),
    ([0x00, 0x1c, 0x73], "Arista"),
    ([0x28, 0x99, 0x3a], "Arista"),
    ([0x00, 0x05, 0x85], "Juniper"),
    ([0x3c, 0x8a, 0xb0], "Juniper"),
    ([0x00, 0x1f, 0xfe], "HP"),
    ([0x94, 0x57, 0xa5], "HP"),
    ([0x00, 0x0f, 0xe2], "H3C"),
    ([0x00, 0x14, 0x22], "Dell"),
    ([0x00, 0x09, 0x5b], "Netgear"),
    ([0xb8, 0x27, 0xeb], "Raspberry Pi"),
    ([0x00, 0x04, 0xf2], "Polycom"),
    ([0x00, 0x0b, 0x82], "Grandstream"),
];

/// A MAC learned on an interface, optionally enriched with ARP data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetAddress {
    pub address: MacAddress,
    /// VLAN the address was learned on; 0 when unknown.
    pub vlan_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip4: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip6: Option<IpAddr>,
}

impl EthernetAddress {
    pub fn new(address: MacAddress, vlan_id: u16) -> Self {
        Self {
            address,
            vlan_id,
            ip4: None,
            ip6: None,
        }
    }

    pub fn set_ip(&mut self, ip: IpAddr) {
        match ip {
            IpAddr::V4(_) => self.ip4 = Some(ip),
            IpAddr::V6(_) => self.ip6 = Some(ip),
        }
    }

    pub fn vendor(&self) -> Option<&'static str> {
        self.address.vendor()
    }

    pub fn display(&self, format: MacFormat) -> String {
        self.address.format(format)
    }
}
