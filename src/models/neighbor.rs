use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::MacAddress;

bitflags! {
    /// LldpSystemCapabilitiesMap, first octet of the BITS value.
    /// Bit 0 (other) is the most significant bit on the wire.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LldpCapabilities: u8 {
        const OTHER = 0x80;
        const REPEATER = 0x40;
        const BRIDGE = 0x20;
        const WLAN_AP = 0x10;
        const ROUTER = 0x08;
        const PHONE = 0x04;
        const DOCSIS = 0x02;
        const STATION = 0x01;
    }
}

impl LldpCapabilities {
    pub fn from_octets(octets: &[u8]) -> Self {
        octets
            .first()
            .map(|b| Self::from_bits_truncate(*b))
            .unwrap_or_default()
    }

    /// Short names of the set capabilities, in MIB bit order.
    pub fn names(&self) -> Vec<&'static str> {
        const NAMES: [(LldpCapabilities, &str); 8] = [
            (LldpCapabilities::OTHER, "other"),
            (LldpCapabilities::REPEATER, "repeater"),
            (LldpCapabilities::BRIDGE, "bridge"),
            (LldpCapabilities::WLAN_AP, "wlan"),
            (LldpCapabilities::ROUTER, "router"),
            (LldpCapabilities::PHONE, "phone"),
            (LldpCapabilities::DOCSIS, "docsis"),
            (LldpCapabilities::STATION, "station"),
        ];
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// lldpRemChassisIdSubtype values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChassisIdType {
    #[default]
    Unknown,
    ChassisComponent,
    InterfaceAlias,
    PortComponent,
    MacAddress,
    NetworkAddress,
    InterfaceName,
    Local,
}

impl ChassisIdType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::ChassisComponent,
            2 => Self::InterfaceAlias,
            3 => Self::PortComponent,
            4 => Self::MacAddress,
            5 => Self::NetworkAddress,
            6 => Self::InterfaceName,
            7 => Self::Local,
            _ => Self::Unknown,
        }
    }
}

/// lldpRemPortIdSubtype values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortIdType {
    #[default]
    Unknown,
    InterfaceAlias,
    PortComponent,
    MacAddress,
    NetworkAddress,
    InterfaceName,
    AgentCircuitId,
    Local,
}

impl PortIdType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::InterfaceAlias,
            2 => Self::PortComponent,
            3 => Self::MacAddress,
            4 => Self::NetworkAddress,
            5 => Self::InterfaceName,
            6 => Self::AgentCircuitId,
            7 => Self::Local,
            _ => Self::Unknown,
        }
    }
}

/// A device seen via LLDP on one local interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborDevice {
    /// "<localPortNum>.<remIndex>" from the LLDP remote table index.
    pub key: String,
    pub chassis_id: String,
    pub chassis_type: ChassisIdType,
    pub port_id: String,
    pub port_type: PortIdType,
    pub port_description: String,
    pub sys_name: String,
    pub sys_description: String,
    pub capabilities_supported: LldpCapabilities,
    pub capabilities_enabled: LldpCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_address: Option<IpAddr>,
}

impl NeighborDevice {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Render a raw chassis id according to its subtype.
    pub fn set_chassis_id(&mut self, raw: &[u8]) {
        self.chassis_id = render_lldp_id(
            raw,
            self.chassis_type == ChassisIdType::MacAddress,
            self.chassis_type == ChassisIdType::NetworkAddress,
        );
    }

    pub fn set_port_id(&mut self, raw: &[u8]) {
        self.port_id = render_lldp_id(
            raw,
            self.port_type == PortIdType::MacAddress,
            self.port_type == PortIdType::NetworkAddress,
        );
    }

    /// Best display name: system name, else chassis id.
    pub fn display_name(&self) -> &str {
        if self.sys_name.is_empty() {
            &self.chassis_id
        } else {
            &self.sys_name
        }
    }
}

fn render_lldp_id(raw: &[u8], is_mac: bool, is_network: bool) -> String {
    if is_mac {
        if let Some(mac) = MacAddress::from_slice(raw) {
            return mac.to_string();
        }
    }
    if is_network {
        if let Some(ip) = decode_inet_address(raw) {
            return ip.to_string();
        }
    }
    if raw.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(raw).trim().to_string()
    } else {
        raw.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(":")
    }
}

/// Decode an IANA address-family-prefixed address (1 = IPv4, 2 = IPv6).
pub fn decode_inet_address(raw: &[u8]) -> Option<IpAddr> {
    match raw.split_first()? {
        (1, rest) if rest.len() == 4 => {
            Some(IpAddr::V4(Ipv4Addr::new(rest[0], rest[1], rest[2], rest[3])))
        }
        (2, rest) if rest.len() == 16 => {
            let octets: [u8; 16] = rest.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}
