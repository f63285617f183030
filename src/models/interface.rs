use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{EthernetAddress, MacAddress, NeighborDevice, PoePort};

/// Untagged VLAN value meaning "unset / trunk only".
pub const VLAN_UNSET: i32 = -1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceType {
    #[default]
    None,
    Ethernet,
    Loopback,
    Virtual,
    Lagg,
    Tunnel,
    Mcast,
}

impl InterfaceType {
    /// Map an IANAifType value.
    pub fn from_iftype(code: i64) -> Self {
        match code {
            6 | 62 | 69 | 117 => Self::Ethernet,
            24 => Self::Loopback,
            53 | 135 | 136 => Self::Virtual,
            54 | 161 => Self::Lagg,
            131 => Self::Tunnel,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LacpRole {
    #[default]
    None,
    Member,
    Aggregator,
}

/// One switch interface as seen in a single polling session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Stable identifier for callers (ifIndex as text for SNMP connectors).
    pub key: String,
    /// SNMP ifIndex.
    pub index: u32,
    pub name: String,
    pub if_type: InterfaceType,
    pub admin_status: bool,
    pub oper_status: bool,
    /// Mbps.
    pub speed: u32,
    pub mtu: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_addr: Option<MacAddress>,
    pub description: String,
    /// Bridge port number (dot1dBasePort), if the interface is a bridge port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<u32>,
    pub untagged_vlan: i32,
    pub tagged_vlans: Vec<u16>,
    pub is_tagged: bool,
    pub lacp_role: LacpRole,
    /// ifIndex of the aggregator this member belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lacp_aggregator: Option<u32>,
    /// ifIndexes of members, on an aggregator.
    pub lacp_members: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poe_entry: Option<PoePort>,
    /// Learned addresses keyed by canonical MAC.
    pub eth: BTreeMap<String, EthernetAddress>,
    pub lldp: BTreeMap<String, NeighborDevice>,
    /// ARP entries keyed by IP address.
    pub arp: BTreeMap<String, EthernetAddress>,
}

impl Interface {
    pub fn new(key: impl Into<String>, index: u32) -> Self {
        Self {
            key: key.into(),
            index,
            untagged_vlan: VLAN_UNSET,
            ..Default::default()
        }
    }

    /// SNMP-keyed interface: key is the ifIndex.
    pub fn with_index(index: u32) -> Self {
        Self::new(index.to_string(), index)
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("ifIndex {}", self.index)
        } else {
            self.name.clone()
        }
    }

    pub fn has_untagged_vlan(&self) -> bool {
        self.untagged_vlan != VLAN_UNSET
    }

    /// True when the VLAN is the untagged VLAN or one of the tagged VLANs.
    pub fn is_member_of(&self, vlan_id: u16) -> bool {
        self.untagged_vlan == vlan_id as i32 || self.tagged_vlans.contains(&vlan_id)
    }

    pub fn add_tagged_vlan(&mut self, vlan_id: u16) {
        if !self.tagged_vlans.contains(&vlan_id) {
            self.tagged_vlans.push(vlan_id);
            self.tagged_vlans.sort_unstable();
        }
        self.is_tagged = true;
    }

    /// Mark as LACP member. Refused when this interface is an aggregator.
    pub fn set_lacp_member(&mut self, aggregator: u32) -> bool {
        if self.lacp_role == LacpRole::Aggregator {
            return false;
        }
        self.lacp_role = LacpRole::Member;
        self.lacp_aggregator = Some(aggregator);
        true
    }

    /// Mark as LACP aggregator. Refused when this interface is a member.
    pub fn add_lacp_member(&mut self, member: u32) -> bool {
        if self.lacp_role == LacpRole::Member {
            return false;
        }
        self.lacp_role = LacpRole::Aggregator;
        if !self.lacp_members.contains(&member) {
            self.lacp_members.push(member);
        }
        true
    }

    pub fn add_learned_ethernet(&mut self, address: EthernetAddress) {
        self.eth.insert(address.address.to_string(), address);
    }

    pub fn add_neighbor(&mut self, neighbor: NeighborDevice) {
        self.lldp.insert(neighbor.key.clone(), neighbor);
    }

    /// Drop everything `get_client_data()` fills in.
    pub fn clear_client_data(&mut self) {
        self.eth.clear();
        self.lldp.clear();
        self.arp.clear();
    }
}
