use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Interface, PoePse, Vlan};

/// System group facts collected by the identity probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub name: String,
    pub description: String,
    pub object_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_id: Option<u32>,
    /// sysUpTime in hundredths of a second.
    pub uptime_ticks: u32,
    pub contact: String,
    pub location: String,
    pub vendor: String,
}

/// ENTITY-MIB physical entity (chassis, stack member, module).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackMember {
    pub index: u32,
    /// entPhysicalClass (3 = chassis, 9 = module, ...).
    pub class: i64,
    pub serial: String,
    pub model: String,
    pub version: String,
    pub description: String,
}

pub mod entity_class {
    pub const CHASSIS: i64 = 3;
    pub const STACK: i64 = 11;
}

/// Everything one polling session learned about a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub system: SystemInfo,
    interfaces: BTreeMap<String, Interface>,
    /// ifIndex -> interface key.
    index_to_key: BTreeMap<u32, String>,
    pub vlans: BTreeMap<u16, Vlan>,
    /// Bridge port number -> ifIndex (dot1dBasePortIfIndex).
    pub bridge_ports: BTreeMap<u32, u32>,
    pub pses: BTreeMap<u32, PoePse>,
    pub stack_members: BTreeMap<u32, StackMember>,
    /// Vendor specific key/value facts shown as "more info".
    pub more_info: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polled_at: Option<DateTime<Utc>>,
}

impl DeviceSnapshot {
    pub fn new(system: SystemInfo) -> Self {
        Self {
            system,
            ..Default::default()
        }
    }

    pub fn insert_interface(&mut self, iface: Interface) {
        self.index_to_key.insert(iface.index, iface.key.clone());
        self.interfaces.insert(iface.key.clone(), iface);
    }

    pub fn interface(&self, key: &str) -> Option<&Interface> {
        self.interfaces.get(key)
    }

    pub fn interface_mut(&mut self, key: &str) -> Option<&mut Interface> {
        self.interfaces.get_mut(key)
    }

    pub fn key_for_index(&self, index: u32) -> Option<&str> {
        self.index_to_key.get(&index).map(|k| k.as_str())
    }

    pub fn interface_by_index(&self, index: u32) -> Option<&Interface> {
        self.index_to_key
            .get(&index)
            .and_then(|key| self.interfaces.get(key))
    }

    pub fn interface_by_index_mut(&mut self, index: u32) -> Option<&mut Interface> {
        match self.index_to_key.get(&index) {
            Some(key) => self.interfaces.get_mut(key),
            None => None,
        }
    }

    /// Interface for `index`, created (keyed by ifIndex) when missing.
    pub fn ensure_interface(&mut self, index: u32) -> &mut Interface {
        let key = match self.index_to_key.get(&index) {
            Some(key) => key.clone(),
            None => {
                let iface = Interface::with_index(index);
                let key = iface.key.clone();
                self.insert_interface(iface);
                key
            }
        };
        self.interfaces
            .entry(key)
            .or_insert_with(|| Interface::with_index(index))
    }

    /// Interface for a bridge port, via the bridge port map.
    pub fn interface_by_port_mut(&mut self, port: u32) -> Option<&mut Interface> {
        let index = *self.bridge_ports.get(&port)?;
        self.interface_by_index_mut(index)
    }

    pub fn interface_by_name(&self, name: &str) -> Option<&Interface> {
        self.interfaces.values().find(|i| i.name == name)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.values()
    }

    pub fn interfaces_mut(&mut self) -> impl Iterator<Item = &mut Interface> {
        self.interfaces.values_mut()
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn vlan_or_insert(&mut self, id: u16) -> &mut Vlan {
        self.vlans.entry(id).or_insert_with(|| Vlan::new(id))
    }

    /// Number of learned ethernet addresses across all interfaces.
    pub fn ethernet_count(&self) -> usize {
        self.interfaces.values().map(|i| i.eth.len()).sum()
    }

    pub fn neighbor_count(&self) -> usize {
        self.interfaces.values().map(|i| i.lldp.len()).sum()
    }

    /// Record a successful untagged VLAN change: moves the interface's bridge
    /// port from the old VLAN's port lists into the new VLAN's lists. A VLAN
    /// is never both untagged and tagged on one port.
    pub fn apply_untagged_vlan(&mut self, key: &str, vlan_id: u16) -> bool {
        let Some(iface) = self.interfaces.get_mut(key) else {
            return false;
        };
        let old = iface.untagged_vlan;
        let was_trunk = iface.is_tagged;
        let mut old_stays_tagged = false;
        if let Some(port) = iface.port_id {
            let port = port as usize;
            if old > 0 && old != vlan_id as i32 {
                if let Some(vlan) = self.vlans.get_mut(&(old as u16)) {
                    vlan.untagged_ports.set(port, false);
                    if was_trunk {
                        old_stays_tagged = vlan.egress_ports.get(port);
                    } else {
                        vlan.egress_ports.set(port, false);
                    }
                }
            }
            if let Some(vlan) = self.vlans.get_mut(&vlan_id) {
                vlan.untagged_ports.set(port, true);
                vlan.egress_ports.set(port, true);
            }
        }
        iface.untagged_vlan = vlan_id as i32;
        iface.tagged_vlans.retain(|v| *v != vlan_id);
        if old_stays_tagged {
            iface.tagged_vlans.push(old as u16);
            iface.tagged_vlans.sort_unstable();
        }
        iface.is_tagged = !iface.tagged_vlans.is_empty();
        true
    }

    /// Drop learned addresses, ARP and LLDP data on every interface.
    pub fn clear_client_data(&mut self) {
        for iface in self.interfaces.values_mut() {
            iface.clear_client_data();
        }
    }
}
