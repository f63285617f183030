use serde::{Deserialize, Serialize};

use super::PortList;

pub const VLAN_ID_MIN: u16 = 1;
pub const VLAN_ID_MAX: u16 = 4094;

pub fn is_valid_vlan_id(id: i64) -> bool {
    (VLAN_ID_MIN as i64..=VLAN_ID_MAX as i64).contains(&id)
}

/// Normal vs. vendor-reserved VLAN (e.g. Cisco 1002-1005 FDDI/token ring).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlanType {
    #[default]
    Normal,
    Reserved,
}

/// dot1qVlanStatus and vendor equivalents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlanStatus {
    Other,
    #[default]
    Permanent,
    Dynamic,
}

impl VlanStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => Self::Permanent,
            3 => Self::Dynamic,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    /// Vendor internal index; equals `id` unless the vendor says otherwise.
    pub index: u32,
    pub name: String,
    pub vlan_type: VlanType,
    pub status: VlanStatus,
    pub fdb_index: u32,
    /// Static egress ports (tagged and untagged), by bridge port.
    pub egress_ports: PortList,
    pub untagged_ports: PortList,
}

impl Vlan {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            index: id as u32,
            name: format!("VLAN{:04}", id),
            fdb_index: id as u32,
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}", self.id)
        } else {
            format!("{} - {}", self.id, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_bounds() {
        assert!(!is_valid_vlan_id(0));
        assert!(is_valid_vlan_id(1));
        assert!(is_valid_vlan_id(4094));
        assert!(!is_valid_vlan_id(4095));
    }

    #[test]
    fn test_new_defaults() {
        let v = Vlan::new(15);
        assert_eq!(v.index, 15);
        assert_eq!(v.name, "VLAN0015");
        assert_eq!(v.display_name(), "15 - VLAN0015");
        assert_eq!(VlanStatus::from_code(3), VlanStatus::Dynamic);
    }
}
