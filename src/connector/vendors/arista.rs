use async_trait::async_trait;

use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind};
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, Interface};
use crate::transport::SnmpTransport;

/// Arista EOS. Reads are standard; over SNMP only ifAlias and
/// ifAdminStatus are writable.
pub struct Arista;

#[async_trait]
impl VendorDialect for Arista {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Arista
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_change_description: true,
            can_change_admin_status: true,
            ..Default::default()
        }
    }

    async fn set_interface_untagged_vlan(
        &self,
        _t: &mut dyn SnmpTransport,
        _device: &DeviceSnapshot,
        _iface: &Interface,
        _vlan_id: u16,
    ) -> Result<()> {
        Err(Error::unsupported("Changing interface VLAN is not supported over SNMP on EOS"))
    }
}
