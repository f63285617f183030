use async_trait::async_trait;

use super::generic;
use super::{read_only, VendorDialect};
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::Result;
use crate::models::{is_valid_vlan_id, DeviceSnapshot, Interface, PortList};
use crate::snmp::mibs::vendors::ieee8021 as mib;
use crate::snmp::{oid_index, SnmpValue};
use crate::transport::SnmpTransport;

const READ_ONLY: &str = "AOS-CX SNMP access is Read-Only";

/// Aruba AOS-CX. SNMP is read-only on this platform; VLANs come from the
/// IEEE 802.1Q bridge MIB, indexed componentId.vlanId.
pub struct ArubaCx;

/// "componentId.x" -> x
fn component_index(index: &str) -> Option<u32> {
    index.split_once('.')?.1.parse().ok()
}

#[async_trait]
impl VendorDialect for ArubaCx {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::ArubaCx
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::read_only(READ_ONLY)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        if let Some(idx) = oid_index(oid, mib::PVID) {
            let (Some(port), Some(vid)) = (component_index(idx), value.as_i64()) else {
                return ctx.malformed(oid, value);
            };
            if is_valid_vlan_id(vid) {
                let if_index = ctx.if_index_for_port(port);
                ctx.set_vendor_untagged(if_index, vid as u16);
            }
            return ParseOutcome::Consumed;
        }
        let columns = [mib::VLAN_STATIC_NAME, mib::VLAN_STATIC_EGRESS_PORTS, mib::VLAN_STATIC_UNTAGGED_PORTS];
        let Some((idx, column)) = columns
            .iter()
            .find_map(|branch| oid_index(oid, branch).map(|idx| (idx, *branch)))
        else {
            return ParseOutcome::NotRecognized;
        };
        let vid = component_index(idx).filter(|v| is_valid_vlan_id(*v as i64));
        let (Some(vid), Some(bytes)) = (vid, value.as_bytes()) else {
            return ctx.malformed(oid, value);
        };
        let vlan = ctx.device.vlan_or_insert(vid as u16);
        match column {
            mib::VLAN_STATIC_NAME => {
                vlan.name = String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string()
            }
            mib::VLAN_STATIC_EGRESS_PORTS => vlan.egress_ports = PortList::from_bytes(bytes),
            _ => vlan.untagged_ports = PortList::from_bytes(bytes),
        }
        ParseOutcome::Consumed
    }

    async fn get_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        for branch in [mib::VLAN_STATIC_NAME, mib::VLAN_STATIC_EGRESS_PORTS, mib::VLAN_STATIC_UNTAGGED_PORTS] {
            s.walk_branch(branch).await?;
        }
        Ok(())
    }

    async fn get_port_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        s.walk_branch(mib::PVID).await?;
        generic::derive_vlan_membership(s.ctx);
        Ok(())
    }

    async fn set_interface_description(&self, _t: &mut dyn SnmpTransport, _iface: &Interface, _d: &str) -> Result<()> {
        Err(read_only(READ_ONLY))
    }

    async fn set_interface_admin_status(&self, _t: &mut dyn SnmpTransport, _iface: &Interface, _up: bool) -> Result<()> {
        Err(read_only(READ_ONLY))
    }

    async fn set_interface_poe_status(&self, _t: &mut dyn SnmpTransport, _iface: &Interface, _on: bool) -> Result<()> {
        Err(read_only(READ_ONLY))
    }

    // the REST write path of this platform is not implemented
    async fn set_interface_untagged_vlan(
        &self,
        _t: &mut dyn SnmpTransport,
        _device: &DeviceSnapshot,
        _iface: &Interface,
        _vlan_id: u16,
    ) -> Result<()> {
        Err(read_only(READ_ONLY))
    }
}
