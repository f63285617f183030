//! Vendor dialects for the SNMP connector.
//!
//! A dialect overrides only the hooks where its MIBs differ from the
//! standard ones; every default delegates to [`generic`].

mod arista;
mod aruba_cx;
mod cisco;
mod comware;
mod dell;
pub mod generic;
mod juniper;
mod netgear;
mod procurve;

pub use arista::Arista;
pub use aruba_cx::ArubaCx;
pub use cisco::Cisco;
pub use comware::Comware;
pub use dell::Dell;
pub use generic::Generic;
pub use juniper::Juniper;
pub use netgear::Netgear;
pub use procurve::Procurve;

use async_trait::async_trait;

use super::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, Interface};
use crate::snmp::SnmpValue;
use crate::transport::SnmpTransport;

#[async_trait]
pub trait VendorDialect: Send + Sync {
    fn kind(&self) -> ConnectorKind;

    /// Vendor defaults before descriptor overrides are applied.
    fn capabilities(&self) -> Capabilities;

    /// First link of the parse chain.
    fn parse_oid(&self, _ctx: &mut WalkContext, _oid: &str, _value: &SnmpValue) -> ParseOutcome {
        ParseOutcome::NotRecognized
    }

    async fn get_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_vlan_data(s).await
    }

    /// Untagged and tagged VLANs per interface. Runs after `get_vlan_data`.
    async fn get_port_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_port_vlan_data(s).await
    }

    async fn get_poe_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_poe_data(s).await
    }

    /// Attach staged PoE port entries to interfaces.
    fn map_poe_port_entries_to_interface(&self, ctx: &mut WalkContext) {
        generic::map_poe_ports(ctx, |ctx, _pse, port| Some(ctx.if_index_for_port(port)));
    }

    async fn get_known_ethernet_addresses(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_known_ethernet_addresses(s).await
    }

    async fn get_hardware_details(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_hardware_details(s).await
    }

    async fn set_interface_description(
        &self,
        t: &mut dyn SnmpTransport,
        iface: &Interface,
        description: &str,
    ) -> Result<()> {
        generic::set_interface_description(t, iface, description).await
    }

    async fn set_interface_admin_status(&self, t: &mut dyn SnmpTransport, iface: &Interface, up: bool) -> Result<()> {
        generic::set_interface_admin_status(t, iface, up).await
    }

    async fn set_interface_poe_status(&self, t: &mut dyn SnmpTransport, iface: &Interface, enabled: bool) -> Result<()> {
        generic::set_interface_poe_status(t, iface, enabled).await
    }

    async fn set_interface_untagged_vlan(
        &self,
        t: &mut dyn SnmpTransport,
        device: &DeviceSnapshot,
        iface: &Interface,
        vlan_id: u16,
    ) -> Result<()> {
        generic::set_interface_untagged_vlan(t, device, iface, vlan_id).await
    }

    async fn save_running_config(&self, _t: &mut dyn SnmpTransport) -> Result<()> {
        Err(Error::unsupported("Saving the running config is not supported by this device"))
    }
}

/// Dialect for a connector kind. Non-SNMP kinds get the generic dialect.
pub fn dialect_for(kind: ConnectorKind) -> Box<dyn VendorDialect> {
    match kind {
        ConnectorKind::Cisco => Box::new(Cisco),
        ConnectorKind::Procurve => Box::new(Procurve),
        ConnectorKind::Comware => Box::new(Comware),
        ConnectorKind::Juniper => Box::new(Juniper),
        ConnectorKind::Arista => Box::new(Arista),
        ConnectorKind::Dell => Box::new(Dell),
        ConnectorKind::Netgear => Box::new(Netgear),
        ConnectorKind::ArubaCx => Box::new(ArubaCx),
        ConnectorKind::Generic | ConnectorKind::Cli | ConnectorKind::Dummy => Box::new(Generic),
    }
}

/// Shared by the read-only dialects.
fn read_only(reason: &str) -> Error {
    Error::unsupported("Device is Read-Only").with_details(reason)
}
