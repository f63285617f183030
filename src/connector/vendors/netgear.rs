use async_trait::async_trait;

use super::generic;
use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::{Error, Result};
use crate::snmp::mibs::{standard, vendors::fastpath};
use crate::snmp::{oid_index, single_index, SnmpValue};
use crate::transport::SnmpTransport;

/// Netgear managed switches (FASTPATH based).
pub struct Netgear;

impl Netgear {
    /// pethMainPsePower and pethMainPseConsumptionPower are reported in
    /// milliwatts instead of watts.
    fn parse_pse_power(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> Option<ParseOutcome> {
        let (idx, max) = match oid_index(oid, standard::PETH_MAIN_PSE_POWER) {
            Some(idx) => (idx, true),
            None => (oid_index(oid, standard::PETH_MAIN_PSE_CONSUMPTION_POWER)?, false),
        };
        let (Some(id), Some(mw)) = (single_index(idx), value.as_u32()) else {
            return Some(ctx.malformed(oid, value));
        };
        let pse = ctx.pse(id);
        if max {
            pse.max_power = mw / 1000;
        } else {
            pse.power_consumed = mw / 1000;
        }
        Some(ParseOutcome::Consumed)
    }

    fn parse_switchport_mode(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> Option<ParseOutcome> {
        let idx = oid_index(oid, fastpath::NETGEAR_SWITCHPORT_MODE)
            .or_else(|| oid_index(oid, fastpath::NETGEAR_SWITCHPORT_MODE_LEGACY))?;
        let (Some(if_index), Some(mode)) = (single_index(idx), value.as_i64()) else {
            return Some(ctx.malformed(oid, value));
        };
        if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
            iface.is_tagged = matches!(mode, fastpath::MODE_TRUNK | fastpath::MODE_GENERAL);
        }
        Some(ParseOutcome::Consumed)
    }
}

#[async_trait]
impl VendorDialect for Netgear {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Netgear
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(true)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        Self::parse_pse_power(ctx, oid, value)
            .or_else(|| Self::parse_switchport_mode(ctx, oid, value))
            .unwrap_or(ParseOutcome::NotRecognized)
    }

    /// Switchport mode from the current OID, or from the older FastPath
    /// one when the current one is empty.
    async fn get_port_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        if s.walk_branch(fastpath::NETGEAR_SWITCHPORT_MODE).await? == 0 {
            s.walk_branch(fastpath::NETGEAR_SWITCHPORT_MODE_LEGACY).await?;
        }
        generic::get_port_vlan_data(s).await
    }

    async fn save_running_config(&self, t: &mut dyn SnmpTransport) -> Result<()> {
        t.set(&[(fastpath::NETGEAR_SAVE_CONFIG.to_string(), SnmpValue::Integer(1))])
            .await
            .map_err(|err| Error::save("Saving the running config failed").with_details(err.to_string()))
    }
}
