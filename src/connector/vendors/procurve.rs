use async_trait::async_trait;

use super::generic;
use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::Result;
use crate::models::PoePort;
use crate::snmp::mibs::vendors::hp;
use crate::snmp::{oid_index, SnmpValue};

/// HP / Aruba ProCurve (ArubaOS-Switch). Writes are standard Q-BRIDGE;
/// the switch saves its configuration on its own.
pub struct Procurve;

#[async_trait]
impl VendorDialect for Procurve {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Procurve
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(false)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        let Some(idx) = oid_index(oid, hp::POE_PORT_POWER).or_else(|| oid_index(oid, hp::POE_PORT_POWER_LEGACY))
        else {
            return ParseOutcome::NotRecognized;
        };
        let (Some((pse, port)), Some(mw)) = (PoePort::parse_index(idx), value.as_u32()) else {
            return ctx.malformed(oid, value);
        };
        ctx.poe_port(pse, port).power_consumed = mw;
        ParseOutcome::Consumed
    }

    /// Per-port power lives in one of two HP tables depending on firmware;
    /// the legacy one is only asked when the current one is empty.
    async fn get_poe_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_poe_data(s).await?;
        if s.walk_branch(hp::POE_PORT_POWER).await? == 0 {
            s.walk_branch(hp::POE_PORT_POWER_LEGACY).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::GenericParser;
    use crate::models::{DeviceSnapshot, Interface};
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    async fn poe_walk(agent: &mut MemoryAgent) -> WalkContext {
        let mut device = DeviceSnapshot::default();
        device.insert_interface(Interface::with_index(5));
        let mut ctx = WalkContext::new("procurve", device);
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: agent,
            dialect: &Procurve,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Procurve.get_poe_data(&mut s).await);
        Procurve.map_poe_port_entries_to_interface(&mut ctx);
        ctx
    }

    #[tokio::test]
    async fn test_legacy_table_only_when_current_is_empty() {
        let mut agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.4.1.11.2.14.11.1.9.1.1.1.3.1.5", SnmpValue::Integer(6100))
            .insert("1.3.6.1.4.1.11.2.14.11.1.9.2.1.1.3.1.5", SnmpValue::Integer(1));
        let ctx = poe_walk(&mut agent).await;
        let entry = ctx.device.interface("5").unwrap().poe_entry.clone().unwrap();
        assert_eq!(entry.power_consumed, 6100);
        // four standard walks plus the current HP table
        assert_eq!(agent.call_count(), 5);
    }

    #[tokio::test]
    async fn test_legacy_table_fallback() {
        let mut agent = MemoryAgent::new();
        agent.insert("1.3.6.1.4.1.11.2.14.11.1.9.2.1.1.3.1.5", SnmpValue::Integer(4200));
        let ctx = poe_walk(&mut agent).await;
        let entry = ctx.device.interface("5").unwrap().poe_entry.clone().unwrap();
        assert_eq!(entry.power_consumed, 4200);
        assert_eq!(agent.call_count(), 6);
    }

    #[test]
    fn test_no_save_capability() {
        assert!(!Procurve.capabilities().can_save_config);
        assert!(Procurve.capabilities().can_change_vlan);
    }
}
