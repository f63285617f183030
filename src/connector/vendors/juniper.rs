use async_trait::async_trait;

use super::{read_only, VendorDialect};
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::Result;
use crate::models::{is_valid_vlan_id, DeviceSnapshot, Interface, LogAction, LogCategory, VlanStatus};
use crate::snmp::mibs::vendors::juniper as mib;
use crate::snmp::{oid_index, single_index, SnmpValue};
use crate::transport::SnmpTransport;

const READ_ONLY: &str = "Juniper SNMP access is Read-Only";

/// Junos ELS. VLAN rows are keyed by an internal index that only the tag
/// column resolves, so the tag column is walked first.
pub struct Juniper;

impl Juniper {
    fn resolve(ctx: &mut WalkContext, oid: &str, index: u32) -> Option<u16> {
        let vid = ctx.vlan_index.get(&index).copied();
        if vid.is_none() {
            ctx.warn(
                LogCategory::Vlan,
                LogAction::VlanIndexUnresolved,
                format!("VLAN index {} of {} has no tag, skipped", index, oid),
            );
        }
        vid
    }
}

#[async_trait]
impl VendorDialect for Juniper {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Juniper
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::read_only(READ_ONLY)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        let Some(rest) = oid_index(oid, mib::L2ALD_VLAN_TABLE) else {
            return ParseOutcome::NotRecognized;
        };
        let Some((column, idx)) = rest.split_once('.') else {
            return ParseOutcome::NotRecognized;
        };
        if !matches!(column, "2" | "3" | "4" | "5") {
            return ParseOutcome::NotRecognized;
        }
        let Some(index) = single_index(idx) else {
            return ctx.malformed(oid, value);
        };
        if column == "3" {
            let Some(tag) = value.as_i64().filter(|t| is_valid_vlan_id(*t)) else {
                return ctx.malformed(oid, value);
            };
            ctx.vlan_index.insert(index, tag as u16);
            ctx.device.vlan_or_insert(tag as u16).index = index;
            return ParseOutcome::Consumed;
        }
        let Some(vid) = Self::resolve(ctx, oid, index) else {
            return ParseOutcome::Consumed;
        };
        match column {
            "2" => match value.as_text() {
                Some(name) => ctx.device.vlan_or_insert(vid).name = name,
                None => return ctx.malformed(oid, value),
            },
            "4" => match value.as_i64() {
                // static(1), dynamic(2)
                Some(2) => ctx.device.vlan_or_insert(vid).status = VlanStatus::Dynamic,
                Some(_) => ctx.device.vlan_or_insert(vid).status = VlanStatus::Permanent,
                None => return ctx.malformed(oid, value),
            },
            _ => match value.as_u32() {
                Some(fdb_id) => {
                    ctx.device.vlan_or_insert(vid).fdb_index = fdb_id;
                    ctx.fdb_to_vlan.insert(fdb_id, vid);
                }
                None => return ctx.malformed(oid, value),
            },
        }
        ParseOutcome::Consumed
    }

    async fn get_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        for branch in [mib::L2ALD_VLAN_TAG, mib::L2ALD_VLAN_NAME, mib::L2ALD_VLAN_TYPE, mib::L2ALD_VLAN_FDB_ID] {
            s.walk_branch(branch).await?;
        }
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

    async fn set_interface_untagged_vlan(
        &self,
        _t: &mut dyn SnmpTransport,
        _device: &DeviceSnapshot,
        _iface: &Interface,
        _vlan_id: u16,
    ) -> Result<()> {
        Err(read_only(READ_ONLY))
    }

    async fn save_running_config(&self, _t: &mut dyn SnmpTransport) -> Result<()> {
        Err(read_only(READ_ONLY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::GenericParser;
    use crate::error::ErrorKind;
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_tag_walk_resolves_later_columns() {
        let mut agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.4.1.2636.3.48.1.3.1.1.2.7", SnmpValue::string("office"))
            .insert("1.3.6.1.4.1.2636.3.48.1.3.1.1.3.7", SnmpValue::Integer(100))
            .insert("1.3.6.1.4.1.2636.3.48.1.3.1.1.4.7", SnmpValue::Integer(1))
            .insert("1.3.6.1.4.1.2636.3.48.1.3.1.1.5.7", SnmpValue::Integer(3))
            .insert("1.3.6.1.4.1.2636.3.48.1.3.1.1.2.8", SnmpValue::string("orphan"));
        let mut ctx = WalkContext::new("juniper", DeviceSnapshot::default());
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Juniper,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Juniper.get_vlan_data(&mut s).await);

        let vlan = &ctx.device.vlans[&100];
        assert_eq!(vlan.index, 7);
        assert_eq!(vlan.name, "office");
        assert_eq!(vlan.fdb_index, 3);
        assert_eq!(ctx.fdb_to_vlan[&3], 100);
        assert_eq!(ctx.device.vlans.len(), 1);
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].action, LogAction::VlanIndexUnresolved);
        assert_eq!(generic.consumed(), 0);
    }

    #[tokio::test]
    async fn test_every_write_is_read_only() {
        let mut agent = MemoryAgent::new();
        let iface = Interface::with_index(1);
        let results = [
            Juniper.set_interface_description(&mut agent, &iface, "x").await,
            Juniper.set_interface_admin_status(&mut agent, &iface, false).await,
            Juniper.set_interface_poe_status(&mut agent, &iface, false).await,
            Juniper
                .set_interface_untagged_vlan(&mut agent, &DeviceSnapshot::default(), &iface, 5)
                .await,
            Juniper.save_running_config(&mut agent).await,
        ];
        for result in results {
            let err = result.unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
            assert!(err.description.contains("Read-Only"));
        }
        assert_eq!(agent.call_count(), 0);
    }
}
