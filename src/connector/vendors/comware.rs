use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use super::generic::{self, column};
use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::{Error, ErrorKind, Result};
use crate::snmp::mibs::vendors::h3c;
use crate::snmp::{oid_index, single_index, SnmpValue};
use crate::transport::SnmpTransport;

const RESULT_POLLS: u32 = 10;
const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// HPE Comware / H3C / 3Com.
pub struct Comware;

impl Comware {
    /// hh3cCfgOpState of the result row pointing at operation `row`.
    async fn operate_state(t: &mut dyn SnmpTransport, row: u32) -> Result<Option<i64>> {
        let results = t.walk(h3c::CFG_RESULT_OPT_INDEX).await?;
        let Some(result_index) = results
            .iter()
            .rev()
            .find(|(_, v)| v.as_u32() == Some(row))
            .and_then(|(oid, _)| oid_index(oid, h3c::CFG_RESULT_OPT_INDEX))
        else {
            return Ok(None);
        };
        Ok(t.get(&column(h3c::CFG_RESULT_STATE, result_index))
            .await?
            .and_then(|v| v.as_i64()))
    }

    async fn wait_for_result(t: &mut dyn SnmpTransport, row: u32) -> Result<()> {
        let mut last_state = None;
        for _ in 0..RESULT_POLLS {
            last_state = Self::operate_state(t, row).await?;
            match last_state {
                None | Some(h3c::OP_IN_PROGRESS) => tokio::time::sleep(RESULT_POLL_INTERVAL).await,
                _ => break,
            }
        }
        match last_state {
            Some(h3c::OP_SUCCESS) => Ok(()),
            Some(state) => Err(Error::save("Config save failed on the device")
                .with_details(format!("hh3cCfgOpState {}", state))),
            None => Err(Error::save("Config save did not report a result")
                .with_details(format!("no hh3cCfgOperateResult row for operation {}", row))),
        }
    }
}

#[async_trait]
impl VendorDialect for Comware {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Comware
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(true)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        let Some(idx) = oid_index(oid, h3c::IF_VLAN_TYPE) else {
            return ParseOutcome::NotRecognized;
        };
        let (Some(if_index), Some(link_type)) = (single_index(idx), value.as_i64()) else {
            return ctx.malformed(oid, value);
        };
        if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
            iface.is_tagged = matches!(link_type, h3c::LINK_TRUNK | h3c::LINK_HYBRID);
        }
        ParseOutcome::Consumed
    }

    async fn get_port_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        s.walk_branch(h3c::IF_VLAN_TYPE).await?;
        generic::get_port_vlan_data(s).await
    }

    /// One hh3cCfgOperateTable row: running to startup, createAndGo. The
    /// outcome is read back from hh3cCfgOperateResultTable.
    async fn save_running_config(&self, t: &mut dyn SnmpTransport) -> Result<()> {
        let row: u32 = rand::thread_rng().gen_range(1..=100);
        t.set(&[
            (column(h3c::CFG_OPERATE_TYPE, row), SnmpValue::Integer(h3c::OPERATE_RUNNING_TO_STARTUP)),
            (column(h3c::CFG_OPERATE_ROW_STATUS, row), SnmpValue::Integer(4)),
        ])
        .await
        .map_err(|err| Error::save("Saving the running config failed").with_details(err.to_string()))?;
        match Self::wait_for_result(t, row).await {
            Err(err) if err.is(ErrorKind::Cancelled) || err.is(ErrorKind::ConfigSaveError) => Err(err),
            Err(err) => Err(Error::save("Config save result unreadable").with_details(err.to_string())),
            Ok(()) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::GenericParser;
    use crate::models::{DeviceSnapshot, Interface};
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    #[test]
    fn test_link_type_marks_trunks() {
        let mut device = DeviceSnapshot::default();
        for i in [1u32, 2, 3] {
            device.insert_interface(Interface::with_index(i));
        }
        let mut ctx = WalkContext::new("comware", device);
        for (i, link) in [(1, 1), (2, 2), (3, 3)] {
            let oid = column(h3c::IF_VLAN_TYPE, i);
            assert_eq!(
                Comware.parse_oid(&mut ctx, &oid, &SnmpValue::Integer(link)),
                ParseOutcome::Consumed
            );
        }
        assert!(!ctx.device.interface("1").unwrap().is_tagged);
        assert!(ctx.device.interface("2").unwrap().is_tagged);
        assert!(ctx.device.interface("3").unwrap().is_tagged);
    }

    #[tokio::test]
    async fn test_port_vlan_walk_order() {
        let mut agent = MemoryAgent::new();
        let mut ctx = WalkContext::new("comware", DeviceSnapshot::default());
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Comware,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Comware.get_port_vlan_data(&mut s).await);
        assert_eq!(agent.call_count(), 2);
    }

    #[tokio::test]
    async fn test_save_reads_operate_result() {
        let mut agent = MemoryAgent::new();
        agent
            .mirror_index(h3c::CFG_OPERATE_ROW_STATUS, h3c::CFG_RESULT_OPT_INDEX)
            .mirror_set(h3c::CFG_OPERATE_ROW_STATUS, h3c::CFG_RESULT_STATE, SnmpValue::Integer(h3c::OP_SUCCESS));
        assert_ok!(Comware.save_running_config(&mut agent).await);
        let sets = agent.sets();
        assert_eq!(sets.len(), 2);
        assert!(sets[0].0.starts_with(h3c::CFG_OPERATE_TYPE));
        assert_eq!(sets[1].1, SnmpValue::Integer(4));

        let mut broken = MemoryAgent::new();
        broken.fail_on(h3c::CFG_OPERATE_TYPE, Error::protocol("noAccess"));
        let err = Comware.save_running_config(&mut broken).await.unwrap_err();
        assert!(err.is(ErrorKind::ConfigSaveError));
    }

    #[tokio::test]
    async fn test_failed_operate_result_is_an_error() {
        let mut agent = MemoryAgent::new();
        // 11 = fileTransferError
        agent
            .mirror_index(h3c::CFG_OPERATE_ROW_STATUS, h3c::CFG_RESULT_OPT_INDEX)
            .mirror_set(h3c::CFG_OPERATE_ROW_STATUS, h3c::CFG_RESULT_STATE, SnmpValue::Integer(11));
        let err = Comware.save_running_config(&mut agent).await.unwrap_err();
        assert!(err.is(ErrorKind::ConfigSaveError));
        assert_eq!(err.details.as_deref(), Some("hh3cCfgOpState 11"));
    }

    #[tokio::test]
    async fn test_unreadable_result_is_a_save_error() {
        let mut agent = MemoryAgent::new();
        agent.fail_on(h3c::CFG_RESULT_OPT_INDEX, Error::timeout("no answer"));
        let err = Comware.save_running_config(&mut agent).await.unwrap_err();
        assert!(err.is(ErrorKind::ConfigSaveError));
        assert_eq!(agent.sets().len(), 2);
    }
}
