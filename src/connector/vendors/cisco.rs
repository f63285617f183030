use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use super::generic::{self, column};
use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, ParseOutcome, SnmpSession, WalkContext};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{is_valid_vlan_id, DeviceSnapshot, Interface, LogAction, LogCategory, PoePort, PortList, VlanStatus, VlanType};
use crate::snmp::mibs::{cisco as mib, standard};
use crate::snmp::{oid_index, single_index, SnmpValue};
use crate::transport::SnmpTransport;

const COPY_POLLS: u32 = 20;
const COPY_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Trunk bitmap columns and the first VLAN id each one covers.
const TRUNK_BITMAPS: [(&str, u16); 4] = [
    (mib::VLAN_TRUNK_PORT_VLANS_ENABLED, 0),
    (mib::VLAN_TRUNK_PORT_VLANS_ENABLED_2K, 1024),
    (mib::VLAN_TRUNK_PORT_VLANS_ENABLED_3K, 2048),
    (mib::VLAN_TRUNK_PORT_VLANS_ENABLED_4K, 3072),
];

/// IOS / IOS-XE. VLANs come from the VTP MIB, port membership from
/// vlanTrunkPortTable and vmVlan, and the bridge tables are per VLAN.
pub struct Cisco;

fn vtp_vlan(index: &str) -> Option<u16> {
    let (_domain, vid) = index.split_once('.')?;
    let vid: i64 = vid.parse().ok()?;
    is_valid_vlan_id(vid).then_some(vid as u16)
}

impl Cisco {
    fn parse_vtp(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> Option<ParseOutcome> {
        let (idx, column) = [mib::VTP_VLAN_STATE, mib::VTP_VLAN_TYPE, mib::VTP_VLAN_NAME]
            .iter()
            .find_map(|branch| oid_index(oid, branch).map(|idx| (idx, *branch)))?;
        let Some(vid) = vtp_vlan(idx) else {
            return Some(ctx.malformed(oid, value));
        };
        match column {
            mib::VTP_VLAN_NAME => {
                let Some(name) = value.as_text() else {
                    return Some(ctx.malformed(oid, value));
                };
                ctx.device.vlan_or_insert(vid).name = name;
            }
            mib::VTP_VLAN_STATE => {
                let Some(state) = value.as_i64() else {
                    return Some(ctx.malformed(oid, value));
                };
                // 1 = operational
                ctx.device.vlan_or_insert(vid).status =
                    if state == 1 { VlanStatus::Permanent } else { VlanStatus::Other };
            }
            _ => {
                let Some(kind) = value.as_i64() else {
                    return Some(ctx.malformed(oid, value));
                };
                // 1 = ethernet; fddi and token ring VLANs are reserved
                ctx.device.vlan_or_insert(vid).vlan_type =
                    if kind == 1 && !(1002..=1005).contains(&vid) { VlanType::Normal } else { VlanType::Reserved };
            }
        }
        Some(ParseOutcome::Consumed)
    }

    fn parse_trunk(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> Option<ParseOutcome> {
        if let Some(idx) = oid_index(oid, mib::VLAN_TRUNK_PORT_DYNAMIC_STATUS) {
            return Some(Self::with_interface(ctx, oid, idx, value, |iface, v| {
                // 1 = trunking
                if v == 1 {
                    iface.is_tagged = true;
                }
            }));
        }
        if let Some(idx) = oid_index(oid, mib::VLAN_TRUNK_PORT_DYNAMIC_STATE) {
            return Some(Self::with_interface(ctx, oid, idx, value, |iface, v| {
                // on, onNoNegotiate
                if v == 1 || v == 5 {
                    iface.is_tagged = true;
                }
            }));
        }
        for (branch, trunk_only) in [(mib::VLAN_TRUNK_PORT_NATIVE_VLAN, true), (mib::VM_VLAN, false)] {
            if let Some(idx) = oid_index(oid, branch) {
                let (Some(if_index), Some(vid)) = (single_index(idx), value.as_i64()) else {
                    return Some(ctx.malformed(oid, value));
                };
                let is_trunk = ctx.device.interface_by_index(if_index).map(|i| i.is_tagged);
                if is_trunk == Some(trunk_only) && is_valid_vlan_id(vid) {
                    ctx.set_vendor_untagged(if_index, vid as u16);
                }
                return Some(ParseOutcome::Consumed);
            }
        }
        for (branch, offset) in TRUNK_BITMAPS {
            if let Some(idx) = oid_index(oid, branch) {
                let (Some(if_index), Some(bytes)) = (single_index(idx), value.as_bytes()) else {
                    return Some(ctx.malformed(oid, value));
                };
                let known: Vec<u16> = ctx.device.vlans.keys().copied().collect();
                if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
                    if iface.is_tagged {
                        for position in PortList::from_bytes(bytes).ports() {
                            let vid = offset + position as u16 - 1;
                            if known.contains(&vid) && iface.untagged_vlan != vid as i32 {
                                iface.add_tagged_vlan(vid);
                            }
                        }
                    }
                }
                return Some(ParseOutcome::Consumed);
            }
        }
        None
    }

    fn with_interface<F>(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue, apply: F) -> ParseOutcome
    where
        F: FnOnce(&mut Interface, i64),
    {
        let (Some(if_index), Some(v)) = (single_index(idx), value.as_i64()) else {
            return ctx.malformed(oid, value);
        };
        if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
            apply(iface, v);
        }
        ParseOutcome::Consumed
    }

    fn parse_poe(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> Option<ParseOutcome> {
        let columns = [
            mib::CPE_EXT_PSE_PORT_PWR_ALLOCATED,
            mib::CPE_EXT_PSE_PORT_PWR_AVAILABLE,
            mib::CPE_EXT_PSE_PORT_PWR_CONSUMPTION,
            mib::CPE_EXT_PSE_PORT_MAX_PWR_DRAWN,
        ];
        let (idx, column) = columns
            .iter()
            .find_map(|branch| oid_index(oid, branch).map(|idx| (idx, *branch)))?;
        let (Some((pse, port)), Some(mw)) = (PoePort::parse_index(idx), value.as_u32()) else {
            return Some(ctx.malformed(oid, value));
        };
        let entry = ctx.poe_port(pse, port);
        match column {
            mib::CPE_EXT_PSE_PORT_PWR_ALLOCATED => {
                if entry.power_available == 0 {
                    entry.power_available = mw;
                }
            }
            mib::CPE_EXT_PSE_PORT_PWR_AVAILABLE => entry.power_available = mw,
            mib::CPE_EXT_PSE_PORT_PWR_CONSUMPTION => entry.power_consumed = mw,
            _ => entry.max_power_consumed = mw,
        }
        Some(ParseOutcome::Consumed)
    }

    /// Interface whose name ends in "<module>/<port>" or "<module>/0/<port>"
    /// on a digit boundary, so 1/1 never matches 1/11 or 11/1.
    fn poe_interface(ctx: &WalkContext, module: u32, port: u32) -> Option<u32> {
        let suffixes = [format!("{}/0/{}", module, port), format!("{}/{}", module, port)];
        ctx.device
            .interfaces()
            .find(|iface| {
                suffixes.iter().any(|suffix| {
                    iface.name.strip_suffix(suffix.as_str()).is_some_and(|head| {
                        !head.is_empty() && !head.ends_with(|c: char| c.is_ascii_digit() || c == '/')
                    })
                })
            })
            .map(|iface| iface.index)
    }

    async fn walk_vlan_bridge(s: &mut SnmpSession<'_>, vlan_id: u16) -> Result<()> {
        let mut scoped = s.transport.for_vlan(vlan_id).await?;
        s.walk_scoped(scoped.as_mut(), standard::DOT1D_BASE_PORT_IFINDEX).await?;
        s.walk_scoped(scoped.as_mut(), standard::DOT1D_TP_FDB_PORT).await?;
        Ok(())
    }

    async fn copy_running_to_startup(t: &mut dyn SnmpTransport) -> Result<()> {
        let row: u32 = rand::thread_rng().gen_range(1..=999);
        t.set(&[
            (column(mib::CC_COPY_SOURCE_FILE_TYPE, row), SnmpValue::Integer(mib::copy::FILE_RUNNING_CONFIG)),
            (column(mib::CC_COPY_DEST_FILE_TYPE, row), SnmpValue::Integer(mib::copy::FILE_STARTUP_CONFIG)),
            (column(mib::CC_COPY_ENTRY_ROW_STATUS, row), SnmpValue::Integer(mib::copy::ROW_CREATE_AND_GO)),
        ])
        .await?;

        let mut last_state = None;
        for _ in 0..COPY_POLLS {
            last_state = t.get(&column(mib::CC_COPY_STATE, row)).await?.and_then(|v| v.as_i64());
            match last_state {
                None | Some(mib::copy::STATE_WAITING) | Some(mib::copy::STATE_RUNNING) => {
                    tokio::time::sleep(COPY_POLL_INTERVAL).await
                }
                _ => break,
            }
        }
        let destroy = [(column(mib::CC_COPY_ENTRY_ROW_STATUS, row), SnmpValue::Integer(mib::copy::ROW_DESTROY))];
        if let Err(err) = t.set(&destroy).await {
            tracing::debug!("ccCopy row {} not removed: {}", row, err);
        }
        match last_state {
            Some(mib::copy::STATE_SUCCESSFUL) => Ok(()),
            Some(mib::copy::STATE_FAILED) => Err(Error::save("Config copy failed on the device")),
            other => Err(Error::save("Config copy did not finish")
                .with_details(format!("last ccCopyState: {:?}", other))),
        }
    }
}

#[async_trait]
impl VendorDialect for Cisco {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Cisco
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(true)
    }

    fn parse_oid(&self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        Self::parse_vtp(ctx, oid, value)
            .or_else(|| Self::parse_trunk(ctx, oid, value))
            .or_else(|| Self::parse_poe(ctx, oid, value))
            .unwrap_or(ParseOutcome::NotRecognized)
    }

    async fn get_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        // keyed by VLAN id, any order works
        for branch in [mib::VTP_VLAN_STATE, mib::VTP_VLAN_TYPE, mib::VTP_VLAN_NAME] {
            s.walk_branch(branch).await?;
        }
        Ok(())
    }

    async fn get_port_vlan_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        // trunk state first: native VLAN and vmVlan depend on it
        for branch in [
            mib::VLAN_TRUNK_PORT_DYNAMIC_STATE,
            mib::VLAN_TRUNK_PORT_DYNAMIC_STATUS,
            mib::VLAN_TRUNK_PORT_NATIVE_VLAN,
            mib::VM_VLAN,
        ] {
            s.walk_branch(branch).await?;
        }
        for (branch, _) in TRUNK_BITMAPS {
            s.walk_branch(branch).await?;
        }
        Ok(())
    }

    async fn get_poe_data(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        generic::get_poe_data(s).await?;
        for branch in [
            mib::CPE_EXT_PSE_PORT_PWR_ALLOCATED,
            mib::CPE_EXT_PSE_PORT_PWR_AVAILABLE,
            mib::CPE_EXT_PSE_PORT_PWR_CONSUMPTION,
            mib::CPE_EXT_PSE_PORT_MAX_PWR_DRAWN,
        ] {
            s.walk_branch(branch).await?;
        }
        Ok(())
    }

    fn map_poe_port_entries_to_interface(&self, ctx: &mut WalkContext) {
        generic::map_poe_ports(ctx, Self::poe_interface);
    }

    /// The bridge MIB is instanced per VLAN (community@vid). VLANs are walked
    /// one after the other; a failing VLAN is a warning. A transport that
    /// cannot scope to a VLAN at all stops the walk after one warning.
    async fn get_known_ethernet_addresses(&self, s: &mut SnmpSession<'_>) -> Result<()> {
        let vlans: Vec<u16> = s
            .ctx
            .device
            .vlans
            .values()
            .filter(|v| v.vlan_type == VlanType::Normal)
            .map(|v| v.id)
            .collect();
        for vlan_id in vlans {
            s.ctx.current_vlan = Some(vlan_id);
            let walked = Self::walk_vlan_bridge(s, vlan_id).await;
            s.ctx.current_vlan = None;
            match walked {
                Ok(()) => {}
                Err(err) if err.is(ErrorKind::Cancelled) => return Err(err),
                Err(err) if err.is(ErrorKind::UnsupportedOperation) => {
                    s.ctx.warn(
                        LogCategory::Poll,
                        LogAction::PhaseFailed,
                        format!("Per-VLAN ethernet tables unavailable: {}", err),
                    );
                    break;
                }
                Err(err) => s.ctx.warn(
                    LogCategory::Poll,
                    LogAction::PhaseFailed,
                    format!("Ethernet table of VLAN {} unavailable: {}", vlan_id, err),
                ),
            }
        }
        Ok(())
    }

    async fn set_interface_untagged_vlan(
        &self,
        t: &mut dyn SnmpTransport,
        _device: &DeviceSnapshot,
        iface: &Interface,
        vlan_id: u16,
    ) -> Result<()> {
        let branch = if iface.is_tagged {
            mib::VLAN_TRUNK_PORT_NATIVE_VLAN
        } else {
            mib::VM_VLAN
        };
        t.set(&[(column(branch, iface.index), SnmpValue::Integer(vlan_id as i64))])
            .await
    }

    /// CISCO-CONFIG-COPY-MIB running -> startup, falling back to writeMem on
    /// images without the copy MIB.
    async fn save_running_config(&self, t: &mut dyn SnmpTransport) -> Result<()> {
        let copy_err = match Self::copy_running_to_startup(t).await {
            Ok(()) => return Ok(()),
            Err(err) if err.is(ErrorKind::Cancelled) => return Err(err),
            Err(err) => err,
        };
        tracing::warn!("ccCopy save failed ({}), trying writeMem", copy_err);
        t.set(&[(mib::WRITE_MEM.to_string(), SnmpValue::Integer(1))])
            .await
            .map_err(|err| {
                Error::save("Saving the running config failed")
                    .with_details(format!("ccCopy: {}; writeMem: {}", copy_err, err))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::GenericParser;
    use crate::models::{Interface, PoeStatus};
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    fn ctx_with(names: &[(u32, &str)]) -> WalkContext {
        let mut device = DeviceSnapshot::default();
        for (index, name) in names {
            let mut iface = Interface::with_index(*index);
            iface.name = name.to_string();
            device.insert_interface(iface);
        }
        WalkContext::new("cisco", device)
    }

    #[test]
    fn test_vtp_name_and_state_in_any_order() {
        for name_first in [false, true] {
            let mut ctx = ctx_with(&[]);
            let mut generic = GenericParser::new();
            let state = ("1.3.6.1.4.1.9.9.46.1.3.1.1.2.1.20", SnmpValue::Integer(1));
            let name = ("1.3.6.1.4.1.9.9.46.1.3.1.1.4.1.20", SnmpValue::string("Engineering"));
            let rows = if name_first { [name, state] } else { [state, name] };
            for (oid, value) in &rows {
                assert_eq!(
                    crate::connector::parse_chain(&Cisco, &mut generic, &mut ctx, oid, value),
                    ParseOutcome::Consumed
                );
            }
            let vlan = &ctx.device.vlans[&20];
            assert_eq!(vlan.id, 20);
            assert_eq!(vlan.name, "Engineering");
            assert_eq!(vlan.status, VlanStatus::Permanent);
            assert_eq!(generic.consumed(), 0);
            assert_eq!(ctx.oid_cache.len(), 2);
        }
    }

    #[test]
    fn test_standard_oid_falls_through_to_generic() {
        let mut ctx = ctx_with(&[(1, "Gi1/0/1")]);
        let mut generic = GenericParser::new();
        crate::connector::parse_chain(&Cisco, &mut generic, &mut ctx, "1.3.6.1.2.1.31.1.1.1.18.1", &SnmpValue::string("ap"));
        assert_eq!(generic.consumed(), 1);
        assert_eq!(ctx.device.interface("1").unwrap().description, "ap");
    }

    #[tokio::test]
    async fn test_trunk_native_and_access_vlans() {
        let mut agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.4.1.9.9.46.1.6.1.1.14.1", SnmpValue::Integer(1))
            .insert("1.3.6.1.4.1.9.9.46.1.6.1.1.14.2", SnmpValue::Integer(2))
            .insert("1.3.6.1.4.1.9.9.46.1.6.1.1.5.1", SnmpValue::Integer(99))
            .insert("1.3.6.1.4.1.9.9.46.1.6.1.1.5.2", SnmpValue::Integer(1))
            .insert("1.3.6.1.4.1.9.9.68.1.2.2.1.2.1", SnmpValue::Integer(10))
            .insert("1.3.6.1.4.1.9.9.68.1.2.2.1.2.2", SnmpValue::Integer(10))
            // VLANs 10 and 20 allowed on the trunk (bits 11 and 21)
            .insert(
                "1.3.6.1.4.1.9.9.46.1.6.1.1.4.1",
                SnmpValue::OctetString(vec![0x00, 0x20, 0x08]),
            );
        let mut ctx = ctx_with(&[(1, "Gi1/0/1"), (2, "Gi1/0/2")]);
        for vid in [10u16, 20, 99] {
            ctx.device.vlan_or_insert(vid);
        }
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Cisco,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Cisco.get_port_vlan_data(&mut s).await);

        let trunk = ctx.device.interface("1").unwrap();
        assert!(trunk.is_tagged);
        assert_eq!(trunk.untagged_vlan, 99);
        assert_eq!(trunk.tagged_vlans, vec![10, 20]);
        let access = ctx.device.interface("2").unwrap();
        assert!(!access.is_tagged);
        assert_eq!(access.untagged_vlan, 10);
        assert!(ctx.vendor_untagged.contains(&2));
    }

    #[test]
    fn test_poe_name_mapping_digit_boundary() {
        let mut ctx = ctx_with(&[(10111, "GigabitEthernet1/0/11"), (10101, "GigabitEthernet1/0/1")]);
        ctx.poe_port(1, 1).detect_status = PoeStatus::Delivering;
        ctx.poe_port(1, 11).power_consumed = 3200;
        ctx.poe_port(2, 1);
        Cisco.map_poe_port_entries_to_interface(&mut ctx);

        assert_eq!(ctx.device.interface("10101").unwrap().poe_entry.as_ref().unwrap().port, 1);
        assert_eq!(
            ctx.device.interface("10111").unwrap().poe_entry.as_ref().unwrap().power_consumed,
            3200
        );
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].action, LogAction::PoeUnmapped);
    }

    #[tokio::test]
    async fn test_per_vlan_fdb_walk() {
        let mut agent = MemoryAgent::new();
        agent
            .insert_vlan(10, "1.3.6.1.2.1.17.1.4.1.2.5", SnmpValue::Integer(1))
            .insert_vlan(10, "1.3.6.1.2.1.17.4.3.1.2.0.27.84.1.2.3", SnmpValue::Integer(5));
        let mut ctx = ctx_with(&[(1, "Gi1/0/1")]);
        ctx.device.vlan_or_insert(10);
        ctx.device.vlan_or_insert(30);
        ctx.device.vlan_or_insert(1003).vlan_type = VlanType::Reserved;
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Cisco,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Cisco.get_known_ethernet_addresses(&mut s).await);

        let learned = &ctx.device.interface("1").unwrap().eth;
        assert_eq!(learned.len(), 1);
        assert_eq!(learned.values().next().unwrap().vlan_id, 10);
        // two walks per VLAN, reserved VLANs skipped
        assert_eq!(agent.call_count(), 4);
        assert!(ctx.current_vlan.is_none());
    }

    #[tokio::test]
    async fn test_failing_vlan_is_a_warning() {
        let mut agent = MemoryAgent::new();
        agent.fail_on("1.3.6.1.2.1.17.4.3", Error::timeout("no answer"));
        let mut ctx = ctx_with(&[(1, "Gi1/0/1")]);
        ctx.device.vlan_or_insert(30);
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Cisco,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Cisco.get_known_ethernet_addresses(&mut s).await);
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].action, LogAction::PhaseFailed);

        agent.fail_on("1.3.6.1.2.1.17.1.4", Error::cancelled());
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Cisco,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        let err = Cisco.get_known_ethernet_addresses(&mut s).await.unwrap_err();
        assert!(err.is(ErrorKind::Cancelled));
    }

    #[tokio::test]
    async fn test_unscoped_transport_warns_once() {
        let mut agent = MemoryAgent::new();
        agent.refuse_vlan_scope(Error::unsupported("SNMPv3 context vlan-10 cannot be selected"));
        let mut ctx = ctx_with(&[(1, "Gi1/0/1")]);
        for vid in [10u16, 20, 30] {
            ctx.device.vlan_or_insert(vid);
        }
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Cisco,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        assert_ok!(Cisco.get_known_ethernet_addresses(&mut s).await);
        assert_eq!(ctx.events.len(), 1);
        assert!(ctx.events[0].description.contains("Per-VLAN"));
        assert_eq!(ctx.device.ethernet_count(), 0);
        assert_eq!(agent.call_count(), 0);
    }

    #[tokio::test]
    async fn test_save_via_config_copy() {
        let mut agent = MemoryAgent::new();
        agent.mirror_set(
            mib::CC_COPY_ENTRY_ROW_STATUS,
            mib::CC_COPY_STATE,
            SnmpValue::Integer(mib::copy::STATE_SUCCESSFUL),
        );
        assert_ok!(Cisco.save_running_config(&mut agent).await);
        let sets = agent.sets();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[2].1, SnmpValue::Integer(mib::copy::ROW_CREATE_AND_GO));
        assert_eq!(sets[3].1, SnmpValue::Integer(mib::copy::ROW_DESTROY));
    }

    #[tokio::test]
    async fn test_unknown_copy_state_stops_polling() {
        let mut agent = MemoryAgent::new();
        agent.mirror_set(mib::CC_COPY_ENTRY_ROW_STATUS, mib::CC_COPY_STATE, SnmpValue::Integer(7));
        let err = Cisco::copy_running_to_startup(&mut agent).await.unwrap_err();
        assert!(err.is(ErrorKind::ConfigSaveError));
        assert!(err.details.unwrap_or_default().contains("Some(7)"));
        // create row, one state read, destroy row
        assert_eq!(agent.call_count(), 3);
    }

    #[tokio::test]
    async fn test_save_falls_back_to_write_mem() {
        let mut agent = MemoryAgent::new();
        agent.fail_on("1.3.6.1.4.1.9.9.96", Error::protocol("noSuchName"));
        assert_ok!(Cisco.save_running_config(&mut agent).await);
        assert_eq!(agent.sets(), vec![(mib::WRITE_MEM.to_string(), SnmpValue::Integer(1))]);
    }

    #[tokio::test]
    async fn test_vlan_write_picks_access_or_native() {
        let mut agent = MemoryAgent::new();
        let device = DeviceSnapshot::default();
        let mut iface = Interface::with_index(7);
        assert_ok!(Cisco.set_interface_untagged_vlan(&mut agent, &device, &iface, 20).await);
        iface.is_tagged = true;
        assert_ok!(Cisco.set_interface_untagged_vlan(&mut agent, &device, &iface, 30).await);
        let sets = agent.sets();
        assert_eq!(sets[0].0, "1.3.6.1.4.1.9.9.68.1.2.2.1.2.7");
        assert_eq!(sets[1], ("1.3.6.1.4.1.9.9.46.1.6.1.1.5.7".to_string(), SnmpValue::Integer(30)));
    }
}
