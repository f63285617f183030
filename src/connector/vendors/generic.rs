//! Standard-MIB walks and writes shared by every SNMP dialect.

use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, SnmpSession, WalkContext};
use crate::error::{Error, Result};
use crate::models::{entity_class, DeviceSnapshot, Interface, LogAction, LogCategory};
use crate::snmp::mibs::standard as mib;
use crate::snmp::SnmpValue;
use crate::transport::SnmpTransport;

/// Any agent speaking the standard MIBs.
pub struct Generic;

impl VendorDialect for Generic {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Generic
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(false)
    }
}

pub(crate) fn column(branch: &str, index: impl std::fmt::Display) -> String {
    format!("{}.{}", branch, index)
}

pub(crate) fn truth(value: bool) -> SnmpValue {
    SnmpValue::Integer(if value { 1 } else { 2 })
}

/// ifTable and ifXTable columns, the bridge port map and LACP membership.
pub async fn get_interface_data(s: &mut SnmpSession<'_>) -> Result<()> {
    for branch in [
        mib::IF_DESCR,
        mib::IF_TYPE,
        mib::IF_MTU,
        mib::IF_SPEED,
        mib::IF_PHYS_ADDRESS,
        mib::IF_ADMIN_STATUS,
        mib::IF_OPER_STATUS,
        mib::IF_NAME,
        mib::IF_HIGH_SPEED,
        mib::IF_ALIAS,
    ] {
        s.walk_branch(branch).await?;
    }
    s.walk_branch(mib::DOT1D_BASE_PORT_IFINDEX).await?;
    s.walk_branch(mib::DOT3AD_AGG_PORT_ATTACHED_AGG_ID).await?;
    Ok(())
}

/// Q-BRIDGE VLANs. All columns are keyed by VLAN id, so order is free.
pub async fn get_vlan_data(s: &mut SnmpSession<'_>) -> Result<()> {
    for branch in [
        mib::DOT1Q_VLAN_STATIC_NAME,
        mib::DOT1Q_VLAN_STATUS,
        mib::DOT1Q_VLAN_FDB_ID,
        mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS,
        mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS,
    ] {
        s.walk_branch(branch).await?;
    }
    Ok(())
}

pub async fn get_port_vlan_data(s: &mut SnmpSession<'_>) -> Result<()> {
    s.walk_branch(mib::DOT1Q_PVID).await?;
    derive_vlan_membership(s.ctx);
    Ok(())
}

/// Tagged VLANs from the static egress lists: egress without untagged is
/// tagged. Fills in an untagged VLAN only where nothing set one yet.
pub fn derive_vlan_membership(ctx: &mut WalkContext) {
    let memberships: Vec<(u16, Vec<usize>, Vec<usize>)> = ctx
        .device
        .vlans
        .values()
        .map(|v| (v.id, v.egress_ports.ports(), v.untagged_ports.ports()))
        .collect();
    for (vid, egress, untagged) in memberships {
        for port in egress {
            let if_index = ctx.if_index_for_port(port as u32);
            let vendor_set = ctx.vendor_untagged.contains(&if_index);
            let Some(iface) = ctx.device.interface_by_index_mut(if_index) else {
                continue;
            };
            if untagged.contains(&port) {
                if !iface.has_untagged_vlan() && !vendor_set {
                    iface.untagged_vlan = vid as i32;
                }
            } else if iface.untagged_vlan != vid as i32 {
                iface.add_tagged_vlan(vid);
            }
        }
    }
}

pub async fn get_poe_data(s: &mut SnmpSession<'_>) -> Result<()> {
    for branch in [
        mib::PETH_PSE_PORT_ADMIN_ENABLE,
        mib::PETH_PSE_PORT_DETECTION_STATUS,
        mib::PETH_PSE_PORT_PRIORITY,
        mib::PETH_MAIN_PSE_TABLE,
    ] {
        s.walk_branch(branch).await?;
    }
    Ok(())
}

/// Move staged PoE entries onto interfaces. `resolve` turns a (pse, port)
/// index into an ifIndex; entries it cannot place are warnings.
pub fn map_poe_ports<F>(ctx: &mut WalkContext, resolve: F)
where
    F: Fn(&WalkContext, u32, u32) -> Option<u32>,
{
    let staged = std::mem::take(&mut ctx.poe_ports);
    for ((pse, port), entry) in staged {
        let target = resolve(ctx, pse, port).filter(|idx| ctx.device.interface_by_index(*idx).is_some());
        let Some(iface) = target.and_then(|idx| ctx.device.interface_by_index_mut(idx)) else {
            ctx.warn(
                LogCategory::Poe,
                LogAction::PoeUnmapped,
                format!("PoE port {} has no matching interface", entry.index()),
            );
            continue;
        };
        let fault = entry.detect_status.is_fault().then(|| (iface.display_name(), entry.detect_status));
        iface.poe_entry = Some(entry);
        if let Some((name, status)) = fault {
            ctx.warn(
                LogCategory::Poe,
                LogAction::PoeFault,
                format!("PoE fault on {}: {:?}", name, status),
            );
        }
    }
}

/// Q-BRIDGE forwarding database, falling back to the BRIDGE-MIB table on
/// agents without 802.1Q support.
pub async fn get_known_ethernet_addresses(s: &mut SnmpSession<'_>) -> Result<()> {
    if s.walk_branch(mib::DOT1Q_TP_FDB_PORT).await? == 0 {
        s.walk_branch(mib::DOT1D_TP_FDB_PORT).await?;
    }
    Ok(())
}

pub async fn get_arp_data(s: &mut SnmpSession<'_>) -> Result<()> {
    if s.walk_branch(mib::IP_NET_TO_PHYSICAL_PHYS_ADDRESS).await? == 0 {
        s.walk_branch(mib::IP_NET_TO_MEDIA_PHYS_ADDRESS).await?;
    }
    let arp = arp_bindings(s.ctx);
    for (mac, ip) in arp {
        for iface in s.ctx.device.interfaces_mut() {
            if let Some(learned) = iface.eth.get_mut(&mac) {
                learned.set_ip(ip);
            }
        }
    }
    Ok(())
}

fn arp_bindings(ctx: &WalkContext) -> Vec<(String, std::net::IpAddr)> {
    ctx.device
        .interfaces()
        .flat_map(|iface| iface.arp.values())
        .filter_map(|entry| Some((entry.address.to_string(), entry.ip4.or(entry.ip6)?)))
        .collect()
}

pub async fn get_lldp_data(s: &mut SnmpSession<'_>) -> Result<()> {
    for branch in [
        mib::LLDP_REM_CHASSIS_ID_SUBTYPE,
        mib::LLDP_REM_CHASSIS_ID,
        mib::LLDP_REM_PORT_ID_SUBTYPE,
        mib::LLDP_REM_PORT_ID,
        mib::LLDP_REM_PORT_DESC,
        mib::LLDP_REM_SYS_NAME,
        mib::LLDP_REM_SYS_DESC,
        mib::LLDP_REM_SYS_CAP_SUPPORTED,
        mib::LLDP_REM_SYS_CAP_ENABLED,
        mib::LLDP_REM_MAN_ADDR_IF_SUBTYPE,
    ] {
        s.walk_branch(branch).await?;
    }
    attach_neighbors(s.ctx);
    Ok(())
}

/// LLDP local port numbers are ifIndexes on most agents and bridge ports
/// on the rest.
fn attach_neighbors(ctx: &mut WalkContext) {
    let staged = std::mem::take(&mut ctx.lldp);
    for (_, mut entry) in staged {
        let chassis_raw = std::mem::take(&mut entry.chassis_raw);
        let port_raw = std::mem::take(&mut entry.port_raw);
        entry.neighbor.set_chassis_id(&chassis_raw);
        entry.neighbor.set_port_id(&port_raw);
        let local = entry.local_port;
        let if_index = if ctx.device.interface_by_index(local).is_some() {
            local
        } else {
            ctx.if_index_for_port(local)
        };
        match ctx.device.interface_by_index_mut(if_index) {
            Some(iface) => iface.add_neighbor(entry.neighbor),
            None => tracing::debug!("LLDP neighbor on unknown local port {}", local),
        }
    }
}

/// ENTITY-MIB physical table reduced to chassis entries, plus the
/// "more info" summary.
pub async fn get_hardware_details(s: &mut SnmpSession<'_>) -> Result<()> {
    for branch in [
        mib::ENT_PHYSICAL_DESCR,
        mib::ENT_PHYSICAL_CLASS,
        mib::ENT_PHYSICAL_SOFTWARE_REV,
        mib::ENT_PHYSICAL_SERIAL_NUM,
        mib::ENT_PHYSICAL_MODEL_NAME,
    ] {
        s.walk_branch(branch).await?;
    }
    summarize_hardware(&mut s.ctx.device);
    Ok(())
}

pub fn summarize_hardware(device: &mut DeviceSnapshot) {
    device
        .stack_members
        .retain(|_, m| m.class == entity_class::CHASSIS || m.class == entity_class::STACK);

    let system = &device.system;
    let info = &mut device.more_info;
    info.insert("Vendor".into(), system.vendor.clone());
    info.insert("System object id".into(), system.object_id.clone());
    if !system.contact.is_empty() {
        info.insert("Contact".into(), system.contact.clone());
    }
    if !system.location.is_empty() {
        info.insert("Location".into(), system.location.clone());
    }
    let secs = system.uptime_ticks / 100;
    info.insert(
        "Uptime".into(),
        format!("{} days {:02}:{:02}", secs / 86400, secs % 86400 / 3600, secs % 3600 / 60),
    );

    let chassis: Vec<_> = device
        .stack_members
        .values()
        .filter(|m| m.class == entity_class::CHASSIS)
        .collect();
    if let Some(first) = chassis.first() {
        info.insert("Serial".into(), first.serial.clone());
        info.insert("Model".into(), first.model.clone());
        info.insert("Software version".into(), first.version.clone());
    }
    if chassis.len() > 1 {
        info.insert("Stack members".into(), chassis.len().to_string());
    }
}

pub async fn set_interface_description(t: &mut dyn SnmpTransport, iface: &Interface, description: &str) -> Result<()> {
    t.set(&[(column(mib::IF_ALIAS, iface.index), SnmpValue::string(description))])
        .await
}

pub async fn set_interface_admin_status(t: &mut dyn SnmpTransport, iface: &Interface, up: bool) -> Result<()> {
    t.set(&[(column(mib::IF_ADMIN_STATUS, iface.index), truth(up))]).await
}

pub async fn set_interface_poe_status(t: &mut dyn SnmpTransport, iface: &Interface, enabled: bool) -> Result<()> {
    let Some(entry) = &iface.poe_entry else {
        return Err(Error::unsupported(format!("{} has no PoE", iface.display_name())));
    };
    t.set(&[(column(mib::PETH_PSE_PORT_ADMIN_ENABLE, entry.index()), truth(enabled))])
        .await
}

/// Q-BRIDGE untagged VLAN change: add the port to the new VLAN's static
/// lists, move the PVID, then take the port out of the old VLAN.
pub async fn set_interface_untagged_vlan(
    t: &mut dyn SnmpTransport,
    device: &DeviceSnapshot,
    iface: &Interface,
    vlan_id: u16,
) -> Result<()> {
    let Some(port) = iface.port_id else {
        return Err(Error::unsupported(format!("{} is not a bridge port", iface.display_name())));
    };
    let position = port as usize;
    let vlan = device
        .vlans
        .get(&vlan_id)
        .ok_or_else(|| Error::not_found("VLAN", &vlan_id.to_string()))?;

    let mut egress = vlan.egress_ports.clone();
    let mut untagged = vlan.untagged_ports.clone();
    egress.set(position, true);
    untagged.set(position, true);
    t.set(&[
        (
            column(mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS, vlan_id),
            SnmpValue::OctetString(egress.to_bytes()),
        ),
        (
            column(mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS, vlan_id),
            SnmpValue::OctetString(untagged.to_bytes()),
        ),
    ])
    .await?;

    t.set(&[(column(mib::DOT1Q_PVID, port), SnmpValue::Unsigned32(vlan_id as u32))])
        .await?;

    let old_id = iface.untagged_vlan;
    if old_id <= 0 || old_id == vlan_id as i32 {
        return Ok(());
    }
    let Some(old) = device.vlans.get(&(old_id as u16)) else {
        return Ok(());
    };
    let mut varbinds = Vec::with_capacity(2);
    if !iface.is_tagged {
        let mut egress = old.egress_ports.clone();
        egress.set(position, false);
        varbinds.push((
            column(mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS, old.id),
            SnmpValue::OctetString(egress.to_bytes()),
        ));
    }
    let mut untagged = old.untagged_ports.clone();
    untagged.set(position, false);
    varbinds.push((
        column(mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS, old.id),
        SnmpValue::OctetString(untagged.to_bytes()),
    ));
    t.set(&varbinds).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::GenericParser;
    use crate::models::{PoeStatus, VLAN_UNSET};
    use crate::transport::MemoryAgent;

    fn basic_agent() -> MemoryAgent {
        let agent = MemoryAgent::new();
        for i in 1..=4u32 {
            agent
                .insert(&column(mib::IF_DESCR, i), SnmpValue::string(&format!("port{}", i)))
                .insert(&column(mib::IF_TYPE, i), SnmpValue::Integer(6))
                .insert(&column(mib::DOT1D_BASE_PORT_IFINDEX, i), SnmpValue::Integer(i as i64));
        }
        agent
            .insert(&column(mib::DOT1Q_VLAN_STATIC_NAME, 10), SnmpValue::string("users"))
            .insert(&column(mib::DOT1Q_VLAN_STATIC_NAME, 20), SnmpValue::string("voice"))
            // ports 1-3 in VLAN 10, port 1 and 2 untagged
            .insert(&column(mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS, 10), SnmpValue::OctetString(vec![0xe0]))
            .insert(&column(mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS, 10), SnmpValue::OctetString(vec![0xc0]))
            // port 3 untagged in 20
            .insert(&column(mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS, 20), SnmpValue::OctetString(vec![0x20]))
            .insert(&column(mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS, 20), SnmpValue::OctetString(vec![0x20]))
            .insert(&column(mib::DOT1Q_PVID, 1), SnmpValue::Unsigned32(10))
            .insert(&column(mib::DOT1Q_PVID, 3), SnmpValue::Unsigned32(20));
        agent
    }

    async fn load(agent: &mut MemoryAgent) -> WalkContext {
        let mut ctx = WalkContext::new("test", DeviceSnapshot::default());
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: agent,
            dialect: &Generic,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        get_interface_data(&mut s).await.unwrap();
        get_vlan_data(&mut s).await.unwrap();
        get_port_vlan_data(&mut s).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_vlan_membership_from_static_lists() {
        let mut agent = basic_agent();
        let ctx = load(&mut agent).await;
        let device = &ctx.device;

        assert_eq!(device.vlans[&10].name, "users");
        assert_eq!(device.interface("1").unwrap().untagged_vlan, 10);
        // no PVID row, taken from the untagged list
        assert_eq!(device.interface("2").unwrap().untagged_vlan, 10);
        let port3 = device.interface("3").unwrap();
        assert_eq!(port3.untagged_vlan, 20);
        assert_eq!(port3.tagged_vlans, vec![10]);
        assert!(port3.is_tagged);
        assert_eq!(device.interface("4").unwrap().untagged_vlan, VLAN_UNSET);
    }

    #[tokio::test]
    async fn test_untagged_vlan_write_sequence() {
        let mut agent = basic_agent();
        let ctx = load(&mut agent).await;
        let iface = ctx.device.interface("1").unwrap().clone();

        set_interface_untagged_vlan(&mut agent, &ctx.device, &iface, 20)
            .await
            .unwrap();
        let sets = agent.sets();
        assert_eq!(sets.len(), 5);
        assert_eq!(sets[0].0, column(mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS, 20));
        assert_eq!(sets[0].1, SnmpValue::OctetString(vec![0xa0]));
        assert_eq!(sets[2], (column(mib::DOT1Q_PVID, 1), SnmpValue::Unsigned32(20)));
        // port 1 leaves VLAN 10 completely
        assert_eq!(sets[3].1, SnmpValue::OctetString(vec![0x60]));
        assert_eq!(sets[4].1, SnmpValue::OctetString(vec![0x40]));
    }

    #[tokio::test]
    async fn test_poe_mapping_warnings() {
        let mut agent = basic_agent();
        agent
            .insert(&column(mib::PETH_PSE_PORT_ADMIN_ENABLE, "1.2"), SnmpValue::Integer(1))
            .insert(&column(mib::PETH_PSE_PORT_DETECTION_STATUS, "1.2"), SnmpValue::Integer(4))
            .insert(&column(mib::PETH_PSE_PORT_ADMIN_ENABLE, "1.48"), SnmpValue::Integer(1));
        let mut ctx = load(&mut agent).await;
        let mut generic = GenericParser::new();
        let mut s = SnmpSession {
            transport: &mut agent,
            dialect: &Generic,
            ctx: &mut ctx,
            generic: &mut generic,
        };
        get_poe_data(&mut s).await.unwrap();
        Generic.map_poe_port_entries_to_interface(&mut ctx);

        let entry = ctx.device.interface("2").unwrap().poe_entry.clone().unwrap();
        assert_eq!(entry.detect_status, PoeStatus::Fault);
        let actions: Vec<_> = ctx.events.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![LogAction::PoeFault, LogAction::PoeUnmapped]);
    }

    #[tokio::test]
    async fn test_poe_write_needs_entry() {
        let mut agent = MemoryAgent::new();
        let iface = Interface::with_index(3);
        let err = set_interface_poe_status(&mut agent, &iface, true).await.unwrap_err();
        assert!(err.is(crate::error::ErrorKind::UnsupportedOperation));
        assert_eq!(agent.call_count(), 0);
    }

    #[test]
    fn test_hardware_summary() {
        let mut device = DeviceSnapshot::default();
        device.system.uptime_ticks = 100 * (86400 + 3600 + 60);
        for (index, class, serial) in [(1u32, 3i64, "FOC1"), (2, 3, "FOC2"), (1001, 10, "")] {
            device.stack_members.insert(
                index,
                crate::models::StackMember {
                    index,
                    class,
                    serial: serial.into(),
                    ..Default::default()
                },
            );
        }
        summarize_hardware(&mut device);
        assert_eq!(device.stack_members.len(), 2);
        assert_eq!(device.more_info["Serial"], "FOC1");
        assert_eq!(device.more_info["Stack members"], "2");
        assert_eq!(device.more_info["Uptime"], "1 days 01:01");
    }
}
