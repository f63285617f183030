//! OID parse chain.
//!
//! Every walked (oid, value) pair is offered to the vendor dialect first and
//! to the [`GenericParser`] second. Results land in a [`WalkContext`], a
//! staging copy of the device model that is only committed when the whole
//! phase succeeds.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use super::VendorDialect;
use crate::error::Result;
use crate::models::{
    is_valid_vlan_id, ChassisIdType, DeviceSnapshot, EthernetAddress, InterfaceType, LldpCapabilities, LogAction,
    LogCategory, LogEvent, MacAddress, NeighborDevice, PoePort, PoePse, PoeStatus, PortIdType, PortList, PseStatus,
    StackMember, VlanStatus,
};
use crate::snmp::mibs::standard as mib;
use crate::snmp::{oid_index, registry, single_index, SnmpValue};
use crate::transport::SnmpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Consumed,
    NotRecognized,
}

/// LLDP remote entry under construction. Raw ids are rendered once the
/// subtype is known.
#[derive(Debug, Default)]
pub struct LldpStaging {
    pub local_port: u32,
    pub neighbor: NeighborDevice,
    pub chassis_raw: Vec<u8>,
    pub port_raw: Vec<u8>,
}

/// Staging area for one loading phase.
pub struct WalkContext {
    pub device: DeviceSnapshot,
    /// ifIndexes whose untagged VLAN a vendor parser set this cycle.
    pub vendor_untagged: HashSet<u32>,
    /// Vendor VLAN index -> VLAN id.
    pub vlan_index: HashMap<u32, u16>,
    /// Forwarding database id -> VLAN id.
    pub fdb_to_vlan: HashMap<u32, u16>,
    /// PoE port entries keyed by (pse, port), mapped to interfaces later.
    pub poe_ports: BTreeMap<(u32, u32), PoePort>,
    pub lldp: BTreeMap<String, LldpStaging>,
    /// VLAN of the bridge instance being walked (per-VLAN FDB walks).
    pub current_vlan: Option<u16>,
    pub events: Vec<LogEvent>,
    pub oid_cache: BTreeMap<String, SnmpValue>,
    name: String,
}

impl WalkContext {
    pub fn new(name: &str, device: DeviceSnapshot) -> Self {
        let fdb_to_vlan = device
            .vlans
            .values()
            .map(|v| (v.fdb_index, v.id))
            .collect();
        Self {
            device,
            vendor_untagged: HashSet::new(),
            vlan_index: HashMap::new(),
            fdb_to_vlan,
            poe_ports: BTreeMap::new(),
            lldp: BTreeMap::new(),
            current_vlan: None,
            events: Vec::new(),
            oid_cache: BTreeMap::new(),
            name: name.to_string(),
        }
    }

    pub fn warn(&mut self, category: LogCategory, action: LogAction, message: String) {
        tracing::warn!("{}: {}", self.name, message);
        self.events.push(LogEvent::warning(category, action, message));
    }

    /// Skip a value of the wrong shape inside a recognized branch.
    pub fn malformed(&mut self, oid: &str, value: &SnmpValue) -> ParseOutcome {
        self.warn(
            LogCategory::Poll,
            LogAction::OidParseWarning,
            format!("Unexpected value {:?} for {}", value, registry().describe(oid)),
        );
        ParseOutcome::Consumed
    }

    /// ifIndex behind a bridge port, or the port itself when the device
    /// has no bridge port map (ports numbered by ifIndex).
    pub fn if_index_for_port(&self, port: u32) -> u32 {
        self.device.bridge_ports.get(&port).copied().unwrap_or(port)
    }

    /// Untagged VLAN set by a vendor hook; the generic PVID walk will not
    /// overwrite it in this cycle.
    pub fn set_vendor_untagged(&mut self, if_index: u32, vlan_id: u16) -> bool {
        match self.device.interface_by_index_mut(if_index) {
            Some(iface) => {
                iface.untagged_vlan = vlan_id as i32;
                self.vendor_untagged.insert(if_index);
                true
            }
            None => false,
        }
    }

    pub fn poe_port(&mut self, pse: u32, port: u32) -> &mut PoePort {
        self.poe_ports
            .entry((pse, port))
            .or_insert_with(|| PoePort::new(pse, port))
    }

    pub fn pse(&mut self, id: u32) -> &mut PoePse {
        self.device.pses.entry(id).or_insert_with(|| PoePse::new(id))
    }

    /// VLAN for a forwarding database id; Q-BRIDGE agents without an FDB
    /// map use the VLAN id as FDB id.
    pub fn vlan_for_fdb(&self, fdb_id: u32) -> u16 {
        match self.fdb_to_vlan.get(&fdb_id) {
            Some(vid) => *vid,
            None if is_valid_vlan_id(fdb_id as i64) => fdb_id as u16,
            None => 0,
        }
    }
}

/// Offer one varbind to the vendor, then to the generic parser, and cache
/// what was consumed.
pub fn parse_chain(
    dialect: &dyn VendorDialect,
    generic: &mut GenericParser,
    ctx: &mut WalkContext,
    oid: &str,
    value: &SnmpValue,
) -> ParseOutcome {
    let outcome = match dialect.parse_oid(ctx, oid, value) {
        ParseOutcome::Consumed => ParseOutcome::Consumed,
        ParseOutcome::NotRecognized => generic.parse_oid(ctx, oid, value),
    };
    match outcome {
        ParseOutcome::Consumed => {
            ctx.oid_cache.insert(oid.to_string(), value.clone());
        }
        ParseOutcome::NotRecognized => {
            tracing::debug!("Unrecognized OID {}", registry().describe(oid));
        }
    }
    outcome
}

/// Vendor-agnostic parser for the standard MIBs.
#[derive(Debug, Default)]
pub struct GenericParser {
    consumed: usize,
}

fn split_column(index: &str) -> Option<(&str, &str)> {
    index.split_once('.')
}

fn text_of(value: &SnmpValue) -> Option<String> {
    match value {
        SnmpValue::OctetString(_) | SnmpValue::ObjectId(_) => value.as_text(),
        _ => None,
    }
}

impl GenericParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of varbinds this parser consumed.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn parse_oid(&mut self, ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        let outcome = Self::dispatch(ctx, oid, value);
        if outcome == ParseOutcome::Consumed {
            self.consumed += 1;
        }
        outcome
    }

    fn dispatch(ctx: &mut WalkContext, oid: &str, value: &SnmpValue) -> ParseOutcome {
        if let Some(idx) = oid_index(oid, mib::SYSTEM) {
            return parse_system(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::IF_TABLE) {
            return parse_if_table(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::IFX_TABLE) {
            return parse_ifx_table(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1D_BASE_PORT_IFINDEX) {
            return parse_bridge_port(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_VLAN_STATUS) {
            return parse_vlan_current(ctx, oid, idx, value, false);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_VLAN_FDB_ID) {
            return parse_vlan_current(ctx, oid, idx, value, true);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_VLAN_STATIC_NAME) {
            return parse_vlan_static(ctx, oid, idx, value, StaticColumn::Name);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_VLAN_STATIC_EGRESS_PORTS) {
            return parse_vlan_static(ctx, oid, idx, value, StaticColumn::Egress);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_VLAN_STATIC_UNTAGGED_PORTS) {
            return parse_vlan_static(ctx, oid, idx, value, StaticColumn::Untagged);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_PVID) {
            return parse_pvid(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1Q_TP_FDB_PORT) {
            return parse_qbridge_fdb(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::DOT1D_TP_FDB_PORT) {
            return parse_bridge_fdb(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::PETH_PSE_PORT_TABLE) {
            return parse_poe_port(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::PETH_MAIN_PSE_TABLE) {
            return parse_poe_pse(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::LLDP_REM_TABLE) {
            return parse_lldp_remote(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::LLDP_REM_MAN_ADDR_IF_SUBTYPE) {
            return parse_lldp_man_addr(ctx, oid, idx);
        }
        if let Some(idx) = oid_index(oid, mib::IP_NET_TO_MEDIA_PHYS_ADDRESS) {
            return parse_arp_media(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::IP_NET_TO_PHYSICAL_PHYS_ADDRESS) {
            return parse_arp_physical(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::DOT3AD_AGG_PORT_ATTACHED_AGG_ID) {
            return parse_lacp(ctx, oid, idx, value);
        }
        if let Some(idx) = oid_index(oid, mib::ENT_PHYSICAL_TABLE) {
            return parse_entity(ctx, oid, idx, value);
        }
        ParseOutcome::NotRecognized
    }
}

fn parse_system(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    if !matches!(idx, "1.0" | "2.0" | "3.0" | "4.0" | "5.0" | "6.0") {
        return ParseOutcome::NotRecognized;
    }
    if idx == "3.0" {
        let Some(ticks) = value.as_u32() else {
            return ctx.malformed(oid, value);
        };
        ctx.device.system.uptime_ticks = ticks;
        return ParseOutcome::Consumed;
    }
    let Some(text) = text_of(value) else {
        return ctx.malformed(oid, value);
    };
    let system = &mut ctx.device.system;
    match idx {
        "1.0" => system.description = text,
        "2.0" => system.object_id = text,
        "4.0" => system.contact = text,
        "5.0" => system.name = text,
        _ => system.location = text,
    }
    ParseOutcome::Consumed
}

fn parse_if_table(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    if !matches!(column, "2" | "3" | "4" | "5" | "6" | "7" | "8") {
        return ParseOutcome::NotRecognized;
    }
    let Some(if_index) = single_index(rest) else {
        return ctx.malformed(oid, value);
    };
    if column == "2" || column == "6" {
        let Some(bytes) = value.as_bytes() else {
            return ctx.malformed(oid, value);
        };
        let iface = ctx.device.ensure_interface(if_index);
        if column == "2" {
            if iface.name.is_empty() {
                iface.name = String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string();
            }
        } else {
            iface.phys_addr = MacAddress::from_slice(bytes);
        }
        return ParseOutcome::Consumed;
    }
    let Some(v) = value.as_i64() else {
        return ctx.malformed(oid, value);
    };
    let iface = ctx.device.ensure_interface(if_index);
    match column {
        "3" => iface.if_type = InterfaceType::from_iftype(v),
        "4" => iface.mtu = v.max(0) as u32,
        "5" => {
            if iface.speed == 0 {
                iface.speed = (v.max(0) / 1_000_000) as u32;
            }
        }
        "7" => iface.admin_status = v == 1,
        _ => iface.oper_status = v == 1,
    }
    ParseOutcome::Consumed
}

fn parse_ifx_table(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    if !matches!(column, "1" | "15" | "18") {
        return ParseOutcome::NotRecognized;
    }
    let Some(if_index) = single_index(rest) else {
        return ctx.malformed(oid, value);
    };
    if column == "15" {
        let Some(mbps) = value.as_u32() else {
            return ctx.malformed(oid, value);
        };
        if mbps > 0 {
            ctx.device.ensure_interface(if_index).speed = mbps;
        }
        return ParseOutcome::Consumed;
    }
    let Some(text) = text_of(value) else {
        return ctx.malformed(oid, value);
    };
    let iface = ctx.device.ensure_interface(if_index);
    if column == "1" {
        if !text.is_empty() {
            iface.name = text;
        }
    } else {
        iface.description = text;
    }
    ParseOutcome::Consumed
}

fn parse_bridge_port(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let (Some(port), Some(if_index)) = (single_index(idx), value.as_u32()) else {
        return ctx.malformed(oid, value);
    };
    ctx.device.bridge_ports.insert(port, if_index);
    if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
        iface.port_id = Some(port);
    }
    ParseOutcome::Consumed
}

/// VLAN id of a Q-BRIDGE index ("vid" or "timeMark.vid").
fn vlan_from_index(index: &str) -> Option<u16> {
    let vid: i64 = index.rsplit('.').next()?.parse().ok()?;
    is_valid_vlan_id(vid).then_some(vid as u16)
}

fn parse_vlan_current(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue, fdb: bool) -> ParseOutcome {
    let (Some(vid), Some(v)) = (vlan_from_index(idx), value.as_i64()) else {
        return ctx.malformed(oid, value);
    };
    if fdb {
        let fdb_id = v.max(0) as u32;
        ctx.device.vlan_or_insert(vid).fdb_index = fdb_id;
        ctx.fdb_to_vlan.insert(fdb_id, vid);
    } else {
        ctx.device.vlan_or_insert(vid).status = VlanStatus::from_code(v);
    }
    ParseOutcome::Consumed
}

enum StaticColumn {
    Name,
    Egress,
    Untagged,
}

fn parse_vlan_static(
    ctx: &mut WalkContext,
    oid: &str,
    idx: &str,
    value: &SnmpValue,
    column: StaticColumn,
) -> ParseOutcome {
    let (Some(vid), Some(bytes)) = (vlan_from_index(idx), value.as_bytes()) else {
        return ctx.malformed(oid, value);
    };
    let vlan = ctx.device.vlan_or_insert(vid);
    match column {
        StaticColumn::Name => {
            let name = String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string();
            if !name.is_empty() {
                vlan.name = name;
            }
        }
        StaticColumn::Egress => vlan.egress_ports = PortList::from_bytes(bytes),
        StaticColumn::Untagged => vlan.untagged_ports = PortList::from_bytes(bytes),
    }
    ParseOutcome::Consumed
}

fn parse_pvid(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let (Some(port), Some(vid)) = (single_index(idx), value.as_i64()) else {
        return ctx.malformed(oid, value);
    };
    if !is_valid_vlan_id(vid) {
        return ctx.malformed(oid, value);
    }
    let if_index = ctx.if_index_for_port(port);
    if ctx.vendor_untagged.contains(&if_index) {
        tracing::debug!("PVID for ifIndex {} ignored, set by vendor", if_index);
        return ParseOutcome::Consumed;
    }
    if let Some(iface) = ctx.device.interface_by_index_mut(if_index) {
        iface.untagged_vlan = vid as i32;
    }
    ParseOutcome::Consumed
}

fn learn(ctx: &mut WalkContext, port: u32, mac: MacAddress, vlan_id: u16) {
    // port 0 is the switch itself
    if port == 0 {
        return;
    }
    let if_index = ctx.if_index_for_port(port);
    match ctx.device.interface_by_index_mut(if_index) {
        Some(iface) => iface.add_learned_ethernet(EthernetAddress::new(mac, vlan_id)),
        None => tracing::debug!("Learned {} on unknown bridge port {}", mac, port),
    }
}

fn parse_qbridge_fdb(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let parsed = split_column(idx).and_then(|(fdb, mac)| Some((single_index(fdb)?, MacAddress::from_oid_index(mac)?)));
    let (Some((fdb_id, mac)), Some(port)) = (parsed, value.as_u32()) else {
        return ctx.malformed(oid, value);
    };
    let vid = ctx.vlan_for_fdb(fdb_id);
    learn(ctx, port, mac, vid);
    ParseOutcome::Consumed
}

fn parse_bridge_fdb(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let (Some(mac), Some(port)) = (MacAddress::from_oid_index(idx), value.as_u32()) else {
        return ctx.malformed(oid, value);
    };
    let vid = ctx.current_vlan.unwrap_or(0);
    learn(ctx, port, mac, vid);
    ParseOutcome::Consumed
}

fn parse_poe_port(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    if !matches!(column, "3" | "6" | "7") {
        return ParseOutcome::NotRecognized;
    }
    let (Some((pse, port)), Some(v)) = (PoePort::parse_index(rest), value.as_i64()) else {
        return ctx.malformed(oid, value);
    };
    match column {
        "3" => ctx.poe_port(pse, port).admin_enabled = v == 1,
        "6" => match PoeStatus::from_code(v) {
            Some(status) => ctx.poe_port(pse, port).detect_status = status,
            None => return ctx.malformed(oid, value),
        },
        _ => ctx.poe_port(pse, port).priority = u8::try_from(v).ok(),
    }
    ParseOutcome::Consumed
}

fn parse_poe_pse(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    if !matches!(column, "2" | "3" | "4" | "5") {
        return ParseOutcome::NotRecognized;
    }
    let (Some(id), Some(v)) = (single_index(rest), value.as_u32()) else {
        return ctx.malformed(oid, value);
    };
    match column {
        "2" => ctx.pse(id).max_power = v,
        "3" => match PseStatus::from_code(v as i64) {
            Some(status) => ctx.pse(id).status = status,
            None => return ctx.malformed(oid, value),
        },
        "4" => ctx.pse(id).power_consumed = v,
        _ => ctx.pse(id).threshold = v,
    }
    ParseOutcome::Consumed
}

/// "timeMark.localPort.remIndex" -> (local port, "localPort.remIndex").
fn lldp_key(index: &str) -> Option<(u32, String)> {
    let mut parts = index.split('.');
    let _time_mark = parts.next()?;
    let local: u32 = parts.next()?.parse().ok()?;
    let rem: u32 = parts.next()?.parse().ok()?;
    Some((local, format!("{}.{}", local, rem)))
}

fn lldp_entry<'a>(ctx: &'a mut WalkContext, local_port: u32, key: String) -> &'a mut LldpStaging {
    ctx.lldp.entry(key.clone()).or_insert_with(|| LldpStaging {
        local_port,
        neighbor: NeighborDevice::new(key),
        ..Default::default()
    })
}

fn parse_lldp_remote(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    let Ok(column) = column.parse::<u32>() else {
        return ParseOutcome::NotRecognized;
    };
    if !(4..=12).contains(&column) {
        return ParseOutcome::NotRecognized;
    }
    let Some((local_port, key)) = lldp_key(rest) else {
        return ctx.malformed(oid, value);
    };
    match column {
        4 | 6 => {
            let Some(code) = value.as_i64() else {
                return ctx.malformed(oid, value);
            };
            let entry = lldp_entry(ctx, local_port, key);
            if column == 4 {
                entry.neighbor.chassis_type = ChassisIdType::from_code(code);
            } else {
                entry.neighbor.port_type = PortIdType::from_code(code);
            }
        }
        _ => {
            let Some(bytes) = value.as_bytes() else {
                return ctx.malformed(oid, value);
            };
            let text = String::from_utf8_lossy(bytes).trim_end_matches('\0').trim().to_string();
            let entry = lldp_entry(ctx, local_port, key);
            match column {
                5 => entry.chassis_raw = bytes.to_vec(),
                7 => entry.port_raw = bytes.to_vec(),
                8 => entry.neighbor.port_description = text,
                9 => entry.neighbor.sys_name = text,
                10 => entry.neighbor.sys_description = text,
                11 => entry.neighbor.capabilities_supported = LldpCapabilities::from_octets(bytes),
                _ => entry.neighbor.capabilities_enabled = LldpCapabilities::from_octets(bytes),
            }
        }
    }
    ParseOutcome::Consumed
}

/// Management address, encoded in the index as
/// timeMark.localPort.remIndex.family.length.octets...
fn parse_lldp_man_addr(ctx: &mut WalkContext, oid: &str, idx: &str) -> ParseOutcome {
    let parts: Vec<&str> = idx.split('.').collect();
    let octets: Option<Vec<u8>> = parts.iter().skip(5).map(|p| p.parse().ok()).collect();
    let (Some((local_port, key)), Some(octets)) = (lldp_key(idx), octets) else {
        return ctx.malformed(oid, &SnmpValue::Null);
    };
    let address = match (parts.get(3).copied(), octets.len()) {
        (Some("1"), 4) => Some(IpAddr::V4(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))),
        (Some("2"), 16) => <[u8; 16]>::try_from(octets.as_slice()).ok().map(|o| IpAddr::V6(Ipv6Addr::from(o))),
        _ => None,
    };
    if let Some(address) = address {
        let entry = lldp_entry(ctx, local_port, key);
        if entry.neighbor.management_address.is_none() {
            entry.neighbor.management_address = Some(address);
        }
    }
    ParseOutcome::Consumed
}

fn add_arp(ctx: &mut WalkContext, if_index: u32, ip: IpAddr, mac: MacAddress) {
    let mut entry = EthernetAddress::new(mac, 0);
    entry.set_ip(ip);
    match ctx.device.interface_by_index_mut(if_index) {
        Some(iface) => {
            iface.arp.insert(ip.to_string(), entry);
        }
        None => tracing::debug!("ARP entry {} on unknown ifIndex {}", ip, if_index),
    }
}

fn parse_arp_media(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let parts: Vec<&str> = idx.split('.').collect();
    let ip: Option<Vec<u8>> = parts.iter().skip(1).map(|p| p.parse().ok()).collect();
    let if_index = parts.first().and_then(|p| single_index(p));
    let mac = value.as_bytes().and_then(MacAddress::from_slice);
    match (if_index, ip, mac) {
        (Some(if_index), Some(ip), Some(mac)) if ip.len() == 4 => {
            add_arp(ctx, if_index, IpAddr::V4(Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3])), mac);
            ParseOutcome::Consumed
        }
        _ => ctx.malformed(oid, value),
    }
}

fn parse_arp_physical(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let parts: Vec<&str> = idx.split('.').collect();
    let if_index = parts.first().and_then(|p| single_index(p));
    let octets: Option<Vec<u8>> = parts.iter().skip(3).map(|p| p.parse().ok()).collect();
    let mac = value.as_bytes().and_then(MacAddress::from_slice);
    let (Some(if_index), Some(octets), Some(mac)) = (if_index, octets, mac) else {
        return ctx.malformed(oid, value);
    };
    let ip = match (parts.get(1).copied(), octets.len()) {
        (Some("1"), 4) => IpAddr::V4(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])),
        (Some("2"), 16) => match <[u8; 16]>::try_from(octets.as_slice()) {
            Ok(o) => IpAddr::V6(Ipv6Addr::from(o)),
            Err(_) => return ctx.malformed(oid, value),
        },
        _ => return ctx.malformed(oid, value),
    };
    add_arp(ctx, if_index, ip, mac);
    ParseOutcome::Consumed
}

fn parse_lacp(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let (Some(member), Some(aggregator)) = (single_index(idx), value.as_u32()) else {
        return ctx.malformed(oid, value);
    };
    if aggregator == 0 || aggregator == member {
        return ParseOutcome::Consumed;
    }
    if ctx.device.interface_by_index(member).is_none() || ctx.device.interface_by_index(aggregator).is_none() {
        tracing::debug!("LACP member {} of {} not in interface table", member, aggregator);
        return ParseOutcome::Consumed;
    }
    let member_ok = ctx
        .device
        .interface_by_index_mut(member)
        .map(|i| i.set_lacp_member(aggregator))
        .unwrap_or(false);
    let aggregator_ok = member_ok
        && ctx
            .device
            .interface_by_index_mut(aggregator)
            .map(|i| i.add_lacp_member(member))
            .unwrap_or(false);
    if !aggregator_ok {
        ctx.warn(
            LogCategory::Interface,
            LogAction::LacpConflict,
            format!("ifIndex {} cannot be both LACP member and aggregator (aggregator {})", member, aggregator),
        );
    }
    ParseOutcome::Consumed
}

fn parse_entity(ctx: &mut WalkContext, oid: &str, idx: &str, value: &SnmpValue) -> ParseOutcome {
    let Some((column, rest)) = split_column(idx) else {
        return ParseOutcome::NotRecognized;
    };
    if !matches!(column, "2" | "5" | "10" | "11" | "13") {
        return ParseOutcome::NotRecognized;
    }
    let Some(index) = single_index(rest) else {
        return ctx.malformed(oid, value);
    };
    if column == "5" {
        let Some(class) = value.as_i64() else {
            return ctx.malformed(oid, value);
        };
        entity(ctx, index).class = class;
        return ParseOutcome::Consumed;
    }
    let Some(text) = text_of(value) else {
        return ctx.malformed(oid, value);
    };
    let member = entity(ctx, index);
    match column {
        "2" => member.description = text,
        "10" => member.version = text,
        "11" => member.serial = text,
        _ => member.model = text,
    }
    ParseOutcome::Consumed
}

fn entity(ctx: &mut WalkContext, index: u32) -> &mut StackMember {
    ctx.device.stack_members.entry(index).or_insert_with(|| StackMember {
        index,
        ..Default::default()
    })
}

/// Borrowed view over one connector's transport, dialect and staging
/// context, handed to dialect hooks.
pub struct SnmpSession<'a> {
    pub transport: &'a mut dyn SnmpTransport,
    pub dialect: &'a dyn VendorDialect,
    pub ctx: &'a mut WalkContext,
    pub generic: &'a mut GenericParser,
}

impl SnmpSession<'_> {
    /// Walk a branch and feed every row through the parse chain. Returns
    /// the number of rows walked.
    pub async fn walk_branch(&mut self, branch: &str) -> Result<usize> {
        let rows = self.transport.walk(branch).await?;
        Ok(self.feed(&rows))
    }

    /// Same as `walk_branch`, against another (VLAN-scoped) transport.
    pub async fn walk_scoped(&mut self, scoped: &mut dyn SnmpTransport, branch: &str) -> Result<usize> {
        let rows = scoped.walk(branch).await?;
        Ok(self.feed(&rows))
    }

    pub fn feed(&mut self, rows: &[(String, SnmpValue)]) -> usize {
        for (oid, value) in rows {
            parse_chain(self.dialect, self.generic, self.ctx, oid, value);
        }
        rows.len()
    }

    pub async fn get(&mut self, oid: &str) -> Result<Option<SnmpValue>> {
        self.transport.get(oid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interface, VLAN_UNSET};

    fn ctx_with_ports() -> WalkContext {
        let mut device = DeviceSnapshot::default();
        for i in [1u32, 2, 3] {
            device.insert_interface(Interface::with_index(i));
        }
        WalkContext::new("test", device)
    }

    #[test]
    fn test_if_table_columns() {
        let mut ctx = WalkContext::new("test", DeviceSnapshot::default());
        let mut p = GenericParser::new();
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.2.5", &SnmpValue::string("Ethernet5"));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.3.5", &SnmpValue::Integer(6));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.5.5", &SnmpValue::Counter32(1_000_000_000));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.7.5", &SnmpValue::Integer(1));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.8.5", &SnmpValue::Integer(2));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.31.1.1.1.1.5", &SnmpValue::string("Gi0/5"));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.31.1.1.1.18.5", &SnmpValue::string("printer"));

        let iface = ctx.device.interface("5").unwrap();
        assert_eq!(iface.name, "Gi0/5");
        assert_eq!(iface.if_type, InterfaceType::Ethernet);
        assert_eq!(iface.speed, 1000);
        assert!(iface.admin_status);
        assert!(!iface.oper_status);
        assert_eq!(iface.description, "printer");
        assert_eq!(iface.untagged_vlan, VLAN_UNSET);
        assert_eq!(p.consumed(), 7);
    }

    #[test]
    fn test_malformed_value_is_warning() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        let outcome = p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.7.1", &SnmpValue::string("up"));
        assert_eq!(outcome, ParseOutcome::Consumed);
        assert_eq!(ctx.events.len(), 1);
        assert_eq!(ctx.events[0].action, LogAction::OidParseWarning);
        assert!(ctx.events[0].description.contains("ifAdminStatus.1"));
    }

    #[test]
    fn test_unknown_columns_fall_through() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        // ifInOctets
        assert_eq!(
            p.parse_oid(&mut ctx, "1.3.6.1.2.1.2.2.1.10.1", &SnmpValue::Counter32(5)),
            ParseOutcome::NotRecognized
        );
        assert_eq!(
            p.parse_oid(&mut ctx, "1.3.6.1.4.1.9.9.46.1.3.1.1.2.1.1", &SnmpValue::Integer(1)),
            ParseOutcome::NotRecognized
        );
        assert_eq!(p.consumed(), 0);
    }

    #[test]
    fn test_pvid_respects_vendor_untagged() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        assert!(ctx.set_vendor_untagged(2, 30));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.17.7.1.4.5.1.1.2", &SnmpValue::Unsigned32(1));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.17.7.1.4.5.1.1.3", &SnmpValue::Unsigned32(1));
        assert_eq!(ctx.device.interface("2").unwrap().untagged_vlan, 30);
        assert_eq!(ctx.device.interface("3").unwrap().untagged_vlan, 1);
    }

    #[test]
    fn test_fdb_attribution_via_bridge_ports() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.17.1.4.1.2.7", &SnmpValue::Integer(3));
        p.parse_oid(&mut ctx, "1.3.6.1.2.1.17.7.1.4.2.1.3.0.20", &SnmpValue::Unsigned32(5));
        p.parse_oid(
            &mut ctx,
            "1.3.6.1.2.1.17.7.1.2.2.1.2.5.0.28.115.170.187.204",
            &SnmpValue::Integer(7),
        );
        let iface = ctx.device.interface("3").unwrap();
        assert_eq!(iface.port_id, Some(7));
        let learned = iface.eth.get("00:1c:73:aa:bb:cc").unwrap();
        assert_eq!(learned.vlan_id, 20);
    }

    #[test]
    fn test_lldp_neighbor_staging() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        p.parse_oid(&mut ctx, "1.0.8802.1.1.2.1.4.1.1.4.0.2.1", &SnmpValue::Integer(4));
        p.parse_oid(
            &mut ctx,
            "1.0.8802.1.1.2.1.4.1.1.5.0.2.1",
            &SnmpValue::OctetString(vec![0, 0x1c, 0x73, 1, 2, 3]),
        );
        p.parse_oid(&mut ctx, "1.0.8802.1.1.2.1.4.1.1.9.0.2.1", &SnmpValue::string("core-sw"));
        p.parse_oid(&mut ctx, "1.0.8802.1.1.2.1.4.1.1.12.0.2.1", &SnmpValue::OctetString(vec![0x28]));
        p.parse_oid(&mut ctx, "1.0.8802.1.1.2.1.4.2.1.3.0.2.1.1.4.10.0.0.9", &SnmpValue::Integer(2));

        let staged = ctx.lldp.get("2.1").unwrap();
        assert_eq!(staged.local_port, 2);
        assert_eq!(staged.neighbor.chassis_type, ChassisIdType::MacAddress);
        assert_eq!(staged.chassis_raw.len(), 6);
        assert_eq!(staged.neighbor.sys_name, "core-sw");
        assert!(staged.neighbor.capabilities_enabled.contains(LldpCapabilities::BRIDGE));
        assert!(staged.neighbor.capabilities_enabled.contains(LldpCapabilities::ROUTER));
        assert_eq!(staged.neighbor.management_address, Some("10.0.0.9".parse::<IpAddr>().unwrap()));
    }

    #[test]
    fn test_lacp_roles_and_conflict() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        p.parse_oid(&mut ctx, "1.2.840.10006.300.43.1.2.1.1.13.1", &SnmpValue::Integer(3));
        p.parse_oid(&mut ctx, "1.2.840.10006.300.43.1.2.1.1.13.2", &SnmpValue::Integer(3));
        assert_eq!(ctx.device.interface("3").unwrap().lacp_members, vec![1, 2]);
        // the aggregator cannot become a member
        p.parse_oid(&mut ctx, "1.2.840.10006.300.43.1.2.1.1.13.3", &SnmpValue::Integer(1));
        assert_eq!(ctx.events.last().unwrap().action, LogAction::LacpConflict);
    }

    #[test]
    fn test_arp_entries() {
        let mut ctx = ctx_with_ports();
        let mut p = GenericParser::new();
        p.parse_oid(
            &mut ctx,
            "1.3.6.1.2.1.4.22.1.2.1.192.168.1.10",
            &SnmpValue::OctetString(vec![0xaa, 0xbb, 0xcc, 0, 0, 1]),
        );
        let arp = &ctx.device.interface("1").unwrap().arp;
        assert!(arp.contains_key("192.168.1.10"));
    }
}
