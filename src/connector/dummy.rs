use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};

use super::{Capabilities, Connector, ConnectorKind, Phase, SessionState, WriteOp};
use crate::error::{Error, Result};
use crate::models::{
    entity_class, ChassisIdType, DeviceSnapshot, EthernetAddress, Interface, InterfaceType, LldpCapabilities,
    LogAction, LogCategory, LogEvent, MacAddress, NeighborDevice, PoePort, PoePse, PoeStatus, PortList, PortIdType,
    PseStatus, StackMember, SwitchDescriptor, SystemInfo, Vlan,
};
use crate::settings::ConnectorSettings;

/// Fixed in-memory switch. Every phase succeeds and every write is applied
/// to the model only.
pub struct DummyConnector {
    state: SessionState,
}

fn port(key: &str, index: u32, speed: u32, up: bool, untagged_vlan: u16) -> Interface {
    let mut iface = Interface::new(key, index);
    iface.name = key.to_string();
    iface.if_type = InterfaceType::Ethernet;
    iface.admin_status = true;
    iface.oper_status = up;
    iface.speed = speed;
    iface.mtu = 1500;
    iface.port_id = Some(index);
    iface.untagged_vlan = untagged_vlan as i32;
    iface
}

fn vlan(id: u16, name: &str, egress: &[usize], untagged: &[usize]) -> Vlan {
    let mut vlan = Vlan::new(id);
    vlan.name = name.to_string();
    vlan.egress_ports = PortList::with_len(1);
    vlan.untagged_ports = PortList::with_len(1);
    for p in egress {
        vlan.egress_ports.set(*p, true);
    }
    for p in untagged {
        vlan.untagged_ports.set(*p, true);
    }
    vlan
}

fn fixture(system: SystemInfo) -> DeviceSnapshot {
    let mut device = DeviceSnapshot::new(system);

    device.insert_interface(port("eth0/0/0", 1, 10, true, 1));
    device.insert_interface(port("eth0/0/1", 2, 1000, false, 10));

    let mut eth2 = port("eth2", 3, 1000, true, 10);
    eth2.poe_entry = Some(PoePort {
        admin_enabled: true,
        detect_status: PoeStatus::Delivering,
        power_consumed: 4500,
        power_available: 15000,
        max_power_consumed: 6200,
        ..PoePort::new(1, 3)
    });
    device.insert_interface(eth2);

    let mut eth3 = port("eth3", 4, 10000, true, 1);
    eth3.add_tagged_vlan(10);
    eth3.add_tagged_vlan(20);
    device.insert_interface(eth3);

    for (vid, name, egress, untagged) in [
        (1, "default", &[1usize, 4][..], &[1usize, 4][..]),
        (10, "office", &[2, 3, 4][..], &[2, 3][..]),
        (20, "voice", &[4][..], &[][..]),
    ] {
        device.vlans.insert(vid, vlan(vid, name, egress, untagged));
    }
    for index in 1..=4 {
        device.bridge_ports.insert(index, index);
    }
    device.pses.insert(
        1,
        PoePse {
            max_power: 370,
            power_consumed: 5,
            status: PseStatus::On,
            threshold: 90,
            ..PoePse::new(1)
        },
    );
    device
}

impl DummyConnector {
    pub fn new(descriptor: SwitchDescriptor, settings: ConnectorSettings) -> Self {
        let system = SystemInfo {
            name: descriptor.name.clone(),
            description: "Dummy switch for testing".to_string(),
            vendor: ConnectorKind::Dummy.vendor_name().to_string(),
            ..Default::default()
        };
        Self {
            state: SessionState::new(descriptor, settings, Capabilities::writable(true), system),
        }
    }

    fn write(&mut self, op: WriteOp, key: &str) -> Result<&mut Interface> {
        self.state.check_write(op)?;
        self.state
            .device
            .interface_mut(key)
            .ok_or_else(|| Error::not_found("Interface", key))
    }
}

#[async_trait]
impl Connector for DummyConnector {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Dummy
    }

    fn capabilities(&self) -> &Capabilities {
        &self.state.capabilities
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn device(&self) -> &DeviceSnapshot {
        &self.state.device
    }

    fn events(&self) -> &[LogEvent] {
        &self.state.events
    }

    fn take_events(&mut self) -> Vec<LogEvent> {
        std::mem::take(&mut self.state.events)
    }

    fn reload(&mut self) {
        self.state.reload();
    }

    async fn get_basic_info(&mut self) -> Result<()> {
        if self.state.basic_loaded() {
            return Ok(());
        }
        let device = fixture(self.state.device.system.clone());
        self.state.commit_basic(device);
        Ok(())
    }

    async fn get_client_data(&mut self) -> Result<()> {
        self.state.require_basic()?;
        let mut device = self.state.device.clone();
        device.clear_client_data();

        if let Some(iface) = device.interface_mut("eth0/0/0") {
            let mut learned = EthernetAddress::new(MacAddress::new([0x00, 0x04, 0xf2, 0x12, 0x34, 0x56]), 1);
            learned.set_ip(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 50)));
            iface.arp.insert(learned.address.to_string(), learned.clone());
            iface.add_learned_ethernet(learned);
        }
        if let Some(iface) = device.interface_mut("eth3") {
            let mut neighbor = NeighborDevice::new("4.1");
            neighbor.chassis_type = ChassisIdType::MacAddress;
            neighbor.set_chassis_id(&[0x00, 0x1c, 0x73, 0x00, 0x00, 0x01]);
            neighbor.port_type = PortIdType::InterfaceName;
            neighbor.set_port_id(b"Ethernet48");
            neighbor.sys_name = "core-1".to_string();
            neighbor.capabilities_supported = LldpCapabilities::BRIDGE | LldpCapabilities::ROUTER;
            neighbor.capabilities_enabled = LldpCapabilities::BRIDGE;
            iface.add_neighbor(neighbor);
        }
        self.state.commit_client_data(device);
        Ok(())
    }

    async fn get_hardware_details(&mut self) -> Result<()> {
        self.state.require_probed()?;
        let mut device = self.state.device.clone();
        device.stack_members.clear();
        device.stack_members.insert(
            1,
            StackMember {
                index: 1,
                class: entity_class::CHASSIS,
                serial: "DUMMY0001".to_string(),
                model: "Dummy Switch 4".to_string(),
                version: "1.0".to_string(),
                description: "Dummy 4-port switch".to_string(),
            },
        );
        device.more_info.insert("Serial".to_string(), "DUMMY0001".to_string());
        device.more_info.insert("Model".to_string(), "Dummy Switch 4".to_string());
        self.state.commit_hardware(device);
        Ok(())
    }

    async fn set_interface_description(&mut self, key: &str, description: &str) -> Result<()> {
        self.write(WriteOp::Description, key)?.description = description.to_string();
        self.state.log(LogEvent::info(
            LogCategory::Interface,
            LogAction::ChangeDescription,
            format!("Description of {} changed to '{}'", key, description),
        ));
        Ok(())
    }

    async fn set_interface_admin_status(&mut self, key: &str, up: bool) -> Result<()> {
        let iface = self.write(WriteOp::AdminStatus, key)?;
        iface.admin_status = up;
        if !up {
            iface.oper_status = false;
        }
        self.state.log(LogEvent::info(
            LogCategory::Interface,
            LogAction::ChangeAdminStatus,
            format!("{} set {}", key, if up { "up" } else { "down" }),
        ));
        Ok(())
    }

    async fn set_interface_poe_status(&mut self, key: &str, enabled: bool) -> Result<()> {
        let iface = self.write(WriteOp::PoeStatus, key)?;
        let Some(entry) = iface.poe_entry.as_mut() else {
            return Err(Error::unsupported(format!("{} has no PoE", key)));
        };
        entry.admin_enabled = enabled;
        self.state.log(LogEvent::info(
            LogCategory::Poe,
            LogAction::ChangePoeStatus,
            format!("PoE on {} {}", key, if enabled { "enabled" } else { "disabled" }),
        ));
        Ok(())
    }

    async fn set_interface_untagged_vlan(&mut self, key: &str, vlan_id: u16) -> Result<()> {
        self.state.check_write(WriteOp::UntaggedVlan)?;
        self.state.interface(key)?;
        self.state.vlan(vlan_id)?;
        self.state.device.apply_untagged_vlan(key, vlan_id);
        self.state.log(LogEvent::info(
            LogCategory::Vlan,
            LogAction::ChangeVlan,
            format!("Untagged VLAN of {} changed to {}", key, vlan_id),
        ));
        Ok(())
    }

    async fn save_running_config(&mut self) -> Result<()> {
        self.state.check_write(WriteOp::SaveConfig)?;
        self.state.log(LogEvent::info(
            LogCategory::Config,
            LogAction::SaveConfig,
            "Running config saved",
        ));
        Ok(())
    }

    async fn run_command(&mut self, command: &str) -> Result<String> {
        self.state.check_write(WriteOp::RunCommand)?;
        Ok(format!("{}\n% dummy device, nothing executed\n", command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::CapabilityOverrides;
    use tokio_test::assert_ok;

    fn dummy() -> DummyConnector {
        DummyConnector::new(SwitchDescriptor::new("lab", "127.0.0.1"), ConnectorSettings::default())
    }

    #[tokio::test]
    async fn test_fixture_interfaces() {
        let mut conn = dummy();
        assert_ok!(conn.get_basic_info().await);

        let names: Vec<&str> = conn.device().interfaces().map(|i| i.name.as_str()).collect();
        assert_eq!(names.len(), 4);
        for name in ["eth0/0/0", "eth0/0/1", "eth2", "eth3"] {
            assert!(names.contains(&name), "missing {}", name);
        }

        let first = conn.device().interface("eth0/0/0").unwrap();
        assert!(first.admin_status);
        assert!(first.oper_status);
        assert_eq!(first.speed, 10);

        let poe = conn.device().interface("eth2").unwrap().poe_entry.as_ref().unwrap();
        assert_eq!(poe.power_available, 15000);
        assert_eq!(poe.power_consumed, 4500);
    }

    #[tokio::test]
    async fn test_writes_apply_to_model() {
        let mut conn = dummy();
        assert_ok!(conn.get_basic_info().await);
        assert_ok!(conn.set_interface_description("eth3", "uplink").await);
        assert_ok!(conn.set_interface_admin_status("eth0/0/1", false).await);
        assert_ok!(conn.set_interface_poe_status("eth2", false).await);
        assert_ok!(conn.set_interface_untagged_vlan("eth0/0/0", 10).await);
        assert_ok!(conn.save_running_config().await);

        let device = conn.device();
        assert_eq!(device.interface("eth3").unwrap().description, "uplink");
        assert!(!device.interface("eth0/0/1").unwrap().admin_status);
        assert!(!device.interface("eth2").unwrap().poe_entry.as_ref().unwrap().admin_enabled);
        assert_eq!(device.interface("eth0/0/0").unwrap().untagged_vlan, 10);
        assert!(device.vlans[&10].untagged_ports.get(1));
        assert!(!device.vlans[&1].untagged_ports.get(1));
        assert_eq!(conn.events().len(), 5);

        let err = conn.set_interface_poe_status("eth3", true).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        let err = conn.set_interface_untagged_vlan("eth3", 999).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_phases_and_overrides() {
        let mut conn = dummy();
        assert_eq!(conn.get_client_data().await.unwrap_err().kind, ErrorKind::InvalidState);
        assert_ok!(conn.get_basic_info().await);
        assert_ok!(conn.get_client_data().await);
        assert_ok!(conn.get_hardware_details().await);
        assert_eq!(conn.phase(), Phase::HardwareLoaded);
        assert_eq!(conn.device().ethernet_count(), 1);
        assert_eq!(conn.device().neighbor_count(), 1);

        let mut descriptor = SwitchDescriptor::new("lab", "127.0.0.1");
        descriptor.capability_overrides = CapabilityOverrides {
            can_change_vlan: Some(false),
            ..Default::default()
        };
        let mut conn = DummyConnector::new(descriptor, ConnectorSettings::default());
        assert_ok!(conn.get_basic_info().await);
        let err = conn.set_interface_untagged_vlan("eth0/0/0", 10).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        assert_eq!(conn.device().interface("eth0/0/0").unwrap().untagged_vlan, 1);
    }
}
