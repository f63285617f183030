//! Connector abstraction: one session against one switch.
//!
//! A connector is created by the dispatcher after the identity probe, then
//! driven through the loading phases (basic info, client data, hardware
//! details) and optionally asked to apply writes. Every write is
//! capability-gated before anything is sent to the device.

mod cli;
mod dummy;
mod parser;
mod snmp;
mod state;
pub mod vendors;

pub use cli::CliConnector;
pub use dummy::DummyConnector;
pub use parser::{parse_chain, GenericParser, ParseOutcome, SnmpSession, WalkContext};
pub use snmp::SnmpConnector;
pub use state::SessionState;
pub use vendors::VendorDialect;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{CapabilityOverrides, DeviceSnapshot, LogEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    Generic,
    Cisco,
    Procurve,
    Comware,
    Juniper,
    Arista,
    Dell,
    Netgear,
    ArubaCx,
    Cli,
    Dummy,
}

impl ConnectorKind {
    pub fn vendor_name(&self) -> &'static str {
        match self {
            ConnectorKind::Generic => "Generic SNMP",
            ConnectorKind::Cisco => "Cisco",
            ConnectorKind::Procurve => "HP/Aruba Procurve",
            ConnectorKind::Comware => "HPE Comware",
            ConnectorKind::Juniper => "Juniper",
            ConnectorKind::Arista => "Arista",
            ConnectorKind::Dell => "Dell",
            ConnectorKind::Netgear => "Netgear",
            ConnectorKind::ArubaCx => "Aruba AOS-CX",
            ConnectorKind::Cli => "CLI (SSH)",
            ConnectorKind::Dummy => "Dummy",
        }
    }
}

impl std::fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.vendor_name())
    }
}

/// Session progress. Client data needs basic info; hardware details only
/// need a probed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Probed,
    BasicLoaded,
    ClientDataLoaded,
    HardwareLoaded,
}

/// Changes a connector may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Description,
    AdminStatus,
    PoeStatus,
    UntaggedVlan,
    SaveConfig,
    RunCommand,
}

impl WriteOp {
    pub fn label(&self) -> &'static str {
        match self {
            WriteOp::Description => "Changing interface description",
            WriteOp::AdminStatus => "Changing interface admin status",
            WriteOp::PoeStatus => "Changing PoE status",
            WriteOp::UntaggedVlan => "Changing interface VLAN",
            WriteOp::SaveConfig => "Saving the running config",
            WriteOp::RunCommand => "Running CLI commands",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_change_description: bool,
    pub can_change_admin_status: bool,
    pub can_change_poe_status: bool,
    pub can_change_vlan: bool,
    pub can_save_config: bool,
    pub can_run_commands: bool,
    /// Set when the device is read-only; holds the reason shown to users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<String>,
}

impl Capabilities {
    /// Every write supported, nothing saved (the generic SNMP profile).
    pub fn writable(can_save_config: bool) -> Self {
        Self {
            can_change_description: true,
            can_change_admin_status: true,
            can_change_poe_status: true,
            can_change_vlan: true,
            can_save_config,
            can_run_commands: false,
            read_only: None,
        }
    }

    pub fn read_only(reason: impl Into<String>) -> Self {
        Self {
            read_only: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Narrow vendor defaults with operator restrictions. Overrides can only
    /// remove capabilities. `has_ssh` enables CLI commands.
    pub fn restrict(mut self, overrides: &CapabilityOverrides, read_only: bool, has_ssh: bool) -> Self {
        fn and(current: bool, restriction: Option<bool>) -> bool {
            current && restriction.unwrap_or(true)
        }
        self.can_change_description = and(self.can_change_description, overrides.can_change_description);
        self.can_change_admin_status = and(self.can_change_admin_status, overrides.can_change_admin_status);
        self.can_change_poe_status = and(self.can_change_poe_status, overrides.can_change_poe_status);
        self.can_change_vlan = and(self.can_change_vlan, overrides.can_change_vlan);
        self.can_save_config = and(self.can_save_config, overrides.can_save_config);
        self.can_run_commands = self.can_run_commands || has_ssh;
        if read_only && self.read_only.is_none() {
            self.read_only = Some("Switch is configured as Read-Only".to_string());
        }
        if self.read_only.is_some() {
            self.can_change_description = false;
            self.can_change_admin_status = false;
            self.can_change_poe_status = false;
            self.can_change_vlan = false;
            self.can_save_config = false;
        }
        self
    }

    pub fn allows(&self, op: WriteOp) -> bool {
        match op {
            WriteOp::Description => self.can_change_description,
            WriteOp::AdminStatus => self.can_change_admin_status,
            WriteOp::PoeStatus => self.can_change_poe_status,
            WriteOp::UntaggedVlan => self.can_change_vlan,
            WriteOp::SaveConfig => self.can_save_config,
            WriteOp::RunCommand => self.can_run_commands,
        }
    }
}

/// One switch session. Implementations are bound to a single descriptor
/// and are not shared between concurrent requests.
#[async_trait]
pub trait Connector: Send {
    fn kind(&self) -> ConnectorKind;

    fn capabilities(&self) -> &Capabilities;

    fn phase(&self) -> Phase;

    /// Current device model. Only ever reflects fully completed phases.
    fn device(&self) -> &DeviceSnapshot;

    fn events(&self) -> &[LogEvent];

    /// Hand the collected events to the caller's activity log.
    fn take_events(&mut self) -> Vec<LogEvent>;

    /// Forget loaded data and restart from `Probed`.
    fn reload(&mut self);

    /// Interfaces and VLANs. Idempotent within a session.
    async fn get_basic_info(&mut self) -> Result<()>;

    /// Learned ethernet addresses, ARP and LLDP neighbors.
    async fn get_client_data(&mut self) -> Result<()>;

    /// Stack members, serial numbers and other "more info" facts.
    async fn get_hardware_details(&mut self) -> Result<()>;

    async fn set_interface_description(&mut self, key: &str, description: &str) -> Result<()>;

    async fn set_interface_admin_status(&mut self, key: &str, up: bool) -> Result<()>;

    async fn set_interface_poe_status(&mut self, key: &str, enabled: bool) -> Result<()>;

    async fn set_interface_untagged_vlan(&mut self, key: &str, vlan_id: u16) -> Result<()>;

    async fn save_running_config(&mut self) -> Result<()>;

    /// Run one CLI command over the descriptor's SSH profile.
    async fn run_command(&mut self, command: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_remove() {
        let overrides = CapabilityOverrides {
            can_change_vlan: Some(false),
            can_save_config: Some(true),
            ..Default::default()
        };
        let caps = Capabilities::writable(false).restrict(&overrides, false, false);
        assert!(caps.can_change_description);
        assert!(!caps.can_change_vlan);
        assert!(!caps.can_save_config);
        assert!(!caps.can_run_commands);
    }

    #[test]
    fn test_read_only_descriptor_disables_writes_keeps_commands() {
        let caps = Capabilities::writable(true).restrict(&CapabilityOverrides::default(), true, true);
        assert!(!caps.allows(WriteOp::Description));
        assert!(!caps.allows(WriteOp::SaveConfig));
        assert!(caps.allows(WriteOp::RunCommand));
        assert!(caps.read_only.is_some());
    }

    #[test]
    fn test_vendor_read_only_reason_is_kept() {
        let caps = Capabilities::read_only("Juniper SNMP access is Read-Only")
            .restrict(&CapabilityOverrides::default(), true, false);
        assert_eq!(caps.read_only.as_deref(), Some("Juniper SNMP access is Read-Only"));
    }
}
