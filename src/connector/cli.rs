use async_trait::async_trait;
use regex_lite::Regex;

use super::{Capabilities, Connector, ConnectorKind, Phase, SessionState, WriteOp};
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, Interface, LogAction, LogCategory, LogEvent, SwitchDescriptor, SystemInfo};
use crate::settings::ConnectorSettings;
use crate::transport::CommandTransport;

const SHOW_DESCRIPTION: &str = "show interfaces description";
const SHOW_TERSE: &str = "show interfaces terse";
const SHOW_VERSION: &str = "show version";

/// Connector for devices reachable over SSH only. Reads what the CLI
/// tables give, never writes configuration; arbitrary commands go through
/// `run_command`.
pub struct CliConnector {
    state: SessionState,
    shell: Box<dyn CommandTransport>,
    junos: bool,
}

impl CliConnector {
    pub fn new(descriptor: SwitchDescriptor, settings: ConnectorSettings, shell: Box<dyn CommandTransport>) -> Self {
        let device_type = descriptor
            .ssh
            .as_ref()
            .map(|ssh| ssh.device_type.to_ascii_lowercase())
            .unwrap_or_default();
        let system = SystemInfo {
            name: descriptor.name.clone(),
            vendor: if device_type.is_empty() {
                ConnectorKind::Cli.vendor_name().to_string()
            } else {
                device_type.clone()
            },
            ..Default::default()
        };
        Self {
            state: SessionState::new(descriptor, settings, Capabilities::default(), system),
            shell,
            junos: device_type.contains("junos") || device_type.contains("juniper"),
        }
    }

    fn unsupported(&self, op: WriteOp) -> Result<()> {
        self.state.check_write(op)?;
        Err(Error::unsupported(format!("{} is not supported over the CLI driver", op.label())))
    }
}

/// Cisco IOS / EOS / Comware style description table:
/// `Interface  Status  Protocol  Description`.
fn parse_description_table(output: &str) -> Vec<Interface> {
    let Some(row) = Regex::new(r"^(\S+)\s+(admin down|down|up|deleted)\s+(up|down|notpresent|lowerlayerdown)\s*(.*)$").ok()
    else {
        return Vec::new();
    };
    output
        .lines()
        .filter_map(|line| row.captures(line.trim_end()))
        .filter(|caps| &caps[1] != "Interface")
        .enumerate()
        .map(|(i, caps)| {
            let mut iface = Interface::new(&caps[1], i as u32 + 1);
            iface.name = caps[1].to_string();
            iface.admin_status = &caps[2] != "admin down" && &caps[2] != "deleted";
            iface.oper_status = &caps[3] == "up";
            iface.description = caps[4].trim().to_string();
            iface
        })
        .collect()
}

/// Junos `show interfaces terse`. Logical units (`ge-0/0/0.0`) are folded
/// into their physical interface.
fn parse_terse_table(output: &str) -> Vec<Interface> {
    let Some(row) = Regex::new(r"^(\S+)\s+(up|down)\s+(up|down)").ok() else {
        return Vec::new();
    };
    output
        .lines()
        .filter_map(|line| row.captures(line))
        .filter(|caps| !caps[1].contains('.'))
        .enumerate()
        .map(|(i, caps)| {
            let mut iface = Interface::new(&caps[1], i as u32 + 1);
            iface.name = caps[1].to_string();
            iface.admin_status = &caps[2] == "up";
            iface.oper_status = &caps[3] == "up";
            iface
        })
        .collect()
}

/// Facts worth showing from `show version`.
fn parse_version(output: &str) -> Vec<(&'static str, String)> {
    let patterns: [(&'static str, &str); 5] = [
        ("Software version", r"(?i)(?:^Junos:\s*|,\s*Version\s+|^Software image version:\s*)([^\s,]+)"),
        ("Model", r"(?im)^Model(?: number)?\s*:\s*(\S+)"),
        ("Serial", r"(?im)^(?:System serial number|Serial number|Processor board ID)\s*:?\s*(\S+)"),
        ("Uptime", r"(?im)uptime(?: is|:)\s*(.+)$"),
        ("Hostname", r"(?im)^Hostname:\s*(\S+)"),
    ];
    let mut facts = Vec::new();
    for (label, pattern) in patterns {
        let Some(re) = Regex::new(pattern).ok() else {
            continue;
        };
        if let Some(caps) = output.lines().find_map(|line| re.captures(line.trim())) {
            facts.push((label, caps[1].trim().to_string()));
        }
    }
    facts
}

#[async_trait]
impl Connector for CliConnector {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Cli
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
        let (command, parse): (&str, fn(&str) -> Vec<Interface>) = if self.junos {
            (SHOW_TERSE, parse_terse_table)
        } else {
            (SHOW_DESCRIPTION, parse_description_table)
        };
        let output = match self.shell.run(command).await {
            Ok(output) => output,
            Err(err) => {
                self.state.phase_failed("Loading interfaces", &err);
                return Err(err);
            }
        };
        let mut device = DeviceSnapshot::new(self.state.device.system.clone());
        for iface in parse(&output) {
            device.insert_interface(iface);
        }
        if device.interface_count() == 0 {
            let err = Error::protocol(format!("No interfaces found in '{}' output", command));
            self.state.phase_failed("Loading interfaces", &err);
            return Err(err);
        }
        self.state.commit_basic(device);
        Ok(())
    }

    async fn get_client_data(&mut self) -> Result<()> {
        self.state.require_basic()?;
        self.state.log(LogEvent::info(
            LogCategory::Poll,
            LogAction::ClientDataSkipped,
            "Client data is not collected over the CLI driver",
        ));
        let device = self.state.device.clone();
        self.state.commit_client_data(device);
        Ok(())
    }

    async fn get_hardware_details(&mut self) -> Result<()> {
        self.state.require_probed()?;
        let output = match self.shell.run(SHOW_VERSION).await {
            Ok(output) => output,
            Err(err) => {
                self.state.phase_failed("Loading hardware details", &err);
                return Err(err);
            }
        };
        let mut device = self.state.device.clone();
        device.more_info.clear();
        for (label, value) in parse_version(&output) {
            device.more_info.insert(label.to_string(), value);
        }
        self.state.commit_hardware(device);
        Ok(())
    }

    async fn set_interface_description(&mut self, _key: &str, _description: &str) -> Result<()> {
        self.unsupported(WriteOp::Description)
    }

    async fn set_interface_admin_status(&mut self, _key: &str, _up: bool) -> Result<()> {
        self.unsupported(WriteOp::AdminStatus)
    }

    async fn set_interface_poe_status(&mut self, _key: &str, _enabled: bool) -> Result<()> {
        self.unsupported(WriteOp::PoeStatus)
    }

    async fn set_interface_untagged_vlan(&mut self, _key: &str, _vlan_id: u16) -> Result<()> {
        self.unsupported(WriteOp::UntaggedVlan)
    }

    async fn save_running_config(&mut self) -> Result<()> {
        self.unsupported(WriteOp::SaveConfig)
    }

    async fn run_command(&mut self, command: &str) -> Result<String> {
        self.state.check_write(WriteOp::RunCommand)?;
        let result = self.shell.run(command).await;
        self.state.record_write(
            LogCategory::Command,
            LogAction::RunCommand,
            format!("Command '{}' executed", command),
            result,
        )
    }
}
