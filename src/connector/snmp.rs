use async_trait::async_trait;
use std::collections::BTreeMap;

use super::vendors::{generic, VendorDialect};
use super::{
    Capabilities, Connector, ConnectorKind, GenericParser, Phase, SessionState, SnmpSession, WalkContext, WriteOp,
};
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, LogAction, LogCategory, LogEvent, SwitchDescriptor, SystemInfo};
use crate::settings::ConnectorSettings;
use crate::snmp::SnmpValue;
use crate::transport::{CommandTransport, SnmpTransport};

/// SNMP connector: the loading phases and the write path, with every
/// vendor difference delegated to a [`VendorDialect`].
pub struct SnmpConnector {
    state: SessionState,
    dialect: Box<dyn VendorDialect>,
    transport: Box<dyn SnmpTransport>,
    generic: GenericParser,
    shell: Option<Box<dyn CommandTransport>>,
}

async fn load_basic(s: &mut SnmpSession<'_>) -> Result<()> {
    let dialect = s.dialect;
    generic::get_interface_data(s).await?;
    dialect.get_vlan_data(s).await?;
    dialect.get_port_vlan_data(s).await?;
    dialect.get_poe_data(s).await?;
    dialect.map_poe_port_entries_to_interface(s.ctx);
    Ok(())
}

async fn load_client_data(s: &mut SnmpSession<'_>) -> Result<()> {
    let dialect = s.dialect;
    dialect.get_known_ethernet_addresses(s).await?;
    generic::get_arp_data(s).await?;
    generic::get_lldp_data(s).await
}

impl SnmpConnector {
    /// Connector for a session whose identity probe already returned
    /// `system`.
    pub fn new(
        descriptor: SwitchDescriptor,
        settings: ConnectorSettings,
        mut system: SystemInfo,
        dialect: Box<dyn VendorDialect>,
        transport: Box<dyn SnmpTransport>,
    ) -> Self {
        if system.vendor.is_empty() {
            system.vendor = dialect.kind().vendor_name().to_string();
        }
        let state = SessionState::new(descriptor, settings, dialect.capabilities(), system);
        Self {
            state,
            dialect,
            transport,
            generic: GenericParser::new(),
            shell: None,
        }
    }

    /// CLI transport for `run_command`.
    pub fn with_shell(mut self, shell: Box<dyn CommandTransport>) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Varbinds the standard-MIB parser consumed in this session.
    pub fn generic_consumed(&self) -> usize {
        self.generic.consumed()
    }

    pub fn oid_cache(&self) -> &BTreeMap<String, SnmpValue> {
        &self.state.oid_cache
    }

    fn context(&self, device: DeviceSnapshot) -> WalkContext {
        WalkContext::new(self.state.name(), device)
    }

    /// Merge a finished staging context. Events are kept even when the
    /// phase failed; the model only on success.
    fn finish(&mut self, phase: &str, ctx: WalkContext, result: Result<()>) -> Result<Option<DeviceSnapshot>> {
        self.state.extend_events(ctx.events);
        match result {
            Ok(()) => {
                self.state.oid_cache.extend(ctx.oid_cache);
                Ok(Some(ctx.device))
            }
            Err(err) => {
                self.state.phase_failed(phase, &err);
                Err(err)
            }
        }
    }
}

#[async_trait]
impl Connector for SnmpConnector {
    fn kind(&self) -> ConnectorKind {
        self.dialect.kind()
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
        self.state.require_probed()?;
        let mut ctx = self.context(DeviceSnapshot::new(self.state.device.system.clone()));
        let result = {
            let mut s = SnmpSession {
                transport: &mut *self.transport,
                dialect: &*self.dialect,
                ctx: &mut ctx,
                generic: &mut self.generic,
            };
            load_basic(&mut s).await
        };
        if let Some(device) = self.finish("Loading interfaces", ctx, result)? {
            self.state.commit_basic(device);
        }
        Ok(())
    }

    async fn get_client_data(&mut self) -> Result<()> {
        self.state.require_basic()?;
        let mut device = self.state.device.clone();
        device.clear_client_data();
        let mut ctx = self.context(device);
        let result = {
            let mut s = SnmpSession {
                transport: &mut *self.transport,
                dialect: &*self.dialect,
                ctx: &mut ctx,
                generic: &mut self.generic,
            };
            load_client_data(&mut s).await
        };
        if let Some(device) = self.finish("Loading client data", ctx, result)? {
            self.state.commit_client_data(device);
        }
        Ok(())
    }

    async fn get_hardware_details(&mut self) -> Result<()> {
        self.state.require_probed()?;
        let mut device = self.state.device.clone();
        device.stack_members.clear();
        device.more_info.clear();
        let mut ctx = self.context(device);
        let result = {
            let dialect = &*self.dialect;
            let mut s = SnmpSession {
                transport: &mut *self.transport,
                dialect,
                ctx: &mut ctx,
                generic: &mut self.generic,
            };
            dialect.get_hardware_details(&mut s).await
        };
        if let Some(device) = self.finish("Loading hardware details", ctx, result)? {
            self.state.commit_hardware(device);
        }
        Ok(())
    }

    async fn set_interface_description(&mut self, key: &str, description: &str) -> Result<()> {
        self.state.check_write(WriteOp::Description)?;
        let iface = self.state.interface(key)?.clone();
        let result = self
            .dialect
            .set_interface_description(&mut *self.transport, &iface, description)
            .await;
        self.state.record_write(
            LogCategory::Interface,
            LogAction::ChangeDescription,
            format!("Description of {} changed to '{}'", iface.display_name(), description),
            result,
        )?;
        if let Some(iface) = self.state.device.interface_mut(key) {
            iface.description = description.to_string();
        }
        Ok(())
    }

    async fn set_interface_admin_status(&mut self, key: &str, up: bool) -> Result<()> {
        self.state.check_write(WriteOp::AdminStatus)?;
        let iface = self.state.interface(key)?.clone();
        let result = self
            .dialect
            .set_interface_admin_status(&mut *self.transport, &iface, up)
            .await;
        self.state.record_write(
            LogCategory::Interface,
            LogAction::ChangeAdminStatus,
            format!("{} set {}", iface.display_name(), if up { "up" } else { "down" }),
            result,
        )?;
        if let Some(iface) = self.state.device.interface_mut(key) {
            iface.admin_status = up;
        }
        Ok(())
    }

    async fn set_interface_poe_status(&mut self, key: &str, enabled: bool) -> Result<()> {
        self.state.check_write(WriteOp::PoeStatus)?;
        let iface = self.state.interface(key)?.clone();
        let result = self
            .dialect
            .set_interface_poe_status(&mut *self.transport, &iface, enabled)
            .await;
        self.state.record_write(
            LogCategory::Poe,
            LogAction::ChangePoeStatus,
            format!(
                "PoE on {} {}",
                iface.display_name(),
                if enabled { "enabled" } else { "disabled" }
            ),
            result,
        )?;
        if let Some(entry) = self
            .state
            .device
            .interface_mut(key)
            .and_then(|iface| iface.poe_entry.as_mut())
        {
            entry.admin_enabled = enabled;
        }
        Ok(())
    }

    async fn set_interface_untagged_vlan(&mut self, key: &str, vlan_id: u16) -> Result<()> {
        self.state.check_write(WriteOp::UntaggedVlan)?;
        let iface = self.state.interface(key)?.clone();
        let vlan_name = self.state.vlan(vlan_id)?.display_name();
        let result = self
            .dialect
            .set_interface_untagged_vlan(&mut *self.transport, &self.state.device, &iface, vlan_id)
            .await;
        self.state.record_write(
            LogCategory::Vlan,
            LogAction::ChangeVlan,
            format!(
                "Untagged VLAN of {} changed from {} to {}",
                iface.display_name(),
                iface.untagged_vlan,
                vlan_name
            ),
            result,
        )?;
        self.state.device.apply_untagged_vlan(key, vlan_id);
        Ok(())
    }

    async fn save_running_config(&mut self) -> Result<()> {
        self.state.check_write(WriteOp::SaveConfig)?;
        let result = self.dialect.save_running_config(&mut *self.transport).await;
        self.state
            .record_write(LogCategory::Config, LogAction::SaveConfig, "Running config saved".to_string(), result)
    }

    async fn run_command(&mut self, command: &str) -> Result<String> {
        self.state.check_write(WriteOp::RunCommand)?;
        let shell = self
            .shell
            .as_mut()
            .ok_or_else(|| Error::unsupported("No SSH transport for this device"))?;
        let result = shell.run(command).await;
        self.state.record_write(
            LogCategory::Command,
            LogAction::RunCommand,
            format!("Command '{}' executed", command),
            result,
        )
    }
}
