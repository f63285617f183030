use std::collections::BTreeMap;

use super::{Capabilities, Phase, WriteOp};
use crate::error::{Error, Result};
use crate::models::{
    DeviceSnapshot, Interface, LogAction, LogCategory, LogEvent, LogLevel, SwitchDescriptor, SystemInfo, Vlan,
};
use crate::settings::ConnectorSettings;
use crate::snmp::SnmpValue;

/// Bookkeeping shared by every connector implementation: descriptor,
/// effective capabilities, phase flags, the committed model and the event
/// log.
pub struct SessionState {
    pub descriptor: SwitchDescriptor,
    pub settings: ConnectorSettings,
    pub capabilities: Capabilities,
    pub device: DeviceSnapshot,
    pub events: Vec<LogEvent>,
    /// Every value a parser consumed, by OID, for "show raw data" views.
    pub oid_cache: BTreeMap<String, SnmpValue>,
    probed: bool,
    basic_loaded: bool,
    client_loaded: bool,
    hardware_loaded: bool,
}

impl SessionState {
    /// State of a session whose identity probe already succeeded.
    pub fn new(
        descriptor: SwitchDescriptor,
        settings: ConnectorSettings,
        vendor_capabilities: Capabilities,
        system: SystemInfo,
    ) -> Self {
        let capabilities = vendor_capabilities.restrict(
            &descriptor.capability_overrides,
            descriptor.read_only,
            descriptor.ssh.is_some(),
        );
        Self {
            descriptor,
            settings,
            capabilities,
            device: DeviceSnapshot::new(system),
            events: Vec::new(),
            oid_cache: BTreeMap::new(),
            probed: true,
            basic_loaded: false,
            client_loaded: false,
            hardware_loaded: false,
        }
    }

    pub fn name(&self) -> &str {
        if self.descriptor.name.is_empty() {
            &self.descriptor.address
        } else {
            &self.descriptor.name
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.probed {
            Phase::Uninitialized
        } else if self.hardware_loaded {
            Phase::HardwareLoaded
        } else if self.client_loaded {
            Phase::ClientDataLoaded
        } else if self.basic_loaded {
            Phase::BasicLoaded
        } else {
            Phase::Probed
        }
    }

    pub fn set_probed(&mut self, probed: bool) {
        self.probed = probed;
    }

    pub fn basic_loaded(&self) -> bool {
        self.basic_loaded
    }

    pub fn require_probed(&self) -> Result<()> {
        if self.probed {
            Ok(())
        } else {
            Err(Error::invalid_state("Device has not been probed"))
        }
    }

    pub fn require_basic(&self) -> Result<()> {
        if self.basic_loaded {
            Ok(())
        } else {
            Err(Error::invalid_state("Basic interface data must be loaded first")
                .with_details(format!("current phase: {:?}", self.phase())))
        }
    }

    /// Install a freshly loaded model after the basic phase.
    pub fn commit_basic(&mut self, mut device: DeviceSnapshot) {
        // hardware details may have been loaded before the interfaces
        device.stack_members = std::mem::take(&mut self.device.stack_members);
        device.more_info = std::mem::take(&mut self.device.more_info);
        device.polled_at = Some(chrono::Utc::now());
        self.device = device;
        self.basic_loaded = true;
        tracing::info!(
            "{}: basic info loaded ({} interfaces, {} vlans)",
            self.name(),
            self.device.interface_count(),
            self.device.vlans.len()
        );
    }

    pub fn commit_client_data(&mut self, device: DeviceSnapshot) {
        self.device = device;
        self.client_loaded = true;
        tracing::info!(
            "{}: client data loaded ({} ethernet, {} neighbors)",
            self.name(),
            self.device.ethernet_count(),
            self.device.neighbor_count()
        );
    }

    pub fn commit_hardware(&mut self, device: DeviceSnapshot) {
        self.device = device;
        self.hardware_loaded = true;
        tracing::info!(
            "{}: hardware details loaded ({} stack members)",
            self.name(),
            self.device.stack_members.len()
        );
    }

    pub fn reload(&mut self) {
        let system = self.device.system.clone();
        self.device = DeviceSnapshot::new(system);
        self.oid_cache.clear();
        self.basic_loaded = false;
        self.client_loaded = false;
        self.hardware_loaded = false;
    }

    /// Capability gate for writes. Never touches the transport.
    pub fn check_write(&self, op: WriteOp) -> Result<()> {
        if self.capabilities.allows(op) {
            return Ok(());
        }
        tracing::debug!("{}: {} refused by capabilities", self.name(), op.label());
        match (&self.capabilities.read_only, op) {
            (Some(reason), op) if op != WriteOp::RunCommand => {
                Err(Error::unsupported("Device is Read-Only").with_details(reason.clone()))
            }
            _ => Err(Error::unsupported(format!("{} is not supported by this device", op.label()))),
        }
    }

    pub fn interface(&self, key: &str) -> Result<&Interface> {
        self.device
            .interface(key)
            .ok_or_else(|| Error::not_found("Interface", key))
    }

    pub fn vlan(&self, vlan_id: u16) -> Result<&Vlan> {
        self.device
            .vlans
            .get(&vlan_id)
            .ok_or_else(|| Error::not_found("VLAN", &vlan_id.to_string()))
    }

    /// Append an event and mirror it to tracing at the matching level.
    pub fn log(&mut self, event: LogEvent) {
        match event.level {
            LogLevel::Info => tracing::info!("{}: {}", self.name(), event.description),
            LogLevel::Warning => tracing::warn!("{}: {}", self.name(), event.description),
            LogLevel::Error => tracing::error!("{}: {}", self.name(), event.description),
        }
        self.events.push(event);
    }

    pub fn extend_events(&mut self, events: Vec<LogEvent>) {
        self.events.extend(events);
    }

    pub fn phase_failed(&mut self, phase: &str, err: &Error) {
        self.log(LogEvent::error(
            LogCategory::Poll,
            LogAction::PhaseFailed,
            format!("{} failed: {}", phase, err),
        ));
    }

    /// Log the outcome of a device write and pass the result through.
    pub fn record_write<T>(
        &mut self,
        category: LogCategory,
        action: LogAction,
        description: String,
        result: Result<T>,
    ) -> Result<T> {
        match &result {
            Ok(_) => self.log(LogEvent::info(category, action, description)),
            Err(err) => self.log(LogEvent::error(
                category,
                LogAction::WriteFailed,
                format!("{} failed: {}", description, err),
            )),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn state(caps: Capabilities) -> SessionState {
        SessionState::new(
            SwitchDescriptor::new("sw1", "192.0.2.1"),
            ConnectorSettings::default(),
            caps,
            SystemInfo::default(),
        )
    }

    #[test]
    fn test_phase_progression() {
        let mut s = state(Capabilities::writable(false));
        assert_eq!(s.phase(), Phase::Probed);
        assert_eq!(s.require_basic().unwrap_err().kind, ErrorKind::InvalidState);
        s.commit_basic(DeviceSnapshot::default());
        assert_eq!(s.phase(), Phase::BasicLoaded);
        s.commit_hardware(s.device.clone());
        assert_eq!(s.phase(), Phase::HardwareLoaded);
        s.reload();
        assert_eq!(s.phase(), Phase::Probed);
        s.set_probed(false);
        assert_eq!(s.phase(), Phase::Uninitialized);
    }

    #[test]
    fn test_gate_messages() {
        let s = state(Capabilities::writable(false));
        let err = s.check_write(WriteOp::SaveConfig).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        assert_eq!(err.description, "Saving the running config is not supported by this device");

        let s = state(Capabilities::read_only("Vendor SNMP is Read-Only"));
        let err = s.check_write(WriteOp::Description).unwrap_err();
        assert!(err.description.contains("Read-Only"));
        assert_eq!(err.details.as_deref(), Some("Vendor SNMP is Read-Only"));
    }

    #[test]
    fn test_record_write_logs_outcome() {
        let mut s = state(Capabilities::writable(false));
        let ok: Result<()> = Ok(());
        assert!(s
            .record_write(LogCategory::Interface, LogAction::ChangeDescription, "x".into(), ok)
            .is_ok());
        let failed: Result<()> = Err(Error::protocol("boom"));
        assert!(s
            .record_write(LogCategory::Interface, LogAction::ChangeDescription, "y".into(), failed)
            .is_err());
        assert_eq!(s.events.len(), 2);
        assert_eq!(s.events[1].action, LogAction::WriteFailed);
        assert_eq!(s.events[1].level, LogLevel::Error);
    }
}
