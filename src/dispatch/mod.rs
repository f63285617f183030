//! Vendor detection: descriptor and sysObjectID in, connector out.

use crate::connector::vendors::dialect_for;
use crate::connector::{CliConnector, Connector, ConnectorKind, DummyConnector, GenericParser, SnmpConnector, WalkContext};
use crate::error::{Error, ErrorKind, Result};
use crate::models::{DeviceSnapshot, SwitchDescriptor, SystemInfo};
use crate::settings::ConnectorSettings;
use crate::snmp::enterprise_id;
use crate::snmp::mibs::standard;
use crate::transport::{SnmpClient, SnmpTransport, SshClient};

/// Connector kind for an IANA private enterprise number.
pub fn kind_for_enterprise(enterprise: Option<u32>) -> ConnectorKind {
    match enterprise {
        Some(9) => ConnectorKind::Cisco,
        Some(11) => ConnectorKind::Procurve,
        Some(43) | Some(25506) => ConnectorKind::Comware,
        Some(2636) => ConnectorKind::Juniper,
        Some(30065) => ConnectorKind::Arista,
        Some(674) => ConnectorKind::Dell,
        Some(4526) => ConnectorKind::Netgear,
        Some(47196) => ConnectorKind::ArubaCx,
        _ => ConnectorKind::Generic,
    }
}

pub fn kind_for_object_id(object_id: &str) -> ConnectorKind {
    kind_for_enterprise(enterprise_id(object_id))
}

/// Non-SNMP connector selected by the descriptor alone, if any.
pub fn hinted_kind(descriptor: &SwitchDescriptor) -> Option<ConnectorKind> {
    let hint = descriptor
        .vendor_hint
        .as_deref()
        .map(|h| h.trim().to_ascii_lowercase())
        .unwrap_or_default();
    match hint.as_str() {
        "dummy" => Some(ConnectorKind::Dummy),
        "cli" | "ssh" | "netmiko" | "napalm" => Some(ConnectorKind::Cli),
        _ if descriptor.snmp.is_none() && descriptor.ssh.is_some() => Some(ConnectorKind::Cli),
        _ => None,
    }
}

/// Read the SNMP system group. Fails when the agent does not report a
/// sysObjectID.
pub async fn probe_system(transport: &mut dyn SnmpTransport, name: &str) -> Result<SystemInfo> {
    let rows = transport.walk(standard::SYSTEM).await?;
    let mut ctx = WalkContext::new(name, DeviceSnapshot::default());
    let mut parser = GenericParser::new();
    for (oid, value) in &rows {
        parser.parse_oid(&mut ctx, oid, value);
    }
    let mut system = ctx.device.system;
    if system.object_id.is_empty() {
        return Err(Error::protocol("Agent returned no sysObjectID"));
    }
    system.enterprise_id = enterprise_id(&system.object_id);
    Ok(system)
}

fn probe_failed(name: &str, err: Error) -> Error {
    if err.is(ErrorKind::Cancelled) {
        return err;
    }
    tracing::warn!("{}: probe failed: {}", name, err);
    Error::probe(format!("Cannot identify {}", name)).with_details(err.to_string())
}

/// Build the SNMP connector on an already open transport. A cached
/// `object_id` on the descriptor skips the probe.
pub async fn connect_with(
    descriptor: SwitchDescriptor,
    settings: ConnectorSettings,
    mut transport: Box<dyn SnmpTransport>,
) -> Result<SnmpConnector> {
    let name = if descriptor.name.is_empty() {
        descriptor.address.clone()
    } else {
        descriptor.name.clone()
    };
    let system = match descriptor.object_id.as_deref().filter(|oid| !oid.is_empty()) {
        Some(object_id) => SystemInfo {
            name: descriptor.name.clone(),
            object_id: object_id.to_string(),
            enterprise_id: enterprise_id(object_id),
            ..Default::default()
        },
        None => probe_system(&mut *transport, &name)
            .await
            .map_err(|err| probe_failed(&name, err))?,
    };
    let kind = kind_for_enterprise(system.enterprise_id);
    tracing::info!("{}: {} connector selected (sysObjectID {})", name, kind, system.object_id);

    let shell = descriptor
        .ssh
        .as_ref()
        .map(|ssh| SshClient::new(&descriptor.address, ssh, &settings));
    let connector = SnmpConnector::new(descriptor, settings, system, dialect_for(kind), transport);
    Ok(match shell {
        Some(shell) => connector.with_shell(Box::new(shell)),
        None => connector,
    })
}

/// Open the right connector for a descriptor: the hinted one, or SNMP
/// with the vendor picked from the probed sysObjectID.
pub async fn connect(descriptor: SwitchDescriptor, settings: ConnectorSettings) -> Result<Box<dyn Connector>> {
    match hinted_kind(&descriptor) {
        Some(ConnectorKind::Dummy) => Ok(Box::new(DummyConnector::new(descriptor, settings))),
        Some(_) => {
            let ssh = descriptor
                .ssh
                .as_ref()
                .ok_or_else(|| Error::unsupported("The CLI driver needs an SSH profile"))?;
            let shell = SshClient::new(&descriptor.address, ssh, &settings);
            Ok(Box::new(CliConnector::new(descriptor, settings, Box::new(shell))))
        }
        None => {
            let profile = descriptor.snmp.clone().unwrap_or_default();
            let transport = SnmpClient::connect(&descriptor.address, &profile, &settings)
                .await
                .map_err(|err| probe_failed(&descriptor.address, err))?;
            Ok(Box::new(connect_with(descriptor, settings, Box::new(transport)).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SshProfile;
    use crate::snmp::SnmpValue;
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    #[test]
    fn test_kind_for_object_id() {
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.9.1.1208"), ConnectorKind::Cisco);
        assert_eq!(kind_for_object_id(".1.3.6.1.4.1.11.2.3.7.11.181"), ConnectorKind::Procurve);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.25506.1.1"), ConnectorKind::Comware);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.43.1.16.4.3.45"), ConnectorKind::Comware);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.2636.1.1.1.2.57"), ConnectorKind::Juniper);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.30065.1.3011.7048.427.3248"), ConnectorKind::Arista);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.674.10895.3042"), ConnectorKind::Dell);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.4526.100.4.38"), ConnectorKind::Netgear);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.47196.4.1.1.1.50"), ConnectorKind::ArubaCx);
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.8072.3.2.10"), ConnectorKind::Generic);
        assert_eq!(kind_for_object_id(""), ConnectorKind::Generic);
        // same input, same answer
        assert_eq!(kind_for_object_id("1.3.6.1.4.1.9.1.1208"), kind_for_object_id("1.3.6.1.4.1.9.1.1208"));
    }

    #[test]
    fn test_hints() {
        let ssh = SshProfile {
            username: "u".into(),
            password: "p".into(),
            device_type: "linux".into(),
            port: 22,
        };
        let d = SwitchDescriptor::new("a", "192.0.2.1").with_vendor_hint("Dummy");
        assert_eq!(hinted_kind(&d), Some(ConnectorKind::Dummy));
        let d = SwitchDescriptor::new("a", "192.0.2.1").with_vendor_hint("napalm");
        assert_eq!(hinted_kind(&d), Some(ConnectorKind::Cli));
        let d = SwitchDescriptor::new("a", "192.0.2.1").with_ssh(ssh);
        assert_eq!(hinted_kind(&d), Some(ConnectorKind::Cli));
        let d = SwitchDescriptor::new("a", "192.0.2.1");
        assert_eq!(hinted_kind(&d), None);
    }

    #[tokio::test]
    async fn test_probe_selects_vendor() {
        let agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.2.1.1.1.0", SnmpValue::string("Cisco IOS Software"))
            .insert("1.3.6.1.2.1.1.2.0", SnmpValue::ObjectId("1.3.6.1.4.1.9.1.1208".into()))
            .insert("1.3.6.1.2.1.1.5.0", SnmpValue::string("sw-core"));
        let conn = assert_ok!(
            connect_with(
                SwitchDescriptor::new("sw-core", "192.0.2.1"),
                ConnectorSettings::default(),
                Box::new(agent.clone())
            )
            .await
        );
        assert_eq!(conn.kind(), ConnectorKind::Cisco);
        assert_eq!(conn.device().system.enterprise_id, Some(9));
        assert_eq!(conn.device().system.vendor, "Cisco");
        assert_eq!(agent.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cached_object_id_skips_probe() {
        let agent = MemoryAgent::new();
        let descriptor = SwitchDescriptor::new("sw", "192.0.2.2").with_object_id("1.3.6.1.4.1.2636.1.1.1.2.57");
        let conn = assert_ok!(connect_with(descriptor, ConnectorSettings::default(), Box::new(agent.clone())).await);
        assert_eq!(conn.kind(), ConnectorKind::Juniper);
        assert!(conn.capabilities().read_only.is_some());
        assert_eq!(agent.call_count(), 0);
    }

    #[tokio::test]
    async fn test_probe_failures() {
        let agent = MemoryAgent::new();
        let err = connect_with(SwitchDescriptor::new("sw", "192.0.2.3"), ConnectorSettings::default(), Box::new(agent))
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::ProbeError);

        let agent = MemoryAgent::new();
        agent.fail_on("1.3.6.1.2.1.1", Error::cancelled());
        let err = connect_with(SwitchDescriptor::new("sw", "192.0.2.3"), ConnectorSettings::default(), Box::new(agent))
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_connect_dummy() {
        let descriptor = SwitchDescriptor::new("lab", "127.0.0.1").with_vendor_hint("dummy");
        let mut conn = assert_ok!(connect(descriptor, ConnectorSettings::default()).await);
        assert_eq!(conn.kind(), ConnectorKind::Dummy);
        assert_ok!(conn.get_basic_info().await);
        assert_eq!(conn.device().interface_count(), 4);
    }
}
