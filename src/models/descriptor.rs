use serde::{Deserialize, Serialize};

/// SNMP protocol version of a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V1,
    #[default]
    V2c,
    V3,
}

impl SnmpVersion {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "v1" => Some(Self::V1),
            "2" | "2c" | "v2c" => Some(Self::V2c),
            "3" | "v3" => Some(Self::V3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProtocol {
    Md5,
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivProtocol {
    Des,
    #[default]
    Aes128,
    Aes256,
}

/// SNMPv3 USM credentials. No auth password means noAuthNoPriv,
/// no privacy password means authNoPriv.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpV3Credentials {
    pub username: String,
    #[serde(default)]
    pub auth_protocol: AuthProtocol,
    #[serde(default)]
    pub auth_password: Option<String>,
    #[serde(default)]
    pub priv_protocol: PrivProtocol,
    #[serde(default)]
    pub priv_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpProfile {
    #[serde(default)]
    pub version: SnmpVersion,
    #[serde(default = "default_community")]
    pub community: String,
    #[serde(default = "default_snmp_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v3: Option<SnmpV3Credentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Default for SnmpProfile {
    fn default() -> Self {
        Self {
            version: SnmpVersion::V2c,
            community: default_community(),
            port: default_snmp_port(),
            v3: None,
            context: None,
        }
    }
}

fn default_community() -> String {
    "public".to_string()
}

fn default_snmp_port() -> u16 {
    161
}

/// SSH (Netmiko-style) CLI profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshProfile {
    pub username: String,
    pub password: String,
    /// Netmiko device type, e.g. "cisco_ios", "juniper_junos".
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
}

fn default_device_type() -> String {
    "generic".to_string()
}

fn default_ssh_port() -> u16 {
    22
}

/// Capability restrictions declared by the operator. `Some(false)`
/// disables a capability the connector would otherwise offer; nothing here
/// can enable a capability the connector lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityOverrides {
    #[serde(default)]
    pub can_change_description: Option<bool>,
    #[serde(default)]
    pub can_change_admin_status: Option<bool>,
    #[serde(default)]
    pub can_change_poe_status: Option<bool>,
    #[serde(default)]
    pub can_change_vlan: Option<bool>,
    #[serde(default)]
    pub can_save_config: Option<bool>,
}

/// Device identity plus credentials, as handed over by the web layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDescriptor {
    pub name: String,
    /// Hostname or IP address.
    pub address: String,
    #[serde(default)]
    pub vendor_hint: Option<String>,
    /// Cached sysObjectID from an earlier probe.
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub snmp: Option<SnmpProfile>,
    #[serde(default)]
    pub ssh: Option<SshProfile>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub capability_overrides: CapabilityOverrides,
}

impl SwitchDescriptor {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_snmp(mut self, profile: SnmpProfile) -> Self {
        self.snmp = Some(profile);
        self
    }

    pub fn with_ssh(mut self, profile: SshProfile) -> Self {
        self.ssh = Some(profile);
        self
    }

    pub fn with_vendor_hint(mut self, hint: impl Into<String>) -> Self {
        self.vendor_hint = Some(hint.into());
        self
    }

    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults_from_json() {
        let json = r#"{
            "name": "core-sw1",
            "address": "10.0.0.2",
            "snmp": { "community": "s3cret" },
            "ssh": { "username": "admin", "password": "admin" }
        }"#;
        let d: SwitchDescriptor = serde_json::from_str(json).unwrap();
        let snmp = d.snmp.unwrap();
        assert_eq!(snmp.version, SnmpVersion::V2c);
        assert_eq!(snmp.port, 161);
        assert_eq!(snmp.community, "s3cret");
        let ssh = d.ssh.unwrap();
        assert_eq!(ssh.port, 22);
        assert_eq!(ssh.device_type, "generic");
        assert!(!d.read_only);
        assert_eq!(d.capability_overrides, CapabilityOverrides::default());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(SnmpVersion::parse("2c"), Some(SnmpVersion::V2c));
        assert_eq!(SnmpVersion::parse("V3"), Some(SnmpVersion::V3));
        assert_eq!(SnmpVersion::parse("4"), None);
    }
}
