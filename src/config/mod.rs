use std::env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use switch_connect::models::{
    AuthProtocol, MacFormat, PrivProtocol, SnmpProfile, SnmpV3Credentials, SnmpVersion, SshProfile, SwitchDescriptor,
};
use switch_connect::poller::PollOptions;
use switch_connect::settings::ConnectorSettings;

/// Config holds the poller's configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub addresses: Vec<String>,
    pub vendor_hint: Option<String>,
    pub object_id: Option<String>,
    pub snmp_version: SnmpVersion,
    pub snmp_community: String,
    pub snmp_port: u16,
    pub snmp_v3_user: String,
    pub snmp_v3_auth_protocol: AuthProtocol,
    pub snmp_v3_auth_pass: String,
    pub snmp_v3_priv_protocol: PrivProtocol,
    pub snmp_v3_priv_pass: String,
    pub snmp_context: String,
    pub snmp_timeout_secs: u64,
    pub snmp_retries: u32,
    pub snmp_max_repetitions: u32,
    pub ssh_user: String,
    pub ssh_pass: String,
    pub ssh_device_type: String,
    pub ssh_port: u16,
    pub ssh_timeout_secs: u64,
    pub mac_format: MacFormat,
    pub read_only: bool,
    pub poll_concurrency: usize,
    pub poll_interval_secs: u64,
    pub skip_client_data: bool,
    pub skip_hardware: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            addresses: get_env("SWITCH_ADDRESSES", "")
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(String::from)
                .collect(),
            vendor_hint: get_opt("SWITCH_VENDOR"),
            object_id: get_opt("SWITCH_OBJECT_ID"),
            snmp_version: SnmpVersion::parse(&get_env("SNMP_VERSION", "2c")).unwrap_or_default(),
            snmp_community: get_env("SNMP_COMMUNITY", "public"),
            snmp_port: get_env("SNMP_PORT", "161").parse().unwrap_or(161),
            snmp_v3_user: get_env("SNMP_V3_USER", ""),
            snmp_v3_auth_protocol: parse_auth(&get_env("SNMP_V3_AUTH_PROTOCOL", "sha")),
            snmp_v3_auth_pass: get_env("SNMP_V3_AUTH_PASS", ""),
            snmp_v3_priv_protocol: parse_priv(&get_env("SNMP_V3_PRIV_PROTOCOL", "aes")),
            snmp_v3_priv_pass: get_env("SNMP_V3_PRIV_PASS", ""),
            snmp_context: get_env("SNMP_CONTEXT", ""),
            snmp_timeout_secs: get_env("SNMP_TIMEOUT_SECS", "5").parse().unwrap_or(5),
            snmp_retries: get_env("SNMP_RETRIES", "3").parse().unwrap_or(3),
            snmp_max_repetitions: get_env("SNMP_MAX_REPETITIONS", "25").parse().unwrap_or(25),
            ssh_user: get_env("SSH_USER", ""),
            ssh_pass: get_env("SSH_PASS", ""),
            ssh_device_type: get_env("SSH_DEVICE_TYPE", "generic"),
            ssh_port: get_env("SSH_PORT", "22").parse().unwrap_or(22),
            ssh_timeout_secs: get_env("SSH_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            mac_format: MacFormat::parse(&get_env("MAC_FORMAT", "colon")).unwrap_or_default(),
            read_only: get_flag("READ_ONLY"),
            poll_concurrency: get_env("POLL_CONCURRENCY", "8").parse().unwrap_or(8),
            poll_interval_secs: get_env("POLL_INTERVAL_SECS", "0").parse().unwrap_or(0),
            skip_client_data: get_flag("SKIP_CLIENT_DATA"),
            skip_hardware: get_flag("SKIP_HARDWARE"),
        }
    }

    pub fn connector_settings(&self, cancel: CancellationToken) -> ConnectorSettings {
        ConnectorSettings {
            snmp_timeout: Duration::from_secs(self.snmp_timeout_secs),
            snmp_retries: self.snmp_retries,
            max_repetitions: self.snmp_max_repetitions,
            ssh_timeout: Duration::from_secs(self.ssh_timeout_secs),
            mac_format: self.mac_format,
            cancel,
        }
    }

    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            client_data: !self.skip_client_data,
            hardware: !self.skip_hardware,
        }
    }

    fn snmp_profile(&self) -> SnmpProfile {
        let v3 = (self.snmp_version == SnmpVersion::V3).then(|| SnmpV3Credentials {
            username: self.snmp_v3_user.clone(),
            auth_protocol: self.snmp_v3_auth_protocol,
            auth_password: non_empty(&self.snmp_v3_auth_pass),
            priv_protocol: self.snmp_v3_priv_protocol,
            priv_password: non_empty(&self.snmp_v3_priv_pass),
        });
        SnmpProfile {
            version: self.snmp_version,
            community: self.snmp_community.clone(),
            port: self.snmp_port,
            v3,
            context: non_empty(&self.snmp_context),
        }
    }

    fn ssh_profile(&self) -> Option<SshProfile> {
        if self.ssh_user.is_empty() {
            return None;
        }
        Some(SshProfile {
            username: self.ssh_user.clone(),
            password: self.ssh_pass.clone(),
            device_type: self.ssh_device_type.clone(),
            port: self.ssh_port,
        })
    }

    /// One descriptor per address, all sharing the same credentials.
    pub fn descriptors(&self) -> Vec<SwitchDescriptor> {
        let snmp = self.snmp_profile();
        let ssh = self.ssh_profile();
        self.addresses
            .iter()
            .map(|address| SwitchDescriptor {
                name: address.clone(),
                address: address.clone(),
                vendor_hint: self.vendor_hint.clone(),
                object_id: self.object_id.clone(),
                // empty community without v3 means SSH only
                snmp: (!self.snmp_community.is_empty() || self.snmp_version == SnmpVersion::V3).then(|| snmp.clone()),
                ssh: ssh.clone(),
                read_only: self.read_only,
                capability_overrides: Default::default(),
            })
            .collect()
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_flag(key: &str) -> bool {
    matches!(
        get_env(key, "false").trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_auth(s: &str) -> AuthProtocol {
    match s.trim().to_ascii_lowercase().as_str() {
        "md5" => AuthProtocol::Md5,
        "sha256" => AuthProtocol::Sha256,
        "sha512" => AuthProtocol::Sha512,
        _ => AuthProtocol::Sha1,
    }
}

fn parse_priv(s: &str) -> PrivProtocol {
    match s.trim().to_ascii_lowercase().as_str() {
        "des" => PrivProtocol::Des,
        "aes256" => PrivProtocol::Aes256,
        _ => PrivProtocol::Aes128,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            addresses: vec!["192.0.2.1".into(), "192.0.2.2".into()],
            vendor_hint: None,
            object_id: None,
            snmp_version: SnmpVersion::V2c,
            snmp_community: "public".into(),
            snmp_port: 161,
            snmp_v3_user: String::new(),
            snmp_v3_auth_protocol: AuthProtocol::Sha1,
            snmp_v3_auth_pass: String::new(),
            snmp_v3_priv_protocol: PrivProtocol::Aes128,
            snmp_v3_priv_pass: String::new(),
            snmp_context: String::new(),
            snmp_timeout_secs: 5,
            snmp_retries: 3,
            snmp_max_repetitions: 25,
            ssh_user: String::new(),
            ssh_pass: String::new(),
            ssh_device_type: "generic".into(),
            ssh_port: 22,
            ssh_timeout_secs: 30,
            mac_format: MacFormat::Colon,
            read_only: false,
            poll_concurrency: 8,
            poll_interval_secs: 0,
            skip_client_data: false,
            skip_hardware: false,
        }
    }

    #[test]
    fn test_descriptors_share_credentials() {
        let descriptors = base().descriptors();
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[1].address, "192.0.2.2");
        assert_eq!(descriptors[0].snmp.as_ref().unwrap().community, "public");
        assert!(descriptors[0].ssh.is_none());
    }

    #[test]
    fn test_ssh_only() {
        let mut cfg = base();
        cfg.snmp_community = String::new();
        cfg.ssh_user = "netops".into();
        let d = &cfg.descriptors()[0];
        assert!(d.snmp.is_none());
        assert_eq!(d.ssh.as_ref().unwrap().username, "netops");
    }

    #[test]
    fn test_v3_profile() {
        let mut cfg = base();
        cfg.snmp_version = SnmpVersion::V3;
        cfg.snmp_v3_user = "monitor".into();
        cfg.snmp_v3_auth_pass = "authpass".into();
        let profile = cfg.snmp_profile();
        let v3 = profile.v3.unwrap();
        assert_eq!(v3.username, "monitor");
        assert_eq!(v3.auth_password.as_deref(), Some("authpass"));
        assert!(v3.priv_password.is_none());
    }

    #[test]
    fn test_settings_and_options() {
        let mut cfg = base();
        cfg.skip_hardware = true;
        cfg.snmp_timeout_secs = 2;
        let settings = cfg.connector_settings(CancellationToken::new());
        assert_eq!(settings.snmp_timeout, Duration::from_secs(2));
        assert!(!cfg.poll_options().hardware);
        assert!(cfg.poll_options().client_data);
    }
}
