use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::models::MacFormat;

/// Per-session knobs shared by connectors and transports.
#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    pub snmp_timeout: Duration,
    /// Extra attempts after a timed-out SNMP request.
    pub snmp_retries: u32,
    pub max_repetitions: u32,
    pub ssh_timeout: Duration,
    pub mac_format: MacFormat,
    /// Cancels every in-flight transport call of the session.
    pub cancel: CancellationToken,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            snmp_timeout: Duration::from_secs(5),
            snmp_retries: 3,
            max_repetitions: 25,
            ssh_timeout: Duration::from_secs(30),
            mac_format: MacFormat::Colon,
            cancel: CancellationToken::new(),
        }
    }
}

impl ConnectorSettings {
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
