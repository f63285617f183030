//! Polling sessions: one device per tokio task, bounded by a semaphore.

use serde::Serialize;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::{interval, Duration};

use crate::connector::{Connector, ConnectorKind, Phase};
use crate::dispatch;
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, LogEvent, MacFormat, SwitchDescriptor};
use crate::settings::ConnectorSettings;

/// Which optional phases a poll runs after basic info.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub client_data: bool,
    pub hardware: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            client_data: true,
            hardware: true,
        }
    }
}

/// A learned address as shown to operators, MAC already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientEntry {
    pub interface: String,
    pub mac: String,
    pub vlan: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip4: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip6: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<&'static str>,
}

/// Learned addresses of every interface, in the given MAC notation.
pub fn client_entries(device: &DeviceSnapshot, format: MacFormat) -> Vec<ClientEntry> {
    device
        .interfaces()
        .flat_map(|iface| {
            iface.eth.values().map(move |eth| ClientEntry {
                interface: iface.display_name(),
                mac: eth.display(format),
                vlan: eth.vlan_id,
                ip4: eth.ip4,
                ip6: eth.ip6,
                vendor: eth.vendor(),
            })
        })
        .collect()
}

/// Outcome of one device poll.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConnectorKind>,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<DeviceSnapshot>,
    pub clients: Vec<ClientEntry>,
    pub events: Vec<LogEvent>,
    /// First phase error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

/// Run the loading phases on an open connector. Basic info failing stops
/// the poll; the optional phases are independent of each other.
pub async fn run_phases(conn: &mut dyn Connector, options: PollOptions) -> Result<()> {
    conn.get_basic_info().await?;
    let mut first_error = None;
    if options.client_data {
        if let Err(err) = conn.get_client_data().await {
            first_error.get_or_insert(err);
        }
    }
    if options.hardware {
        if let Err(err) = conn.get_hardware_details().await {
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Connect and poll one device.
pub async fn poll_device(descriptor: SwitchDescriptor, settings: ConnectorSettings, options: PollOptions) -> PollReport {
    let name = descriptor.name.clone();
    let address = descriptor.address.clone();
    let mac_format = settings.mac_format;
    let mut conn = match dispatch::connect(descriptor, settings).await {
        Ok(conn) => conn,
        Err(err) => {
            return PollReport {
                name,
                address,
                kind: None,
                phase: Phase::Uninitialized,
                snapshot: None,
                clients: Vec::new(),
                events: Vec::new(),
                error: Some(err),
            }
        }
    };
    let error = run_phases(conn.as_mut(), options).await.err();
    if let Some(err) = &error {
        tracing::warn!("{}: poll incomplete: {}", name, err);
    }
    let phase = conn.phase();
    PollReport {
        name,
        address,
        kind: Some(conn.kind()),
        phase,
        snapshot: (phase >= Phase::BasicLoaded).then(|| conn.device().clone()),
        clients: client_entries(conn.device(), mac_format),
        events: conn.take_events(),
        error,
    }
}

/// Poll every descriptor, at most `concurrency` at a time. Reports come
/// back in descriptor order.
pub async fn poll_many(
    descriptors: Vec<SwitchDescriptor>,
    settings: ConnectorSettings,
    options: PollOptions,
    concurrency: usize,
) -> Vec<PollReport> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut handles = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let semaphore = Arc::clone(&semaphore);
        let settings = settings.clone();
        let fallback = (descriptor.name.clone(), descriptor.address.clone());
        let handle = tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::warn!("Poll semaphore closed for {}: {}", descriptor.address, e);
                    return None;
                }
            };
            Some(poll_device(descriptor, settings, options).await)
        });
        handles.push((fallback, handle));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for ((name, address), handle) in handles {
        let report = match handle.await {
            Ok(Some(report)) => report,
            Ok(None) => failed_report(name, address, Error::cancelled()),
            Err(e) => {
                tracing::warn!("Poll task for {} failed: {}", address, e);
                failed_report(name, address, Error::protocol("Poll task failed").with_details(e.to_string()))
            }
        };
        reports.push(report);
    }
    reports
}

fn failed_report(name: String, address: String, error: Error) -> PollReport {
    PollReport {
        name,
        address,
        kind: None,
        phase: Phase::Uninitialized,
        snapshot: None,
        clients: Vec::new(),
        events: Vec::new(),
        error: Some(error),
    }
}

/// Re-polls a device list on a fixed interval until stopped.
pub struct PollLoop {
    descriptors: Vec<SwitchDescriptor>,
    settings: ConnectorSettings,
    options: PollOptions,
    concurrency: usize,
    interval_secs: u64,
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl PollLoop {
    pub fn new(
        descriptors: Vec<SwitchDescriptor>,
        settings: ConnectorSettings,
        options: PollOptions,
        concurrency: usize,
        interval_secs: u64,
    ) -> Self {
        Self {
            descriptors,
            settings,
            options,
            concurrency,
            interval_secs,
            stop_tx: None,
        }
    }

    /// Start polling; every finished round is handed to `on_round`.
    pub fn start<F>(&mut self, on_round: F)
    where
        F: Fn(Vec<PollReport>) + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        let descriptors = self.descriptors.clone();
        let settings = self.settings.clone();
        let options = self.options;
        let concurrency = self.concurrency;
        let interval_secs = self.interval_secs.max(1);

        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(interval_secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let reports = poll_many(descriptors.clone(), settings.clone(), options, concurrency).await;
                        let failed = reports.iter().filter(|r| r.error.is_some()).count();
                        if failed > 0 {
                            tracing::warn!("Poll round finished, {} of {} devices failed", failed, reports.len());
                        }
                        on_round(reports);
                    }
                    _ = &mut stop_rx => {
                        tracing::info!("Poll loop stopped");
                        break;
                    }
                }
            }
        });
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::vendors::Generic;
    use crate::connector::SnmpConnector;
    use crate::error::ErrorKind;
    use crate::models::SystemInfo;
    use crate::snmp::SnmpValue;
    use crate::transport::MemoryAgent;
    use tokio::sync::mpsc;
    use tokio_test::assert_ok;

    fn lab(name: &str) -> SwitchDescriptor {
        SwitchDescriptor::new(name, "127.0.0.1").with_vendor_hint("dummy")
    }

    #[tokio::test]
    async fn test_poll_many_keeps_order() {
        let reports = poll_many(
            vec![lab("a"), lab("b"), lab("c")],
            ConnectorSettings::default(),
            PollOptions::default(),
            2,
        )
        .await;
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        for report in &reports {
            assert!(report.error.is_none());
            assert_eq!(report.phase, Phase::HardwareLoaded);
            assert_eq!(report.snapshot.as_ref().unwrap().interface_count(), 4);
        }
    }

    #[tokio::test]
    async fn test_optional_phase_failure_keeps_snapshot() {
        let agent = MemoryAgent::new();
        agent
            .insert("1.3.6.1.2.1.2.2.1.2.1", SnmpValue::string("Gi1"))
            .fail_on("1.3.6.1.2.1.17.7.1.2.2", Error::timeout("No response"));
        let mut conn = SnmpConnector::new(
            SwitchDescriptor::new("sw", "192.0.2.1"),
            ConnectorSettings::default(),
            SystemInfo::default(),
            Box::new(Generic),
            Box::new(agent),
        );
        let err = run_phases(&mut conn, PollOptions::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConnectTimeout);
        assert_eq!(conn.phase(), Phase::HardwareLoaded);
        assert_eq!(conn.device().interface_count(), 1);
        assert_eq!(conn.device().ethernet_count(), 0);
    }

    #[tokio::test]
    async fn test_skip_optional_phases() {
        let options = PollOptions {
            client_data: false,
            hardware: false,
        };
        let report = poll_device(lab("a"), ConnectorSettings::default(), options).await;
        assert_eq!(report.phase, Phase::BasicLoaded);
        assert_eq!(report.kind, Some(ConnectorKind::Dummy));
    }

    #[tokio::test]
    async fn test_clients_use_configured_mac_format() {
        let settings = ConnectorSettings {
            mac_format: MacFormat::Cisco,
            ..Default::default()
        };
        let report = poll_device(lab("a"), settings, PollOptions::default()).await;
        assert_eq!(report.clients.len(), 1);
        assert_eq!(report.clients[0].mac, "0004.f212.3456");
        assert_eq!(report.clients[0].vendor, Some("Polycom"));

        let skipped = PollOptions {
            client_data: false,
            hardware: false,
        };
        let report = poll_device(lab("a"), ConnectorSettings::default(), skipped).await;
        assert!(report.clients.is_empty());
    }

    #[tokio::test]
    async fn test_poll_loop_runs_and_stops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut poll_loop = PollLoop::new(vec![lab("a")], ConnectorSettings::default(), PollOptions::default(), 1, 60);
        poll_loop.start(move |reports| {
            let _ = tx.send(reports.len());
        });
        // the first tick fires immediately
        assert_eq!(rx.recv().await, Some(1));
        poll_loop.stop();
        assert_ok!(tokio::time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await);
    }
}
