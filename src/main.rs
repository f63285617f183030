mod config;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use switch_connect::poller::{self, PollLoop, PollReport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switch_connect=info,switch_poll=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = Config::load();
    if cfg.addresses.is_empty() {
        anyhow::bail!("SWITCH_ADDRESSES is empty, nothing to poll");
    }
    tracing::info!("Polling {} device(s), concurrency {}", cfg.addresses.len(), cfg.poll_concurrency);

    let cancel = CancellationToken::new();
    let settings = cfg.connector_settings(cancel.clone());
    let descriptors = cfg.descriptors();
    let options = cfg.poll_options();

    if cfg.poll_interval_secs == 0 {
        let poll = poller::poll_many(descriptors, settings, options, cfg.poll_concurrency);
        let reports = tokio::select! {
            reports = poll => reports,
            _ = shutdown_signal() => {
                tracing::info!("Interrupted, cancelling in-flight polls");
                cancel.cancel();
                return Ok(());
            }
        };
        let failed = reports.iter().filter(|r| r.error.is_some()).count();
        print_round(&reports)?;
        if failed > 0 {
            anyhow::bail!("{} of {} devices failed", failed, reports.len());
        }
        return Ok(());
    }

    let mut poll_loop = PollLoop::new(
        descriptors,
        settings,
        options,
        cfg.poll_concurrency,
        cfg.poll_interval_secs,
    );
    poll_loop.start(move |reports| {
        if let Err(e) = print_round(&reports) {
            tracing::error!("Failed to write poll round: {}", e);
        }
    });

    shutdown_signal().await;
    tracing::info!("switch-poll shutting down");
    cancel.cancel();
    poll_loop.stop();
    Ok(())
}

/// Write one JSON line per report.
fn print_round(reports: &[PollReport]) -> anyhow::Result<()> {
    for report in reports {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
