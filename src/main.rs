use std::future::Future;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;

mod config;
mod engine;
mod models;
mod notify;
mod probe;

use crate::config::MonitorConfig;
use crate::engine::Monitor;
use crate::notify::TelegramNotifier;
use crate::probe::PingProber;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(true)
        .init();

    let config = MonitorConfig::from_env()?;
    info!("startup");

    let notifier = TelegramNotifier::new(&config.bot_token, &config.chat_id)?;
    let prober = PingProber::new()?;
    let mut monitor = Monitor::new(config, prober, notifier);

    // Handler registration happens before the first round; a failure aborts
    // startup here. The spawned task owns the sender until a signal arrives,
    // so the monitor never sees a closed channel while running unsignalled.
    let signals = shutdown_signal().context("failed to install signal handlers")?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        signals.await;
        let _ = shutdown_tx.send(true);
    });

    monitor.run(shutdown_rx).await;
    Ok(())
}

/// Registers the termination handlers and returns a future that resolves when
/// the process is asked to stop. SIGINT and SIGTERM share the same graceful
/// path.
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        Ok(async move {
            tokio::select! {
                _ = interrupt.recv() => info!("SIGINT received"),
                _ = terminate.recv() => info!("SIGTERM received"),
            }
        })
    }
    #[cfg(not(unix))]
    {
        Ok(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                // Without a working handler, wait forever rather than
                // fabricate a shutdown request.
                std::future::pending::<()>().await;
            }
            info!("ctrl-c received");
        })
    }
}
