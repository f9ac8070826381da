use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info};

use crate::config::MonitorConfig;
use crate::models::Host;
use crate::notify::Notifier;
use crate::probe::Prober;

/// The poll scheduler: drives rounds of concurrent probes across the host
/// registry, feeds outcomes through each host's state machine, and forwards
/// transition messages to the notifier.
pub struct Monitor<P, N> {
    config: MonitorConfig,
    prober: P,
    notifier: N,
    hosts: Vec<Host>,
}

impl<P: Prober, N: Notifier> Monitor<P, N> {
    pub fn new(config: MonitorConfig, prober: P, notifier: N) -> Self {
        info!(hosts = ?config.hosts, "initializing hosts");
        let hosts = config.hosts.iter().map(|name| Host::new(name)).collect();
        Self {
            config,
            prober,
            notifier,
            hosts,
        }
    }

    /// Run rounds until the shutdown channel flips or the configured round
    /// bound is reached. A shutdown signal takes effect at the round
    /// boundary; an in-flight round always finishes first.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        self.send_notification("\u{23F0} Downtime monitor starting up...")
            .await;

        let mut rounds: u64 = 0;
        loop {
            self.run_round().await;
            rounds += 1;

            if self.config.max_rounds != 0 && rounds >= self.config.max_rounds {
                info!(
                    max_rounds = self.config.max_rounds,
                    "maximum round count reached, shutting down"
                );
                break;
            }

            debug!(
                seconds = self.config.check_period_secs,
                "scheduled next check"
            );
            tokio::select! {
                _ = time::sleep(Duration::from_secs(self.config.check_period_secs)) => {}
                _ = shutdown.changed() => {
                    info!("shutdown requested, stopping at round boundary");
                    break;
                }
            }
        }

        self.send_notification("\u{1F4A4} Downtime monitor shutting down.")
            .await;
        info!("shutdown");
    }

    /// One round: probe every host concurrently, then evaluate each host
    /// exactly once and notify for committed transitions. Probe failures are
    /// contained per host and count as unreachable.
    async fn run_round(&mut self) {
        debug!("checking all hosts");

        let prober = &self.prober;
        let mut probes: FuturesUnordered<_> = self
            .hosts
            .iter()
            .enumerate()
            .map(|(idx, host)| {
                let name = host.name.clone();
                async move {
                    let reachable = match prober.probe(&name).await {
                        Ok(alive) => alive,
                        Err(e) => {
                            error!(host = %name, error = %e, "probe error, treating host as unreachable");
                            false
                        }
                    };
                    (idx, reachable)
                }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(self.hosts.len());
        while let Some(outcome) = probes.next().await {
            outcomes.push(outcome);
        }
        drop(probes);

        for (idx, reachable) in outcomes {
            let threshold = self.config.offline_threshold;
            if let Some(message) = self.hosts[idx].evaluate(reachable, threshold) {
                self.send_notification(&message).await;
            }
        }
    }

    async fn send_notification(&self, text: &str) {
        if let Err(e) = self.notifier.notify(text).await {
            error!(error = %e, "error while trying to send notification");
        }
    }
}
