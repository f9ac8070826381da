use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use surge_ping::{Client as PingClient, Config as PingConfig, PingIdentifier, PingSequence};
use tracing::debug;

/// Per-probe bound so a stuck target cannot stall the whole round.
const PROBE_TIMEOUT: Duration = Duration::from_millis(3500);

/// A single reachability check against one host.
///
/// `Ok(false)` means the host did not answer; `Err` means the probe itself
/// failed (name resolution, socket setup). The scheduler maps both to
/// "unreachable" and never lets either abort a round.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &str) -> Result<bool>;
}

pub struct PingProber {
    client: PingClient,
    resolver: TokioResolver,
}

impl PingProber {
    pub fn new() -> Result<Self> {
        let client = PingClient::new(&PingConfig::default())
            .context("failed to create ICMP client (raw sockets may require elevated privileges)")?;
        let resolver = TokioResolver::builder_tokio()
            .context("failed to read system resolver configuration")?
            .build();
        Ok(Self { client, resolver })
    }

    async fn resolve(&self, host: &str) -> Result<IpAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(ip);
        }
        let lookup = self
            .resolver
            .lookup_ip(host)
            .await
            .with_context(|| format!("DNS resolution failed for {host}"))?;
        lookup
            .iter()
            .next()
            .with_context(|| format!("no address records for {host}"))
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &str) -> Result<bool> {
        let ip = self.resolve(host).await?;

        let payload = [0u8; 56];
        let mut pinger = self.client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(PROBE_TIMEOUT);

        match pinger.ping(PingSequence(0), &payload).await {
            Ok((_, latency)) => {
                debug!(host, ip = %ip, latency_ms = latency.as_millis() as u64, "echo reply");
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}
