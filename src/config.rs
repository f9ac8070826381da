use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::warn;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub check_period_secs: u64,
    pub offline_threshold: u32,
    pub hosts: Vec<String>,
    /// Stop after this many rounds; 0 runs indefinitely. Test harness knob.
    pub max_rounds: u64,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self> {
        let bot_token = env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?;
        let chat_id = env::var("BOT_CHAT_ID").context("BOT_CHAT_ID is not set")?;
        let check_period_secs = parse_var("CHECK_PERIOD", 5)?;
        let offline_threshold = parse_var("OFFLINE_THRESHOLD", 3)?;
        let max_rounds = parse_var("TEST_MAX_LOOPS", 0)?;
        let hosts = parse_host_list(&env::var("HOSTS").unwrap_or_else(|_| "localhost".into()))?;

        Ok(Self {
            bot_token,
            chat_id,
            check_period_secs,
            offline_threshold,
            hosts,
            max_rounds,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn parse_host_list(raw: &str) -> Result<Vec<String>> {
    let mut hosts = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            warn!("ignoring empty entry in HOSTS");
            continue;
        }
        hosts.push(entry.to_string());
    }
    if hosts.is_empty() {
        bail!("HOSTS contains no usable entries: {raw:?}");
    }
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_host_list_on_commas() {
        let hosts = parse_host_list("router,nas, web-1").unwrap();
        assert_eq!(hosts, vec!["router", "nas", "web-1"]);
    }

    #[test]
    fn ignores_empty_entries() {
        let hosts = parse_host_list("router,,nas,").unwrap();
        assert_eq!(hosts, vec!["router", "nas"]);
    }

    #[test]
    fn rejects_effectively_empty_list() {
        assert!(parse_host_list("").is_err());
        assert!(parse_host_list(" , ,").is_err());
    }
}
