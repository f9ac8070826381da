use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Bound on the whole delivery attempt so a stalled connection cannot wedge
/// the round that awaits it.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers one text message to the fixed destination chat.
///
/// Best effort: the caller logs failures and never retries, and a failed
/// delivery must not disturb already-committed host state.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

pub struct TelegramNotifier {
    http: reqwest::Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self> {
        Self::with_endpoint(
            format!("https://api.telegram.org/bot{bot_token}/sendMessage"),
            chat_id,
            NOTIFY_TIMEOUT,
        )
    }

    fn with_endpoint(url: String, chat_id: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url,
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .context("Telegram sendMessage request failed")?;
        response
            .error_for_status()
            .context("Telegram sendMessage rejected")?;
        Ok(())
    }
}
