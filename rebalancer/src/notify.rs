//! Post-run chat notification.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::{Error, Result};

/// Sink for the one-line run summary.
pub trait Notifier {
    fn notify(&self, text: &str) -> Result<()>;
}

/// Posts `{"text": ...}` to an incoming-webhook URL (Slack format).
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Notify(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, text: &str) -> Result<()> {
        debug!("Posting run summary to webhook");
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .map_err(|e| Error::Notify(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(Error::Notify(format!("webhook returned {status}: {body}")));
        }
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Webhook notifier when a URL is configured, otherwise a no-op.
pub fn from_config(config: &Config) -> Result<Box<dyn Notifier>> {
    match config.notify.webhook_url.as_deref() {
        Some(url) => Ok(Box::new(WebhookNotifier::new(
            url,
            config.request_timeout(),
        )?)),
        None => Ok(Box::new(NullNotifier)),
    }
}
