use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use smc_core::TimeFrame;
use tracing::debug;

use super::{Notifier, NotifyError, ZoneSummary};

const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: String,
    symbol: &'a str,
    timeframe: TimeFrame,
    zone_count: usize,
    bar_count: usize,
}

pub struct WebhookNotifier {
    client: Client,
    url: SecretString,
}

impl WebhookNotifier {
    pub fn new(url: SecretString) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, summary: &ZoneSummary) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            content: summary.message(),
            symbol: &summary.symbol,
            timeframe: summary.timeframe,
            zone_count: summary.zone_count,
            bar_count: summary.bar_count,
        };

        let response = self
            .client
            .post(self.url.expose_secret())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        debug!(status = status.as_u16(), "webhook delivered");
        Ok(())
    }
}
