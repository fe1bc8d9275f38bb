//! Zone-count notifications.
//!
//! [`WebhookNotifier`] posts a chat-style JSON message (Discord/Slack
//! compatible `content` field); [`LogNotifier`] is used when no webhook is
//! configured.

mod log;
mod webhook;

use async_trait::async_trait;
use serde::Serialize;
use smc_core::TimeFrame;
use thiserror::Error;

pub use self::{log::LogNotifier, webhook::WebhookNotifier};

/// What a notifier is told after an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSummary {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub bar_count: usize,
    pub zone_count: usize,
}

impl ZoneSummary {
    /// One-line human summary, e.g. `"BTC/USDT 1h: We found 4 order blocks in the last 500 candles."`.
    pub fn message(&self) -> String {
        format!("{} {}: {}", self.symbol, self.timeframe, insight(self.zone_count, self.bar_count))
    }
}

/// The analysis headline shown to the user.
pub fn insight(zone_count: usize, bar_count: usize) -> String {
    format!("We found {zone_count} order blocks in the last {bar_count} candles.")
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook answered HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, summary: &ZoneSummary) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_wording() {
        assert_eq!(insight(4, 500), "We found 4 order blocks in the last 500 candles.");
        assert_eq!(insight(1, 20), "We found 1 order blocks in the last 20 candles.");
        assert_eq!(insight(0, 3), "We found 0 order blocks in the last 3 candles.");
    }

    #[test]
    fn message_is_prefixed_with_market() {
        let summary = ZoneSummary {
            symbol: "ETHUSDT".into(),
            timeframe: "4h".parse().unwrap(),
            bar_count: 100,
            zone_count: 2,
        };
        assert_eq!(summary.message(), "ETHUSDT 4h: We found 2 order blocks in the last 100 candles.");
    }
}
