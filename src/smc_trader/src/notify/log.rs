use async_trait::async_trait;
use tracing::info;

use super::{Notifier, NotifyError, ZoneSummary};

/// Writes the summary to the log instead of sending it anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, summary: &ZoneSummary) -> Result<(), NotifyError> {
        info!(
            symbol = %summary.symbol,
            timeframe = %summary.timeframe,
            zones = summary.zone_count,
            bars = summary.bar_count,
            "{}",
            summary.message()
        );
        Ok(())
    }
}
