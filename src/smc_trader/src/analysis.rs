//! Fetch → detect pipeline behind the `analyze` command.

use market_data_ingestor::{
    models::request_params::BarsRequestParams,
    providers::{DataProvider, ProviderError},
};
use serde::Serialize;
use smc_core::{BarSeries, OrderBlockDetector, OrderBlockZone};
use tracing::{debug, info};

use crate::notify::{ZoneSummary, insight};

/// Appended to the insight line.
pub const ZONE_HINT: &str =
    "In SMC, these green zones are where institutions (banks) likely placed buy orders.";

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub series: BarSeries,
    pub zones: Vec<OrderBlockZone>,
    pub detector: OrderBlockDetector,
}

/// JSON shape printed by `analyze --json`.
#[derive(Debug, Serialize)]
pub struct ZoneReport<'a> {
    pub symbol: &'a str,
    pub timeframe: String,
    pub lookback: usize,
    pub bar_count: usize,
    pub zones: &'a [OrderBlockZone],
}

impl AnalysisReport {
    pub fn summary(&self) -> ZoneSummary {
        ZoneSummary {
            symbol: self.series.symbol().to_string(),
            timeframe: self.series.timeframe(),
            bar_count: self.series.len(),
            zone_count: self.zones.len(),
        }
    }

    /// `"We found N order blocks in the last M candles."` plus [`ZONE_HINT`].
    pub fn insight(&self) -> String {
        format!("{} {ZONE_HINT}", insight(self.zones.len(), self.series.len()))
    }

    pub fn to_json_report(&self) -> ZoneReport<'_> {
        ZoneReport {
            symbol: self.series.symbol(),
            timeframe: self.series.timeframe().to_string(),
            lookback: self.detector.lookback().get(),
            bar_count: self.series.len(),
            zones: &self.zones,
        }
    }
}

/// Fetches bars for `params` and runs `detector` over them.
pub async fn analyze(
    provider: &dyn DataProvider,
    params: BarsRequestParams,
    detector: OrderBlockDetector,
) -> Result<AnalysisReport, ProviderError> {
    debug!(provider = provider.name(), symbol = %params.symbol, timeframe = %params.timeframe, limit = params.limit, "fetching bars");
    let series = provider.fetch_bars(params).await?;
    let zones = detector.detect_series(&series);
    info!(
        symbol = series.symbol(),
        timeframe = %series.timeframe(),
        bars = series.len(),
        zones = zones.len(),
        lookback = %detector.lookback(),
        "order blocks detected"
    );
    Ok(AnalysisReport {
        series,
        zones,
        detector,
    })
}
