//! Reads bars from a JSON file written by [`JsonFileSink`](crate::io::json_file::JsonFileSink).
//!
//! Useful for offline analysis and for replaying a fetched snapshot.

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    models::{BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, DecodeSnafu, ProviderError, ReadFileSnafu, ValidationSnafu},
};

pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataProvider for FileProvider {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        if params.limit == 0 {
            return ValidationSnafu {
                message: "limit must be at least 1",
            }
            .fail();
        }

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .context(ReadFileSnafu { path: &self.path })?;
        let series: BarSeries = serde_json::from_str(&raw).context(DecodeSnafu {
            origin: self.path.display().to_string(),
        })?;

        if !series.symbol().eq_ignore_ascii_case(&params.symbol) {
            warn!(
                requested = %params.symbol,
                stored = %series.symbol(),
                path = %self.path.display(),
                "file holds a different symbol than requested"
            );
        }
        if series.timeframe() != params.timeframe {
            warn!(
                requested = %params.timeframe,
                stored = %series.timeframe(),
                "file holds a different timeframe than requested"
            );
        }

        let series = match params.end {
            Some(end) => {
                let symbol = series.symbol().to_string();
                let timeframe = series.timeframe();
                let bars = series
                    .into_bars()
                    .into_iter()
                    .filter(|bar| bar.timestamp < end)
                    .collect();
                BarSeries::from_unordered(symbol, timeframe, bars)
            }
            None => series,
        };

        debug!(path = %self.path.display(), available = series.len(), limit = params.limit, "bars loaded");
        Ok(series.tail(params.limit as usize))
    }
}
