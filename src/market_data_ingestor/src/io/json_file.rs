//! Writes each series to its own pretty-printed JSON file.
//!
//! Files are named `<SYMBOL>_<timeframe>_<YYYYMMDDTHHMMSSfffZ>.json` and can be
//! read back with [`FileProvider`](crate::providers::file::FileProvider).

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use snafu::ResultExt;
use tracing::info;

use crate::{
    io::sink::{DataSink, EncodeSnafu, IoSnafu, SinkError},
    models::BarSeries,
};

pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_name(series: &BarSeries, stamp: &str) -> String {
        let symbol: String = series
            .symbol()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{symbol}_{}_{stamp}.json", series.timeframe())
    }
}

#[async_trait]
impl DataSink for JsonFileSink {
    type Output = Vec<PathBuf>;

    async fn write(&self, data: &[BarSeries]) -> Result<Self::Output, SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context(IoSnafu { path: &self.dir })?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%3fZ").to_string();
        let mut written = Vec::with_capacity(data.len());
        for series in data {
            let json = serde_json::to_vec_pretty(series).context(EncodeSnafu {
                symbol: series.symbol(),
            })?;
            let path = self.dir.join(Self::file_name(series, &stamp));
            tokio::fs::write(&path, json)
                .await
                .context(IoSnafu { path: &path })?;
            info!(path = %path.display(), bars = series.len(), "series written");
            written.push(path);
        }
        Ok(written)
    }
}
