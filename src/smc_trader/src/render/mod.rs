//! Chart output.
//!
//! [`zone_overlays`] turns detector output into rectangles in chart
//! coordinates (time on x, price on y); a [`ChartRenderer`] draws them on top
//! of the candles.

mod svg;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use smc_core::{BarSeries, OrderBlockZone, ZoneDirection};
use thiserror::Error;

pub use self::svg::SvgChartRenderer;

/// Fill opacity of zone rectangles.
pub const ZONE_OPACITY: f64 = 0.3;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to draw: the series has no bars")]
    EmptySeries,

    #[error("failed to format chart: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("failed to write chart to {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A zone rectangle: from the anchor bar to the last bar on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneOverlay {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub low: f64,
    pub high: f64,
    pub color: &'static str,
    pub opacity: f64,
    pub label: String,
}

pub fn zone_color(direction: ZoneDirection) -> &'static str {
    match direction {
        ZoneDirection::Bullish => "green",
    }
}

/// Rectangles for `zones`, extended to the last bar of `series`.
///
/// Empty when the series is empty.
pub fn zone_overlays(series: &BarSeries, zones: &[OrderBlockZone]) -> Vec<ZoneOverlay> {
    let Some(last) = series.last() else {
        return Vec::new();
    };
    zones
        .iter()
        .map(|zone| ZoneOverlay {
            start: zone.anchor_time,
            end: last.timestamp,
            low: zone.low,
            high: zone.high,
            color: zone_color(zone.direction),
            opacity: ZONE_OPACITY,
            label: format!(
                "{} order block {} [{} - {}]",
                zone.direction.as_str(),
                zone.anchor_time.format("%Y-%m-%d %H:%M UTC"),
                zone.low,
                zone.high
            ),
        })
        .collect()
}

/// Draws a candlestick chart with zone overlays.
pub trait ChartRenderer {
    /// Renders the chart document.
    fn render(&self, series: &BarSeries, zones: &[OrderBlockZone]) -> Result<String, RenderError>;

    /// Renders and writes the chart to `path`, creating parent directories.
    fn render_to_file(
        &self,
        series: &BarSeries,
        zones: &[OrderBlockZone],
        path: &Path,
    ) -> Result<(), RenderError> {
        let document = self.render(series, zones)?;
        let io_err = |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, document).map_err(io_err)
    }
}

/// Chart title used by every renderer.
pub fn chart_title(symbol: &str) -> String {
    format!("{symbol} - Smart Money Analysis")
}
