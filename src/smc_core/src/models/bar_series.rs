//! A collection of time-series bars for a specific symbol and timeframe.

use serde::{Deserialize, Serialize};

use crate::{
    errors::SeriesError,
    models::{bar::Bar, timeframe::TimeFrame},
};

/// Represents a complete set of time-series data for a single symbol.
///
/// Bars are strictly increasing by timestamp: no duplicates and no
/// out-of-order entries. Calendar gaps are allowed and passed through as-is.
/// The invariant is checked on construction and on deserialization, so every
/// `BarSeries` in memory satisfies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBarSeries")]
pub struct BarSeries {
    symbol: String,
    timeframe: TimeFrame,
    bars: Vec<Bar>,
}

#[derive(Deserialize)]
struct RawBarSeries {
    symbol: String,
    timeframe: TimeFrame,
    bars: Vec<Bar>,
}

impl TryFrom<RawBarSeries> for BarSeries {
    type Error = SeriesError;

    fn try_from(raw: RawBarSeries) -> Result<Self, Self::Error> {
        BarSeries::new(raw.symbol, raw.timeframe, raw.bars)
    }
}

impl BarSeries {
    /// Creates a series, rejecting bars that are not strictly increasing by timestamp.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: TimeFrame,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        if let Some((index, pair)) = bars
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesError::NotStrictlyIncreasing {
                index: index + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }

        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Creates a series from bars in any order.
    ///
    /// Bars are sorted by timestamp; when several share a timestamp the one
    /// that appeared first in the input is kept. Providers that stitch pages
    /// together use this.
    pub fn from_unordered(symbol: impl Into<String>, timeframe: TimeFrame, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        bars.dedup_by_key(|bar| bar.timestamp);
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    /// The symbol this data represents (e.g. "BTCUSDT").
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The time interval for each bar in the series.
    pub fn timeframe(&self) -> TimeFrame {
        self.timeframe
    }

    /// The bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// `true` when the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The oldest bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// The most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Keeps only the `count` most recent bars.
    pub fn tail(mut self, count: usize) -> Self {
        let excess = self.bars.len().saturating_sub(count);
        self.bars.drain(..excess);
        self
    }

    /// Consumes the series and returns its bars.
    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn bars_at(hours: &[i64]) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        hours
            .iter()
            .map(|h| Bar::new(base + Duration::hours(*h), 1.0, 2.0, 0.5, 1.5))
            .collect()
    }

    fn tf() -> TimeFrame {
        "1h".parse().unwrap()
    }

    #[test]
    fn accepts_gaps() {
        let series = BarSeries::new("BTCUSDT", tf(), bars_at(&[0, 1, 5, 6])).unwrap();
        assert_eq!(series.len(), 4);
        assert_eq!(series.symbol(), "BTCUSDT");
    }

    #[test]
    fn rejects_duplicates_and_out_of_order() {
        let err = BarSeries::new("X", tf(), bars_at(&[0, 1, 1])).unwrap_err();
        assert!(matches!(err, SeriesError::NotStrictlyIncreasing { index: 2, .. }));

        let err = BarSeries::new("X", tf(), bars_at(&[0, 2, 1])).unwrap_err();
        assert!(matches!(err, SeriesError::NotStrictlyIncreasing { index: 2, .. }));
    }

    #[test]
    fn from_unordered_sorts_and_dedups() {
        let series = BarSeries::from_unordered("X", tf(), bars_at(&[3, 1, 2, 1, 0]));
        let hours: Vec<i64> = series
            .bars()
            .iter()
            .map(|b| (b.timestamp - series.bars()[0].timestamp).num_hours())
            .collect();
        assert_eq!(hours, vec![0, 1, 2, 3]);
    }

    #[test]
    fn tail_keeps_most_recent() {
        let series = BarSeries::new("X", tf(), bars_at(&[0, 1, 2, 3])).unwrap();
        let last = series.last().cloned();
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.last().cloned(), last);

        let all = BarSeries::new("X", tf(), bars_at(&[0, 1])).unwrap().tail(10);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn deserialization_enforces_ordering() {
        let ok = r#"{"symbol":"X","timeframe":"1h","bars":[
            {"timestamp":"2024-01-01T00:00:00Z","open":1,"high":2,"low":0.5,"close":1.5},
            {"timestamp":"2024-01-01T01:00:00Z","open":1,"high":2,"low":0.5,"close":1.5}]}"#;
        let series: BarSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.len(), 2);

        let bad = r#"{"symbol":"X","timeframe":"1h","bars":[
            {"timestamp":"2024-01-01T01:00:00Z","open":1,"high":2,"low":0.5,"close":1.5},
            {"timestamp":"2024-01-01T00:00:00Z","open":1,"high":2,"low":0.5,"close":1.5}]}"#;
        assert!(serde_json::from_str::<BarSeries>(bad).is_err());
    }
}
