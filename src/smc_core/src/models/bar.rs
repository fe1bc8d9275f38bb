//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! [`Bar`] is the standard output of every market-data provider, regardless of
//! exchange. Detectors never read its fields directly: they go through
//! [`OhlcBar`], so a caller holding its own candle type can run detection
//! without converting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only access to one OHLC observation.
///
/// This is the whole contract between a detector and its input. Prices are
/// read as given; nothing here checks `low <= open <= high` and friends (see
/// [`crate::validate_bars`] for that).
pub trait OhlcBar {
    /// Start of the bar interval. Defines ordering within a sequence.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Opening price.
    fn open(&self) -> f64;

    /// Highest price during the interval.
    fn high(&self) -> f64;

    /// Lowest price during the interval.
    fn low(&self) -> f64;

    /// Closing price.
    fn close(&self) -> f64;

    /// Strictly bearish body. A doji (`close == open`) is not a down-candle.
    fn is_down_candle(&self) -> bool {
        self.close() < self.open()
    }

    /// Strictly higher close than `previous`. A flat close is not an up-move.
    fn is_up_move_from(&self, previous: &Self) -> bool {
        self.close() > previous.close()
    }
}

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Base-asset volume traded during the bar interval.
    #[serde(default)]
    pub volume: f64,

    /// Trade count for the bar. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
}

impl Bar {
    /// Creates a bar with zero volume and no trade count.
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
            trade_count: None,
        }
    }

    /// Sets the traded volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

impl OhlcBar for Bar {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn bar(open: f64, close: f64) -> Bar {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        Bar::new(t, open, open.max(close), open.min(close), close)
    }

    #[test]
    fn down_candle_requires_strictly_lower_close() {
        assert!(bar(10.0, 9.0).is_down_candle());
        assert!(!bar(10.0, 10.0).is_down_candle());
        assert!(!bar(9.0, 10.0).is_down_candle());
    }

    #[test]
    fn up_move_requires_strictly_higher_close() {
        let prev = bar(10.0, 9.0);
        assert!(bar(9.0, 9.5).is_up_move_from(&prev));
        assert!(!bar(9.5, 9.0).is_up_move_from(&prev));
        assert!(!bar(8.0, 8.5).is_up_move_from(&prev));
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{"timestamp":"2024-03-01T00:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, 0.0);
        assert_eq!(bar.trade_count, None);
        assert_eq!(bar.close, 1.5);
    }
}
