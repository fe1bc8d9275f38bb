#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use smc_core::{Bar, BarSeries, TimeFrame};

pub fn hour(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i as i64)
}

/// Hourly bars with wicks one unit beyond the body on each side.
pub fn bars_from(opens: &[f64], closes: &[f64]) -> Vec<Bar> {
    assert_eq!(opens.len(), closes.len(), "opens and closes must line up");
    opens
        .iter()
        .zip(closes)
        .enumerate()
        .map(|(i, (&open, &close))| {
            Bar::new(hour(i), open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect()
}

pub fn series_from(opens: &[f64], closes: &[f64]) -> BarSeries {
    let timeframe: TimeFrame = "1h".parse().unwrap();
    BarSeries::new("BTCUSDT", timeframe, bars_from(opens, closes)).unwrap()
}
