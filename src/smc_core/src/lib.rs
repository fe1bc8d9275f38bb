//! Core data model and order-block detection for the SMC trader.
//!
//! This crate is pure: no I/O, no logging, no global state. Market data arrives
//! as a [`BarSeries`] built by a provider (see the `market_data_ingestor` crate),
//! and detection returns plain [`OrderBlockZone`] values for renderers and
//! notifiers to consume.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use smc_core::{Bar, BarSeries, TimeFrame, detect};
//!
//! let t = |h| Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap();
//! let bars = vec![
//!     Bar::new(t(0), 10.0, 11.0, 9.0, 10.0),
//!     Bar::new(t(1), 10.0, 10.5, 8.5, 9.0), // down-candle
//!     Bar::new(t(2), 9.0, 12.5, 9.0, 12.0), // higher close
//!     Bar::new(t(3), 12.0, 13.5, 11.5, 13.0),
//! ];
//! let series = BarSeries::new("BTCUSDT", "1h".parse::<TimeFrame>().unwrap(), bars).unwrap();
//!
//! let zones = detect(&series, 1).unwrap();
//! assert_eq!(zones.len(), 1);
//! assert_eq!(zones[0].anchor_time, t(1));
//! ```

#![deny(missing_docs)]

pub mod detector;
pub mod errors;
pub mod models;

pub use detector::{Lookback, OrderBlockDetector, detect, validate::validate_bars};
pub use errors::{BarDefect, DetectorError, SeriesError};
pub use models::{
    bar::{Bar, OhlcBar},
    bar_series::BarSeries,
    timeframe::{TimeFrame, TimeFrameError, TimeFrameUnit},
    zone::{OrderBlockZone, ZoneDirection},
};
