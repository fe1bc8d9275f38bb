//! Error types for series assembly and detection.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the detectors in [`crate::detector`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectorError {
    /// A detector parameter is outside its allowed range (e.g. `lookback < 1`).
    #[error("Invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// A bar failed validation in the strict detection path.
    #[error("Malformed bar at index {index}: {defect}")]
    MalformedBar {
        /// Position of the first offending bar in the input.
        index: usize,
        /// What was wrong with it.
        defect: BarDefect,
    },
}

/// The ways a single bar can violate the OHLC invariants.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BarDefect {
    /// One of open/high/low/close is NaN or infinite.
    #[error("price is not a finite number")]
    NonFinite,

    /// One of open/high/low/close is below zero.
    #[error("price is negative")]
    Negative,

    /// `low` is above the candle body.
    #[error("low {low} is above min(open, close) {body_low}")]
    LowAboveBody {
        /// The bar's low.
        low: f64,
        /// `min(open, close)`.
        body_low: f64,
    },

    /// `high` is below the candle body.
    #[error("high {high} is below max(open, close) {body_high}")]
    HighBelowBody {
        /// The bar's high.
        high: f64,
        /// `max(open, close)`.
        body_high: f64,
    },

    /// The bar does not come strictly after its predecessor.
    #[error("timestamp {current} does not follow {previous}")]
    OutOfOrder {
        /// Timestamp of the preceding bar.
        previous: DateTime<Utc>,
        /// Timestamp of this bar.
        current: DateTime<Utc>,
    },
}

/// Errors raised while assembling a [`crate::BarSeries`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// Bars are not strictly increasing by timestamp (out of order or duplicated).
    #[error("bar {index} at {current} does not follow the previous bar at {previous}")]
    NotStrictlyIncreasing {
        /// Position of the offending bar.
        index: usize,
        /// Timestamp of the preceding bar.
        previous: DateTime<Utc>,
        /// Timestamp of the offending bar.
        current: DateTime<Utc>,
    },
}
