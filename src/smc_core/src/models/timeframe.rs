//! Timeframe utilities for expressing uniform bar intervals.
//!
//! A [`TimeFrame`] pairs a non-zero amount with a [`TimeFrameUnit`]. It parses
//! and displays in the exchange shorthand used on the command line and in
//! config files (`15m`, `1h`, `4h`, `1d`, `1w`, `1M`), and serializes as that
//! same string.
//!
//! ```
//! use smc_core::{TimeFrame, TimeFrameUnit};
//!
//! let tf: TimeFrame = "4h".parse().unwrap();
//! assert_eq!(tf.amount().get(), 4);
//! assert_eq!(tf.unit(), TimeFrameUnit::Hour);
//! assert_eq!(tf.to_string(), "4h");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a timeframe string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFrameError {
    /// The input was empty or whitespace.
    #[error("empty timeframe")]
    Empty,

    /// The numeric part is missing, zero, or not a number.
    #[error("invalid amount in timeframe {input:?}: must be a positive integer")]
    InvalidAmount {
        /// The rejected input.
        input: String,
    },

    /// The unit suffix is not one of `m`, `h`, `d`, `w`, `M`.
    #[error("unknown unit {unit:?} in timeframe {input:?} (expected m, h, d, w or M)")]
    UnknownUnit {
        /// The rejected input.
        input: String,
        /// The unrecognised suffix.
        unit: String,
    },
}

/// Timeframe granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFrameUnit {
    /// UTC minute
    Minute,
    /// UTC hour
    Hour,
    /// UTC day
    Day,
    /// Calendar week
    Week,
    /// Calendar month
    Month,
}

impl TimeFrameUnit {
    /// Shorthand suffix (`m`, `h`, `d`, `w`, `M`).
    pub const fn suffix(self) -> &'static str {
        match self {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "d",
            TimeFrameUnit::Week => "w",
            TimeFrameUnit::Month => "M",
        }
    }
}

/// A timeframe = amount × unit (e.g. 15-Minute, 4-Hour, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFrame {
    amount: NonZeroU32,
    unit: TimeFrameUnit,
}

impl TimeFrame {
    /// Creates a new timeframe.
    pub const fn new(amount: NonZeroU32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    /// The magnitude component.
    pub const fn amount(&self) -> NonZeroU32 {
        self.amount
    }

    /// The unit component.
    pub const fn unit(&self) -> TimeFrameUnit {
        self.unit
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(last) = s.chars().last() else {
            return Err(TimeFrameError::Empty);
        };
        let (digits, unit) = s.split_at(s.len() - last.len_utf8());

        let amount = digits
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| TimeFrameError::InvalidAmount {
                input: s.to_string(),
            })?;
        // `M` is month and `m` is minute, so only day and week are case-insensitive.
        let unit = match unit {
            "m" => TimeFrameUnit::Minute,
            "h" | "H" => TimeFrameUnit::Hour,
            "d" | "D" => TimeFrameUnit::Day,
            "w" | "W" => TimeFrameUnit::Week,
            "M" => TimeFrameUnit::Month,
            other => {
                return Err(TimeFrameError::UnknownUnit {
                    input: s.to_string(),
                    unit: other.to_string(),
                });
            }
        };
        Ok(TimeFrame::new(amount, unit))
    }
}

impl TryFrom<String> for TimeFrame {
    type Error = TimeFrameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeFrame> for String {
    fn from(value: TimeFrame) -> Self {
        value.to_string()
    }
}
