use std::{fmt, iter, num::NonZeroUsize};

use crate::{
    detector::validate::validate_bars,
    errors::DetectorError,
    models::{bar::OhlcBar, bar_series::BarSeries, zone::OrderBlockZone},
};

/// Number of consecutive higher closes required after an anchor bar.
///
/// Always at least 1. Construct from untrusted integers with [`Lookback::new`],
/// which rejects zero and negative values instead of clamping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lookback(NonZeroUsize);

impl Lookback {
    /// Validates a raw lookback value.
    ///
    /// # Errors
    /// [`DetectorError::InvalidArgument`] if `value < 1`.
    pub fn new(value: i64) -> Result<Self, DetectorError> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or_else(|| DetectorError::InvalidArgument {
                name: "lookback",
                message: format!("must be a positive integer, got {value}"),
            })
    }

    /// The lookback as a plain count.
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Shortest series that can contain an anchor: a predecessor, the anchor,
    /// and `lookback` confirmation bars.
    pub const fn min_bars(self) -> usize {
        self.0.get().saturating_add(2)
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finds bearish bars that are immediately followed by a run of higher closes.
///
/// Bar `i` anchors a zone when
/// - `close[i] < open[i]` (a doji does not count), and
/// - `close[j] > close[j - 1]` for every `j` in `i + 1 ..= i + lookback`
///   (a flat close breaks the run).
///
/// Anchors range over `1 ..= len - lookback - 1`: the first bar is never an
/// anchor and neither are the last `lookback` bars. Every qualifying anchor
/// yields exactly one zone, in scan order; overlapping or nested zones are not
/// merged.
///
/// The detector holds only its parameter, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBlockDetector {
    lookback: Lookback,
}

impl OrderBlockDetector {
    /// Creates a detector from a raw lookback.
    ///
    /// # Errors
    /// [`DetectorError::InvalidArgument`] if `lookback < 1`.
    pub fn new(lookback: i64) -> Result<Self, DetectorError> {
        Ok(Self::with_lookback(Lookback::new(lookback)?))
    }

    /// Creates a detector from an already validated lookback.
    pub const fn with_lookback(lookback: Lookback) -> Self {
        Self { lookback }
    }

    /// The configured lookback.
    pub const fn lookback(&self) -> Lookback {
        self.lookback
    }

    /// Scans `bars` (oldest first) and returns the zones in anchor order.
    ///
    /// Inputs shorter than [`Lookback::min_bars`] yield an empty result. Bar
    /// values are used as given; see [`Self::detect_strict`] for a validating
    /// variant.
    pub fn detect<B: OhlcBar>(&self, bars: &[B]) -> Vec<OrderBlockZone> {
        let lookback = self.lookback.get();
        if bars.len() < self.lookback.min_bars() {
            return Vec::new();
        }

        let down_candle: Vec<bool> = bars.iter().map(|bar| bar.is_down_candle()).collect();
        let up_move: Vec<bool> = iter::once(false)
            .chain(bars.windows(2).map(|pair| pair[1].is_up_move_from(&pair[0])))
            .collect();

        let last_anchor = bars.len() - lookback - 1;
        (1..=last_anchor)
            .filter(|&i| down_candle[i] && up_move[i + 1..=i + lookback].iter().all(|&up| up))
            .map(|i| OrderBlockZone::bullish(&bars[i]))
            .collect()
    }

    /// [`Self::detect`] over a validated series.
    pub fn detect_series(&self, series: &BarSeries) -> Vec<OrderBlockZone> {
        self.detect(series.bars())
    }

    /// Validates every bar, then detects.
    ///
    /// # Errors
    /// [`DetectorError::MalformedBar`] for the first bar that breaks the OHLC
    /// invariants or does not follow its predecessor in time.
    pub fn detect_strict<B: OhlcBar>(&self, bars: &[B]) -> Result<Vec<OrderBlockZone>, DetectorError> {
        validate_bars(bars)?;
        Ok(self.detect(bars))
    }
}

/// Runs order-block detection over `series` with the given lookback.
///
/// # Errors
/// [`DetectorError::InvalidArgument`] if `lookback < 1`. A series that is too
/// short is not an error and yields no zones.
pub fn detect(series: &BarSeries, lookback: i64) -> Result<Vec<OrderBlockZone>, DetectorError> {
    Ok(OrderBlockDetector::new(lookback)?.detect_series(series))
}
