use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smc_core::TimeFrame;

/// Universal parameters for requesting the most recent bars of one symbol.
///
/// This struct is vendor-agnostic and is the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Symbol to request. Providers normalise the spelling, so `BTC/USDT`,
    /// `btc-usdt` and `BTCUSDT` are all accepted by the Binance provider.
    pub symbol: String,

    /// The time interval for each bar.
    ///
    /// **Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.**
    pub timeframe: TimeFrame,

    /// How many of the most recent bars to return. Must be at least 1.
    pub limit: u32,

    /// Only return bars that open before this instant. `None` means "up to now".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl BarsRequestParams {
    /// Number of candles fetched when the caller does not say otherwise.
    pub const DEFAULT_LIMIT: u32 = 500;

    /// Requests the latest [`Self::DEFAULT_LIMIT`] bars.
    pub fn new(symbol: impl Into<String>, timeframe: TimeFrame) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            limit: Self::DEFAULT_LIMIT,
            end: None,
        }
    }

    /// Overrides the number of bars.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Restricts the request to bars opening before `end`.
    pub fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }
}
