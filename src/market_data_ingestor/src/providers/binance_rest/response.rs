use chrono::DateTime;
use serde::{Deserialize, Deserializer, de::IgnoredAny};
use smc_core::Bar;

/// One row of `/api/v3/klines`.
///
/// Binance encodes a kline as a positional JSON array with prices as decimal
/// strings:
/// `[openTime, "open", "high", "low", "close", "volume", closeTime, "quoteVolume",
///   trades, "takerBuyBase", "takerBuyQuote", "ignore"]`.
#[derive(Deserialize, Debug)]
pub struct BinanceKline {
    pub open_time: i64,
    #[serde(deserialize_with = "decimal_str")]
    pub open: f64,
    #[serde(deserialize_with = "decimal_str")]
    pub high: f64,
    #[serde(deserialize_with = "decimal_str")]
    pub low: f64,
    #[serde(deserialize_with = "decimal_str")]
    pub close: f64,
    #[serde(deserialize_with = "decimal_str")]
    pub volume: f64,
    pub close_time: i64,
    _quote_volume: IgnoredAny,
    pub trade_count: u64,
    _taker_buy_base_volume: IgnoredAny,
    _taker_buy_quote_volume: IgnoredAny,
    _unused: IgnoredAny,
}

impl BinanceKline {
    /// Converts to the canonical bar. `None` if the open time is out of range.
    pub fn into_bar(self) -> Option<Bar> {
        let timestamp = DateTime::from_timestamp_millis(self.open_time)?;
        let mut bar = Bar::new(timestamp, self.open, self.high, self.low, self.close).with_volume(self.volume);
        bar.trade_count = Some(self.trade_count);
        Some(bar)
    }
}

fn decimal_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
