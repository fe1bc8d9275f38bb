use smc_core::TimeFrame;

use crate::providers::{ProviderError, ValidationSnafu};

/// Most klines Binance returns for a single request.
pub const MAX_KLINES_PER_REQUEST: u32 = 1000;

/// Kline intervals accepted by `/api/v3/klines`, in [`TimeFrame`] display form.
pub const SUPPORTED_INTERVALS: [&str; 15] = [
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Turns `BTC/USDT`, `btc-usdt` or `BTCUSDT` into Binance's `BTCUSDT`.
pub fn normalize_symbol(symbol: &str) -> Result<String, ProviderError> {
    let normalized: String = symbol
        .chars()
        .filter(|c| !matches!(c, '/' | '-' | '_' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
        return ValidationSnafu {
            message: format!("invalid symbol {symbol:?} (expected something like BTC/USDT)"),
        }
        .fail();
    }
    Ok(normalized)
}

/// Maps a timeframe onto a Binance interval string.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<String, ProviderError> {
    let interval = timeframe.to_string();
    if SUPPORTED_INTERVALS.contains(&interval.as_str()) {
        Ok(interval)
    } else {
        ValidationSnafu {
            message: format!(
                "timeframe {interval} is not offered by Binance (supported: {})",
                SUPPORTED_INTERVALS.join(", ")
            ),
        }
        .fail()
    }
}

/// Builds the query string for one page of klines.
pub fn construct_params(
    symbol: &str,
    interval: &str,
    limit: u32,
    end_time_ms: Option<i64>,
) -> Vec<(String, String)> {
    let mut query = vec![
        ("symbol".to_string(), symbol.to_string()),
        ("interval".to_string(), interval.to_string()),
        ("limit".to_string(), limit.min(MAX_KLINES_PER_REQUEST).to_string()),
    ];
    if let Some(end) = end_time_ms {
        query.push(("endTime".to_string(), end.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_normalised() {
        assert_eq!(normalize_symbol("BTC/USDT").unwrap(), "BTCUSDT");
        assert_eq!(normalize_symbol("eth-usdt").unwrap(), "ETHUSDT");
        assert_eq!(normalize_symbol(" SOLUSDT ").unwrap(), "SOLUSDT");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("//").is_err());
        assert!(normalize_symbol("BTC$USDT").is_err());
    }

    #[test]
    fn common_timeframes_map_to_intervals() {
        for tf in ["15m", "1h", "4h", "1d"] {
            assert_eq!(validate_timeframe(&tf.parse().unwrap()).unwrap(), tf);
        }
        assert_eq!(validate_timeframe(&"1M".parse().unwrap()).unwrap(), "1M");
    }

    #[test]
    fn unsupported_timeframes_are_rejected() {
        for tf in ["7m", "5h", "2d", "2w"] {
            let err = validate_timeframe(&tf.parse().unwrap()).unwrap_err();
            assert!(matches!(err, ProviderError::Validation { .. }), "{tf}");
        }
    }

    #[test]
    fn query_caps_limit_and_adds_end_time() {
        let query = construct_params("BTCUSDT", "1h", 5000, Some(1_700_000_000_000));
        assert!(query.contains(&("limit".to_string(), "1000".to_string())));
        assert!(query.contains(&("endTime".to_string(), "1700000000000".to_string())));

        let query = construct_params("BTCUSDT", "1h", 500, None);
        assert_eq!(query.len(), 3);
    }
}
