use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var_opt;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    models::{Bar, BarSeries, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, ProviderError,
        ProviderInitError, ReqwestSnafu, ValidationSnafu,
        binance_rest::{
            params::{MAX_KLINES_PER_REQUEST, construct_params, normalize_symbol, validate_timeframe},
            response::BinanceKline,
        },
    },
};

const BASE_URL: &str = "https://api.binance.com";
const KLINES_PATH: &str = "/api/v3/klines";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const API_KEY_ENV: &str = "BINANCE_API_KEY";

pub struct BinanceProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl BinanceProvider {
    /// Creates a provider for the public Binance spot API.
    ///
    /// Reads an optional API key from the `BINANCE_API_KEY` environment
    /// variable. Without it the public endpoints are used anonymously.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = get_env_var_opt(API_KEY_ENV).map(|key| SecretString::new(key.into()));
        Self::with_api_key(api_key)
    }

    /// Creates a provider with an explicit (optional) API key.
    pub fn with_api_key(api_key: Option<SecretString>) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &api_key {
            headers.insert(
                API_KEY_HEADER,
                header::HeaderValue::from_str(key.expose_secret()).context(InvalidApiKeySnafu)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("smc-trader/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            // Binance allows 6000 request weight per minute; a klines call costs up to 5.
            limiter: RateLimiter::direct(Quota::per_second(nonzero!(10u32))),
        })
    }

    /// Points the provider at another host, e.g. `https://api.binance.us`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_page(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
        end_time_ms: Option<i64>,
    ) -> Result<Vec<BinanceKline>, ProviderError> {
        self.limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, KLINES_PATH);
        let query = construct_params(symbol, interval, limit, end_time_ms);
        debug!(%url, ?query, "requesting klines");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        response
            .json::<Vec<BinanceKline>>()
            .await
            .context(ReqwestSnafu)
    }
}

#[async_trait]
impl DataProvider for BinanceProvider {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        if params.limit == 0 {
            return ValidationSnafu {
                message: "limit must be at least 1",
            }
            .fail();
        }
        let symbol = normalize_symbol(&params.symbol)?;
        let interval = validate_timeframe(&params.timeframe)?;

        let mut bars: Vec<Bar> = Vec::with_capacity(params.limit as usize);
        let mut end_time_ms = params.end.map(|end| end.timestamp_millis() - 1);
        let mut remaining = params.limit;

        // Binance returns the newest `limit` klines up to `endTime`, so walk backwards.
        while remaining > 0 {
            let page_size = remaining.min(MAX_KLINES_PER_REQUEST);
            let page = self
                .fetch_page(&symbol, &interval, page_size, end_time_ms)
                .await?;
            let received = page.len() as u32;
            let Some(oldest) = page.first().map(|k| k.open_time) else {
                break;
            };

            for kline in page {
                let open_time = kline.open_time;
                match kline.into_bar() {
                    Some(bar) => bars.push(bar),
                    None => warn!(open_time, "dropping kline with out-of-range open time"),
                }
            }

            remaining = remaining.saturating_sub(received);
            if received < page_size {
                break;
            }
            end_time_ms = Some(oldest - 1);
        }

        debug!(symbol = %symbol, interval = %interval, count = bars.len(), "klines received");

        // Pages arrive newest-first; sorting also drops any overlap between them.
        Ok(BarSeries::from_unordered(symbol, params.timeframe, bars))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    const HOUR_MS: i64 = 3_600_000;
    const T0_MS: i64 = 1_704_067_200_000;

    fn hour(n: i64) -> i64 {
        T0_MS + n * HOUR_MS
    }

    fn kline_row(open_time: i64, close: f64) -> String {
        format!(
            r#"[{open_time},"100.0","{high}","90.0","{close}","12.5",{close_time},"1250.0",7,"6.0","600.0","0"]"#,
            high = close.max(100.0) + 1.0,
            close_time = open_time.saturating_add(HOUR_MS - 1),
        )
    }

    fn page(open_times: impl IntoIterator<Item = i64>, close: f64) -> String {
        let rows: Vec<String> = open_times.into_iter().map(|t| kline_row(t, close)).collect();
        format!("[{}]", rows.join(","))
    }

    /// Serves one connection per canned response, then stops listening.
    /// Resolves to the request targets in the order they arrived.
    async fn klines_server(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut targets = Vec::new();
            for (status_line, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                targets.push(head.split_whitespace().nth(1).unwrap_or_default().to_string());

                let response = format!(
                    "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
            }
            targets
        });
        (url, handle)
    }

    fn query_value(target: &str, key: &str) -> Option<String> {
        target.split_once('?')?.1.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == key).then(|| v.to_string())
        })
    }

    fn provider(base_url: &str) -> BinanceProvider {
        BinanceProvider::with_api_key(None).unwrap().with_base_url(base_url)
    }

    #[tokio::test]
    async fn large_limits_page_backwards_and_merge_overlap() {
        // Newest page first: hours 500..1500, then 101..=500 where hour 500 repeats.
        let (url, server) = klines_server(vec![
            ("HTTP/1.1 200 OK", page((500..1500).map(hour), 105.0)),
            ("HTTP/1.1 200 OK", page((101..=500).map(hour), 95.0)),
        ])
        .await;
        let params = BarsRequestParams::new("btc/usdt", "1h".parse().unwrap()).with_limit(1500);

        let series = provider(&url).fetch_bars(params).await.unwrap();
        let targets = server.await.unwrap();

        assert_eq!(targets.len(), 2);
        assert!(targets[0].starts_with(KLINES_PATH));
        assert_eq!(query_value(&targets[0], "symbol").as_deref(), Some("BTCUSDT"));
        assert_eq!(query_value(&targets[0], "interval").as_deref(), Some("1h"));
        assert_eq!(query_value(&targets[0], "limit").as_deref(), Some("1000"));
        assert_eq!(query_value(&targets[0], "endTime"), None);
        assert_eq!(query_value(&targets[1], "limit").as_deref(), Some("500"));
        assert_eq!(
            query_value(&targets[1], "endTime"),
            Some((hour(500) - 1).to_string())
        );

        assert_eq!(series.symbol(), "BTCUSDT");
        assert_eq!(series.len(), 1399);
        assert!(series.bars().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(series.bars()[0].timestamp.timestamp_millis(), hour(101));
        assert_eq!(series.bars()[1398].timestamp.timestamp_millis(), hour(1499));

        // The overlapping kline is kept from the newer page.
        let seam = series
            .bars()
            .iter()
            .find(|bar| bar.timestamp.timestamp_millis() == hour(500))
            .unwrap();
        assert_eq!(seam.close, 105.0);
        assert_eq!(seam.volume, 12.5);
        assert_eq!(seam.trade_count, Some(7));
    }

    #[tokio::test]
    async fn short_page_ends_paging_and_bad_open_times_are_dropped() {
        let body = format!(
            "[{},{},{}]",
            kline_row(hour(0), 101.0),
            kline_row(hour(1), 102.0),
            kline_row(i64::MAX, 103.0)
        );
        let (url, server) = klines_server(vec![("HTTP/1.1 200 OK", body)]).await;
        let end = DateTime::from_timestamp_millis(hour(2)).unwrap();
        let params = BarsRequestParams::new("ETHUSDT", "1h".parse().unwrap())
            .with_limit(5)
            .ending_at(end);

        let series = provider(&url).fetch_bars(params).await.unwrap();
        let targets = server.await.unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(query_value(&targets[0], "limit").as_deref(), Some("5"));
        assert_eq!(
            query_value(&targets[0], "endTime"),
            Some((hour(2) - 1).to_string())
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[1].close, 102.0);
    }

    #[tokio::test]
    async fn empty_page_yields_an_empty_series() {
        let (url, server) = klines_server(vec![("HTTP/1.1 200 OK", "[]".to_string())]).await;
        let params = BarsRequestParams::new("ETHUSDT", "4h".parse().unwrap()).with_limit(2000);

        let series = provider(&url).fetch_bars(params).await.unwrap();

        assert_eq!(server.await.unwrap().len(), 1);
        assert!(series.is_empty());
        assert_eq!(series.timeframe().to_string(), "4h");
    }

    #[tokio::test]
    async fn rate_limit_status_is_a_retryable_api_error() {
        let (url, server) = klines_server(vec![(
            "HTTP/1.1 429 Too Many Requests",
            r#"{"code":-1003,"msg":"Too many requests"}"#.to_string(),
        )])
        .await;
        let params = BarsRequestParams::new("BTCUSDT", "1h".parse().unwrap());

        let err = provider(&url).fetch_bars(params).await.unwrap_err();
        server.await.unwrap();

        assert!(
            matches!(err, ProviderError::Api { status: 429, ref message, .. } if message.contains("-1003")),
            "{err:?}"
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn client_errors_are_not_retryable() {
        let (url, server) = klines_server(vec![(
            "HTTP/1.1 400 Bad Request",
            r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        )])
        .await;
        let params = BarsRequestParams::new("NOPEUSDT", "1h".parse().unwrap());

        let err = provider(&url).fetch_bars(params).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ProviderError::Api { status: 400, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_before_any_request() {
        let provider = BinanceProvider::with_api_key(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let params = BarsRequestParams::new("BTC/USDT", "1h".parse().unwrap()).with_limit(0);

        let err = provider.fetch_bars(params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }

    #[tokio::test]
    async fn unsupported_interval_is_rejected_before_any_request() {
        let provider = BinanceProvider::with_api_key(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let params = BarsRequestParams::new("BTC/USDT", "7m".parse().unwrap());

        let err = provider.fetch_bars(params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }

    #[test]
    fn api_key_with_newline_is_refused() {
        let key = SecretString::new("abc\ndef".into());
        let err = BinanceProvider::with_api_key(Some(key)).err().unwrap();
        assert!(matches!(err, ProviderInitError::InvalidApiKey { .. }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = BinanceProvider::with_api_key(None)
            .unwrap()
            .with_base_url("https://api.binance.us/");
        assert_eq!(provider.base_url, "https://api.binance.us");
    }
}
