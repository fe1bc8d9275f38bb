//! Application configuration.
//!
//! Every section and field has a default, so an empty file (or no file at all)
//! analyses `BTC/USDT` on the 1h chart with a lookback of 3:
//!
//! ```toml
//! [market]
//! symbol = "BTC/USDT"
//! timeframe = "1h"
//! limit = 500
//!
//! [detector]
//! lookback = 3
//!
//! [notifier]
//! enabled = false
//! # webhook_url = "https://..."   # or SMC_WEBHOOK_URL
//!
//! [chart]
//! output = "chart.svg"
//! ```

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use shared_utils::{
    config::{ConfigError, load_toml_path},
    env::get_env_var_opt,
};
use smc_core::{Lookback, TimeFrame, TimeFrameUnit};

/// Environment variable consulted when `[notifier] webhook_url` is not set.
pub const WEBHOOK_URL_ENV: &str = "SMC_WEBHOOK_URL";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub detector: DetectorConfig,
    pub notifier: NotifierConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MarketConfig {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub limit: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            timeframe: TimeFrame::new(NonZeroU32::MIN, TimeFrameUnit::Hour),
            limit: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DetectorConfig {
    /// Raw value; checked by [`AppConfig::lookback`] when no `--lookback` flag overrides it.
    pub lookback: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { lookback: 3 }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NotifierConfig {
    pub enabled: bool,
    #[serde(deserialize_with = "secret_opt")]
    pub webhook_url: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ChartConfig {
    pub output: Option<PathBuf>,
}

fn secret_opt<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::new(s.into())))
}

impl AppConfig {
    /// Loads and validates the config at `path`, or returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: AppConfig = match path {
            Some(path) => load_toml_path(path)?,
            None => AppConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Range checks that serde cannot express.
    ///
    /// `detector.lookback` is left to [`AppConfig::lookback`], since a CLI
    /// flag may replace it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "market.symbol".into(),
                message: "must not be empty".into(),
            });
        }
        if self.market.limit == 0 {
            return Err(ConfigError::Invalid {
                key: "market.limit".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn lookback(&self) -> Result<Lookback, ConfigError> {
        Lookback::new(self.detector.lookback).map_err(|e| ConfigError::Invalid {
            key: "detector.lookback".into(),
            message: e.to_string(),
        })
    }

    /// The webhook from the file, falling back to `SMC_WEBHOOK_URL`.
    pub fn webhook_url(&self) -> Option<SecretString> {
        self.notifier
            .webhook_url
            .as_ref()
            .map(|url| SecretString::new(url.expose_secret().into()))
            .or_else(|| get_env_var_opt(WEBHOOK_URL_ENV).map(|url| SecretString::new(url.into())))
    }
}
