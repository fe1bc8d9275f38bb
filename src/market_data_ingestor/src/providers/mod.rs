//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching time-series bar data from any market data vendor.
//!
//! Each concrete provider implementation (such as [`binance_rest::BinanceProvider`]
//! or [`file::FileProvider`]) handles vendor-specific API logic and validation, and
//! returns a [`BarSeries`] whose ordering invariant already holds.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{BarSeries, request_params::BarsRequestParams};
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     fn name(&self) -> &'static str {
//!         "mine"
//!     }
//!
//!     async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(params.symbol, params.timeframe, vec![]).unwrap())
//!     }
//! }
//! ```

pub mod binance_rest;
pub mod file;

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, IntoError, Snafu};

use crate::models::{BarSeries, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Short identifier used in logs (e.g. `"binance"`).
    fn name(&self) -> &'static str;

    /// Fetches the most recent bars described by `params`, oldest first.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - Strictly time-ordered bars for the requested symbol.
    /// * `Err(ProviderError)` - If the request fails or the parameters are invalid for this provider.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API answered with a non-success status.
    #[snafu(display("API error (HTTP {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// A local data file could not be read.
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A payload could not be decoded into bars.
    #[snafu(display("Failed to decode bars from {origin}: {source}"))]
    Decode {
        origin: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

impl From<ProviderInitError> for ProviderError {
    fn from(source: ProviderInitError) -> Self {
        InitSnafu.into_error(source)
    }
}

impl ProviderError {
    /// Whether repeating the same request may succeed.
    ///
    /// Rate limiting (429), server-side failures (5xx), timeouts and
    /// connection failures are retryable; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Reqwest { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source
                        .status()
                        .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            ProviderError::Api { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}
