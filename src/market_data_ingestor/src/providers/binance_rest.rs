//! Binance spot REST provider (`GET /api/v3/klines`).
//!
//! Public market data needs no credentials. An API key, when present in
//! `BINANCE_API_KEY`, is sent as `X-MBX-APIKEY`.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::BinanceProvider;
