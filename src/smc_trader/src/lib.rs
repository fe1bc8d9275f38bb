//! Smart Money Concepts order-block trader.
//!
//! Wires the [`smc_core`] detector to market data from
//! [`market_data_ingestor`], draws the result as an SVG chart and reports the
//! zone count through a [`notify::Notifier`].

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod notify;
pub mod render;
