//! Vendor-agnostic market data and detection result types.

pub mod bar;
pub mod bar_series;
pub mod timeframe;
pub mod zone;
