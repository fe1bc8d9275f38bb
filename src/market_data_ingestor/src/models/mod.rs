pub mod request_params;

pub use smc_core::{Bar, BarSeries, TimeFrame, TimeFrameUnit};
