//! Pattern detectors over bar sequences.
//!
//! Only one pattern lives here: the bullish-origin order block, see
//! [`OrderBlockDetector`]. [`validate`] holds the optional input checks used by
//! the strict detection path.

mod order_block;
pub mod validate;

pub use order_block::{Lookback, OrderBlockDetector, detect};
