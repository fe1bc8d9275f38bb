//! Order-block zones produced by the detector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::bar::OhlcBar;

/// Which side of the market a zone is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneDirection {
    /// A down-candle followed by bullish momentum: price is expected to find support here.
    Bullish,
}

impl ZoneDirection {
    /// Lowercase label, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            ZoneDirection::Bullish => "bullish",
        }
    }
}

/// A price band anchored at one bar.
///
/// Zones are immutable detection results. `low <= high` holds whenever the
/// anchoring bar satisfies it; the detector copies the bar's range verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlockZone {
    /// Timestamp of the bar that defines the zone.
    pub anchor_time: DateTime<Utc>,
    /// Lower edge of the band (the anchor's low).
    pub low: f64,
    /// Upper edge of the band (the anchor's high).
    pub high: f64,
    /// Expected reaction of price to the zone.
    pub direction: ZoneDirection,
}

impl OrderBlockZone {
    /// A bullish-origin zone spanning `anchor`'s full range.
    pub fn bullish<B: OhlcBar>(anchor: &B) -> Self {
        Self {
            anchor_time: anchor.timestamp(),
            low: anchor.low(),
            high: anchor.high(),
            direction: ZoneDirection::Bullish,
        }
    }

    /// `true` if `price` lies inside the band, edges included.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    /// Vertical size of the band.
    pub fn height(&self) -> f64 {
        self.high - self.low
    }
}
