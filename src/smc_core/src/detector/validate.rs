//! Input checks for the strict detection path.
//!
//! The default detector trusts its input. These checks exist for callers that
//! receive bars from a source they do not control and would rather fail than
//! emit a zone with `low > high`.

use crate::{
    errors::{BarDefect, DetectorError},
    models::bar::OhlcBar,
};

/// Checks every bar and the ordering between neighbours.
///
/// # Errors
/// [`DetectorError::MalformedBar`] for the first offending bar.
pub fn validate_bars<B: OhlcBar>(bars: &[B]) -> Result<(), DetectorError> {
    for (index, bar) in bars.iter().enumerate() {
        let ordering = match index.checked_sub(1).map(|prev| &bars[prev]) {
            Some(previous) if bar.timestamp() <= previous.timestamp() => Err(BarDefect::OutOfOrder {
                previous: previous.timestamp(),
                current: bar.timestamp(),
            }),
            _ => Ok(()),
        };
        ordering
            .and_then(|()| check_bar(bar))
            .map_err(|defect| DetectorError::MalformedBar { index, defect })?;
    }
    Ok(())
}

/// Checks a single bar against the OHLC invariants.
pub fn check_bar<B: OhlcBar>(bar: &B) -> Result<(), BarDefect> {
    let prices = [bar.open(), bar.high(), bar.low(), bar.close()];
    if prices.iter().any(|p| !p.is_finite()) {
        return Err(BarDefect::NonFinite);
    }
    if prices.iter().any(|p| *p < 0.0) {
        return Err(BarDefect::Negative);
    }

    let body_low = bar.open().min(bar.close());
    let body_high = bar.open().max(bar.close());
    if bar.low() > body_low {
        return Err(BarDefect::LowAboveBody {
            low: bar.low(),
            body_low,
        });
    }
    if bar.high() < body_high {
        return Err(BarDefect::HighBelowBody {
            high: bar.high(),
            body_high,
        });
    }
    Ok(())
}
