use std::fmt;

use chrono::{DateTime, Utc};
use smc_core::{BarSeries, OrderBlockZone};

use super::{ChartRenderer, RenderError, chart_title, zone_overlays};

const UP_COLOR: &str = "#26a69a";
const DOWN_COLOR: &str = "#ef5350";

/// Standalone SVG candlestick chart.
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            margin: 48,
        }
    }
}

struct Frame {
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    slot: f64,
    min: f64,
    max: f64,
}

impl Frame {
    fn x_center(&self, index: usize) -> f64 {
        self.left + self.slot * (index as f64 + 0.5)
    }

    fn y(&self, price: f64) -> f64 {
        self.top + (self.max - price) / (self.max - self.min) * self.plot_h
    }
}

impl SvgChartRenderer {
    fn frame(&self, series: &BarSeries, zones: &[OrderBlockZone]) -> Frame {
        let prices = series
            .bars()
            .iter()
            .flat_map(|bar| [bar.low, bar.high])
            .chain(zones.iter().flat_map(|zone| [zone.low, zone.high]))
            .filter(|p| p.is_finite());
        let (mut min, mut max) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        if !min.is_finite() || !max.is_finite() {
            (min, max) = (0.0, 1.0);
        }
        let pad = ((max - min) * 0.05).max(max.abs() * 1e-6).max(1e-9);

        let margin = f64::from(self.margin);
        let plot_w = (f64::from(self.width) - 2.0 * margin).max(1.0);
        Frame {
            left: margin,
            top: margin,
            plot_w,
            plot_h: (f64::from(self.height) - 2.0 * margin).max(1.0),
            slot: plot_w / series.len() as f64,
            min: min - pad,
            max: max + pad,
        }
    }
}

/// Position of the bar opened at `time`, or of the last bar before it.
fn index_of(series: &BarSeries, time: DateTime<Utc>) -> usize {
    match series.bars().binary_search_by_key(&time, |bar| bar.timestamp) {
        Ok(i) => i,
        Err(i) => i.saturating_sub(1),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgChartRenderer {
    /// Writes the SVG document for a non-empty `series` into `out`.
    fn write_svg<W: fmt::Write>(&self, out: &mut W, series: &BarSeries, zones: &[OrderBlockZone]) -> fmt::Result {
        let f = self.frame(series, zones);
        let body_w = (f.slot * 0.7).max(1.0);

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            out,
            r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="18" text-anchor="middle">{title}</text>"#,
            x = f64::from(self.width) / 2.0,
            y = f.top / 2.0 + 6.0,
            title = escape(&chart_title(series.symbol()))
        )?;

        writeln!(out, r#"<g class="zones">"#)?;
        for overlay in zone_overlays(series, zones) {
            let x0 = f.x_center(index_of(series, overlay.start));
            let x1 = f.x_center(index_of(series, overlay.end));
            let (y0, y1) = (f.y(overlay.high), f.y(overlay.low));
            writeln!(
                out,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{c}" fill-opacity="{o}" stroke="{c}" stroke-width="1"><title>{label}</title></rect>"#,
                x = x0,
                y = y0,
                w = (x1 - x0).max(1.0),
                h = (y1 - y0).max(1.0),
                c = overlay.color,
                o = overlay.opacity,
                label = escape(&overlay.label)
            )?;
        }
        writeln!(out, "</g>")?;

        writeln!(out, r#"<g class="candles">"#)?;
        for (i, bar) in series.bars().iter().enumerate() {
            let x = f.x_center(i);
            let color = if bar.close < bar.open { DOWN_COLOR } else { UP_COLOR };
            let body_top = f.y(bar.open.max(bar.close));
            let body_h = (f.y(bar.open.min(bar.close)) - body_top).max(1.0);
            writeln!(
                out,
                r#"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{color}"/><rect x="{bx:.2}" y="{by:.2}" width="{bw:.2}" height="{bh:.2}" fill="{color}"/>"#,
                y1 = f.y(bar.high),
                y2 = f.y(bar.low),
                bx = x - body_w / 2.0,
                by = body_top,
                bw = body_w,
                bh = body_h
            )?;
        }
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, series: &BarSeries, zones: &[OrderBlockZone]) -> Result<String, RenderError> {
        if series.is_empty() {
            return Err(RenderError::EmptySeries);
        }
        let mut svg = String::new();
        self.write_svg(&mut svg, series, zones)?;
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use smc_core::{Bar, OrderBlockDetector};

    use super::*;

    fn series(symbol: &str) -> BarSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let opens = [10.0, 10.0, 9.0, 9.0, 8.0];
        let closes = [10.0, 9.0, 12.0, 8.0, 15.0];
        let bars = opens
            .iter()
            .zip(closes)
            .enumerate()
            .map(|(i, (&o, c))| Bar::new(t0 + Duration::hours(i as i64), o, o.max(c) + 1.0, o.min(c) - 1.0, c))
            .collect();
        BarSeries::new(symbol, "1h".parse().unwrap(), bars).unwrap()
    }

    #[test]
    fn draws_every_candle_and_zone() {
        let series = series("BTCUSDT");
        let zones = OrderBlockDetector::new(1).unwrap().detect_series(&series);
        assert_eq!(zones.len(), 2);

        let svg = SvgChartRenderer::default().render(&series, &zones).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("BTCUSDT - Smart Money Analysis"));
        assert_eq!(svg.matches("<line ").count(), 5);
        assert_eq!(svg.matches(r#"fill="green" fill-opacity="0.3""#).count(), 2);
        assert_eq!(svg.matches("<title>bullish order block").count(), 2);
    }

    #[test]
    fn symbol_is_escaped_in_title() {
        let svg = SvgChartRenderer::default()
            .render(&series("A&B<C>"), &[])
            .unwrap();
        assert!(svg.contains("A&amp;B&lt;C&gt; - Smart Money Analysis"));
    }

    #[test]
    fn empty_series_is_an_error() {
        let empty = BarSeries::new("BTCUSDT", "1h".parse().unwrap(), vec![]).unwrap();
        let err = SvgChartRenderer::default().render(&empty, &[]).unwrap_err();
        assert!(matches!(err, RenderError::EmptySeries));
    }

    #[test]
    fn flat_prices_still_render() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let flat = BarSeries::new("X", "1d".parse().unwrap(), vec![Bar::new(t0, 5.0, 5.0, 5.0, 5.0)]).unwrap();
        let svg = SvgChartRenderer::default().render(&flat, &[]).unwrap();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    struct Refusing;

    impl fmt::Write for Refusing {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn writer_failures_surface_as_format_errors() {
        let series = series("BTCUSDT");
        let result = SvgChartRenderer::default().write_svg(&mut Refusing, &series, &[]);
        assert_eq!(result, Err(fmt::Error));

        let err = RenderError::from(result.unwrap_err());
        assert!(matches!(err, RenderError::Format(_)));
        assert!(err.to_string().starts_with("failed to format chart"));
    }

    #[test]
    fn writes_chart_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("btc.svg");
        SvgChartRenderer::default()
            .render_to_file(&series("BTCUSDT"), &[], &path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}
