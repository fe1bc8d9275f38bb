use std::path::Path;

use anyhow::{Context, Result};
use market_data_ingestor::{
    ingest,
    io::json_file::JsonFileSink,
    models::request_params::BarsRequestParams,
    providers::{DataProvider, binance_rest::BinanceProvider, file::FileProvider},
    requests::{RetryPolicy, RetryingProvider},
};
use smc_core::OrderBlockDetector;
use tracing::{info, warn};

use crate::{
    analysis::{AnalysisReport, analyze},
    cli::{Cli, Commands, MarketArgs},
    config::{AppConfig, MarketConfig},
    notify::{LogNotifier, Notifier, WebhookNotifier},
    render::{ChartRenderer, SvgChartRenderer},
};

/// Shown with every failure, as most of them come from a mistyped pair.
pub const SYMBOL_HINT: &str = "Please check the symbol name (e.g., BTC/USDT).";

pub const LEARN_TEXT: &str = "\
Order Block (OB): a specific price area where big banks and institutions have
accumulated large orders.

  - If price returns to a Green OB, we expect a bounce UP.
  - If price returns to a Red OB, we expect a rejection DOWN.

smc-trader marks a candle as a green order block when it closed below its open
and the next `lookback` candles each closed higher than the one before.";

/// Formats a top-level failure for the terminal.
pub fn error_message(err: &anyhow::Error) -> String {
    format!("Error: {err:#}. {SYMBOL_HINT}")
}

/// Merges CLI flags over the config file.
pub fn request_params(config: &MarketConfig, args: &MarketArgs) -> BarsRequestParams {
    let symbol = args.symbol.clone().unwrap_or_else(|| config.symbol.clone());
    let timeframe = args.timeframe.unwrap_or(config.timeframe);
    BarsRequestParams::new(symbol, timeframe).with_limit(args.limit.unwrap_or(config.limit))
}

fn provider_for(input: Option<&Path>, policy: RetryPolicy) -> Result<Box<dyn DataProvider>> {
    match input {
        Some(path) => Ok(Box::new(FileProvider::new(path))),
        None => {
            let binance = BinanceProvider::new().context("failed to set up the Binance client")?;
            Ok(Box::new(RetryingProvider::new(binance, policy)))
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let command = cli.command;
    if let Commands::Learn = command {
        println!("{LEARN_TEXT}");
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match command {
        Commands::Analyze {
            market,
            lookback,
            input,
            chart,
            json,
            notify,
        } => {
            let params = request_params(&config.market, &market);
            let detector = match lookback {
                Some(raw) => OrderBlockDetector::new(raw)?,
                None => OrderBlockDetector::with_lookback(config.lookback()?),
            };
            let provider = provider_for(input.as_deref(), RetryPolicy::default())?;
            let symbol = params.symbol.clone();

            let report = analyze(provider.as_ref(), params, detector)
                .await
                .with_context(|| format!("could not analyze {symbol}"))?;

            print_report(&report, json)?;

            if let Some(path) = chart.or_else(|| config.chart.output.clone()) {
                SvgChartRenderer::default().render_to_file(&report.series, &report.zones, &path)?;
                info!(path = %path.display(), "chart written");
            }

            if notify || config.notifier.enabled {
                send_notification(&config, &report).await;
            }
            Ok(())
        }
        Commands::Fetch {
            market,
            out_dir,
            max_retries,
            base_delay_ms,
        } => {
            let params = request_params(&config.market, &market);
            let symbol = params.symbol.clone();
            let policy = RetryPolicy {
                max_retries,
                base_delay_ms,
            };
            let provider = provider_for(None, policy)?;
            let sink = JsonFileSink::new(out_dir);

            let paths = ingest(provider.as_ref(), &sink, params)
                .await
                .with_context(|| format!("could not fetch {symbol}"))?;
            for path in paths {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Learn => Ok(()),
    }
}

fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(&report.to_json_report())?;
        println!("{out}");
        return Ok(());
    }

    println!("{}", report.insight());
    for zone in &report.zones {
        println!(
            "  {}  {:>14} - {:<14} {}",
            zone.anchor_time.format("%Y-%m-%d %H:%M"),
            zone.low,
            zone.high,
            zone.direction.as_str()
        );
    }
    Ok(())
}

/// Delivery problems are logged; the analysis itself already succeeded.
async fn send_notification(config: &AppConfig, report: &AnalysisReport) {
    let notifier: Box<dyn Notifier> = match config.webhook_url() {
        Some(url) => match WebhookNotifier::new(url) {
            Ok(webhook) => Box::new(webhook),
            Err(e) => {
                warn!(error = %e, "webhook client unavailable, logging instead");
                Box::new(LogNotifier)
            }
        },
        None => {
            warn!("notifications enabled but no webhook configured, logging instead");
            Box::new(LogNotifier)
        }
    };
    if let Err(e) = notifier.notify(&report.summary()).await {
        warn!(error = %e, "failed to deliver notification");
    }
}
