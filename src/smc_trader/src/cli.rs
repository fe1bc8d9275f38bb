use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use smc_core::TimeFrame;

#[derive(Parser, Debug)]
#[command(name = "smc-trader", author, version, about = "Smart Money Concepts (SMC) order-block trader")]
pub struct Cli {
    /// Path to the config file (smc_trader.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Market selection shared by `analyze` and `fetch`. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Trading pair, e.g. "BTC/USDT"
    #[arg(long)]
    pub symbol: Option<String>,

    /// Candle timeframe: 15m, 1h, 4h, 1d (any Binance interval works)
    #[arg(long)]
    pub timeframe: Option<TimeFrame>,

    /// Number of most recent candles to fetch
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch candles, detect order blocks and report them
    Analyze {
        #[command(flatten)]
        market: MarketArgs,

        /// Consecutive higher closes required after the anchor candle
        #[arg(long, allow_negative_numbers = true)]
        lookback: Option<i64>,

        /// Read candles from a JSON file written by `fetch` instead of Binance
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Write an SVG chart with the zones drawn on it
        #[arg(long, value_name = "FILE")]
        chart: Option<PathBuf>,

        /// Print the zones as JSON instead of the text summary
        #[arg(long)]
        json: bool,

        /// Send the zone count to the configured webhook
        #[arg(long)]
        notify: bool,
    },

    /// Fetch candles and save them as JSON for later offline analysis
    Fetch {
        #[command(flatten)]
        market: MarketArgs,

        /// Directory the JSON file is written to
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Maximum number of retries for rate-limited or failed requests
        #[arg(long, default_value = "3")]
        max_retries: u32,

        #[arg(long, default_value = "1000")]
        base_delay_ms: u64,
    },

    /// Explain what an order block is
    Learn,
}
