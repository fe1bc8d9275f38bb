//! Market data collaborator for the SMC trader.
//!
//! Providers ([`providers::DataProvider`]) turn a [`models::request_params::BarsRequestParams`]
//! into a validated [`smc_core::BarSeries`]; sinks ([`io::sink::DataSink`])
//! persist series so a later run can analyse them offline through
//! [`providers::file::FileProvider`].

pub mod errors;
pub mod io;
pub mod models;
pub mod providers;
pub mod requests;

use tracing::info;

use crate::{
    errors::Error,
    io::sink::DataSink,
    models::request_params::BarsRequestParams,
    providers::DataProvider,
};

/// Fetches one series from `provider` and hands it to `sink`.
pub async fn ingest<S>(
    provider: &dyn DataProvider,
    sink: &S,
    params: BarsRequestParams,
) -> Result<S::Output, Error>
where
    S: DataSink + Sync,
{
    let series = provider.fetch_bars(params).await?;
    info!(
        provider = provider.name(),
        symbol = series.symbol(),
        timeframe = %series.timeframe(),
        bars = series.len(),
        "fetched bars"
    );
    Ok(sink.write(std::slice::from_ref(&series)).await?)
}
