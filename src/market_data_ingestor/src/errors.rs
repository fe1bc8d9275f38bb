use thiserror::Error;

use crate::{io::sink::SinkError, providers::ProviderError};

/// The unified error type for the `market_data_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from a data provider (e.g., API error, validation).
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// An error originating from a data sink (e.g., file I/O).
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}
