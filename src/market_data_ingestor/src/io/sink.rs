use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::BarSeries;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The destination could not be created or written.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A series could not be converted into the destination format.
    #[snafu(display("Failed to encode series {symbol}: {source}"))]
    Encode {
        symbol: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// This makes the trait flexible. For example:
    /// - A file sink might return `Vec<PathBuf>`, the paths to the created files.
    /// - A database sink might return `usize`, the number of rows inserted.
    type Output;

    /// Writes a slice of `BarSeries` to the destination.
    ///
    /// # Arguments
    /// * `data` - A slice of `BarSeries` to be written.
    async fn write(&self, data: &[BarSeries]) -> Result<Self::Output, SinkError>;
}
