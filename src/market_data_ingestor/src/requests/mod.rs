//! Request helpers shared by every provider.

pub mod retry;

pub use retry::{RetryPolicy, RetryingProvider, with_retry};
