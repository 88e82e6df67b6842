//! Currency conversion port.
//!
//! Implementations can be HTTP clients, mock converters, etc.

use crate::domain::{ConversionQuery, ConversionValue};
use crate::error::NetworkError;

/// Port trait for exchange API clients.
#[async_trait::async_trait]
pub trait CurrencyConversion: Send + Sync + 'static {
    /// Converts `query.amount` of `query.from` into `query.to`.
    ///
    /// Implementations resolve every failure into a [`NetworkError`]; starting a
    /// new conversion supersedes any conversion still in flight on the same
    /// instance, which then resolves with [`NetworkError::Cancelled`].
    async fn get_conversion(&self, query: ConversionQuery) -> Result<ConversionValue, NetworkError>;
}
