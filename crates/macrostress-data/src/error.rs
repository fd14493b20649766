//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
///
/// An empty result set is not an error: providers return empty series for
/// valid queries that match no data.
#[derive(Debug, Error)]
pub enum DataError {
    /// An upstream provider could not be reached or rejected the request.
    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable {
        /// Provider name
        provider: &'static str,
        /// Reason reported by the provider or transport
        reason: String,
    },

    /// The statistical provider does not know the requested series.
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Invalid provider configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DataError {
    /// Returns true if this error means the upstream source could not serve the request.
    pub const fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::UnknownSeries(_) | Self::Network(_)
        )
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::ProviderUnavailable {
            provider: "Yahoo Finance",
            reason: err.to_string(),
        }
    }
}
