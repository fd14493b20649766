//! Error types for derived metrics.

use macrostress_data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for metric computations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Reasons a set of portfolio weights is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    /// Weights do not add up to exactly 100.
    #[error("Weights must sum to 100% (got {total}%)")]
    SumMismatch {
        /// Actual sum of the weights
        total: u32,
    },

    /// A single weight is above 100.
    #[error("Weight for {ticker} must be between 0 and 100 (got {weight})")]
    OutOfRange {
        /// Ticker carrying the weight
        ticker: String,
        /// Offending weight
        weight: u8,
    },

    /// A weight is not a multiple of the slider step.
    #[error("Weight for {ticker} must be a multiple of {step} (got {weight})")]
    OffStep {
        /// Ticker carrying the weight
        ticker: String,
        /// Offending weight
        weight: u8,
        /// Required step
        step: u8,
    },
}

/// Errors that can occur while computing derived metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Input validation failed; nothing was computed.
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] WeightError),

    /// Converting a table to or from a frame failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A frame query failed.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}
