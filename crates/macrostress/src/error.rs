//! Errors surfaced by the dashboard workflows.

use macrostress_data::DataError;
use macrostress_metrics::{MetricsError, WeightError};
use thiserror::Error;

/// Result type for dashboard workflows.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure of a dashboard workflow.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching from a provider failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A metric rejected its input.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl From<WeightError> for Error {
    fn from(err: WeightError) -> Self {
        Self::Metrics(MetricsError::ValidationFailed(err))
    }
}

impl Error {
    /// Whether the error came from an upstream provider.
    pub const fn is_provider_error(&self) -> bool {
        match self {
            Self::Data(e) => e.is_provider_error(),
            Self::Metrics(_) => false,
        }
    }

    /// The weight problem, if this is a validation failure.
    pub const fn weight_error(&self) -> Option<&WeightError> {
        match self {
            Self::Metrics(MetricsError::ValidationFailed(e)) => Some(e),
            Self::Metrics(_) | Self::Data(_) => None,
        }
    }
}
