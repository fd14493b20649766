//! Constructing the live Yahoo Finance and FRED providers.

use macrostress::data::fred::{FRED_API_KEY_ENV, FredClient, FredConfig};
use macrostress::data::yahoo::YahooQuoteProvider;
use macrostress::data::{DataError, Result};
use tracing::debug;

/// Yahoo Finance price provider with default settings.
pub(crate) fn price_source() -> Result<YahooQuoteProvider> {
    YahooQuoteProvider::new()
}

/// FRED client for an API key taken from the command line or environment.
pub(crate) fn macro_source(api_key: Option<&str>) -> Result<FredClient> {
    let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        DataError::Config(format!(
            "a FRED API key is required: pass --fred-api-key or set {FRED_API_KEY_ENV}"
        ))
    })?;
    let config = FredConfig::new(key.trim());
    debug!(base_url = %config.base_url, "using FRED endpoint");
    FredClient::new(config)
}
