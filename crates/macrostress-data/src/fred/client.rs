//! FRED (Federal Reserve Economic Data) API client.

use crate::error::{DataError, Result};
use crate::series::{MacroObservation, MacroSeries};
use crate::source::MacroSource;
use crate::window::DATE_FORMAT;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// FRED API base URL
pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org";

/// Environment variable holding the FRED API key
pub const FRED_API_KEY_ENV: &str = "FRED_API_KEY";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for FRED requests
const USER_AGENT: &str = "MacroStress/0.1";

/// Marker FRED uses for a missing observation
const MISSING_VALUE: &str = ".";

const PROVIDER: &str = "FRED";

/// Connection settings for the FRED API.
///
/// The API key is supplied by the caller (CLI flag, environment, secret store)
/// and is redacted from debug output.
#[derive(Debug)]
pub struct FredConfig {
    /// API key
    pub api_key: SecretString,
    /// Base URL, overridable for proxies and tests
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl FredConfig {
    /// Create a configuration for the public FRED endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key: String = api_key.into();
        Self {
            api_key: SecretString::new(api_key.into_boxed_str()),
            base_url: FRED_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the API key from `FRED_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let key = std::env::var(FRED_API_KEY_ENV)
            .map_err(|_| DataError::Config(format!("{FRED_API_KEY_ENV} is not set")))?;
        Ok(Self::new(key))
    }

    /// Use a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different request timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Observation list returned by `fred/series/observations`.
#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

/// One observation as FRED serializes it: both fields are strings.
#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// Error body FRED returns alongside 4xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_message: String,
}

/// FRED API client.
pub struct FredClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl std::fmt::Debug for FredClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FredClient {
    /// Create a client from an explicit configuration.
    ///
    /// # Example
    /// ```no_run
    /// use macrostress_data::fred::{FredClient, FredConfig};
    ///
    /// # async fn example() -> macrostress_data::Result<()> {
    /// let client = FredClient::new(FredConfig::from_env()?)?;
    /// let fed_funds = client.get_observations("FEDFUNDS").await?;
    /// println!("{} observations", fed_funds.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: FredConfig) -> Result<Self> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(DataError::Config("FRED API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the full observation history of a series.
    ///
    /// # Errors
    /// Returns `DataError::UnknownSeries` if FRED does not know `series_id`
    /// and `DataError::ProviderUnavailable` for transport or other API failures.
    pub async fn get_observations(&self, series_id: &str) -> Result<MacroSeries> {
        let url = format!("{}/fred/series/observations", self.base_url);
        debug!(series_id, "requesting FRED observations");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.expose_secret()),
                ("file_type", "json"),
            ])
            .send()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(series_id, status, &body));
        }

        parse_observations(series_id, &body)
    }
}

#[async_trait]
impl MacroSource for FredClient {
    async fn fetch_series(&self, series_id: &str) -> Result<MacroSeries> {
        self.get_observations(series_id).await
    }
}

fn unavailable(reason: String) -> DataError {
    DataError::ProviderUnavailable {
        provider: PROVIDER,
        reason,
    }
}

/// Map a non-success response to an error kind.
fn classify_failure(series_id: &str, status: StatusCode, body: &str) -> DataError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error_message)
        .unwrap_or_default();

    if status == StatusCode::BAD_REQUEST && message.to_lowercase().contains("series does not exist")
    {
        return DataError::UnknownSeries(series_id.to_string());
    }

    if message.is_empty() {
        unavailable(format!("HTTP {status}"))
    } else {
        unavailable(format!("HTTP {status}: {message}"))
    }
}

/// Parse an observations payload into a series named `series_id`.
fn parse_observations(series_id: &str, body: &str) -> Result<MacroSeries> {
    let response: ObservationsResponse = serde_json::from_str(body)?;

    let observations = response
        .observations
        .into_iter()
        .map(|raw| {
            let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT).map_err(|e| {
                DataError::Parse(format!("{series_id}: invalid date '{}': {e}", raw.date))
            })?;
            let value = if raw.value.trim() == MISSING_VALUE {
                None
            } else {
                Some(raw.value.trim().parse::<f64>().map_err(|e| {
                    DataError::Parse(format!("{series_id}: invalid value '{}': {e}", raw.value))
                })?)
            };
            Ok(MacroObservation::new(date, value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MacroSeries::new(series_id, observations))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "realtime_start": "2024-01-01",
        "realtime_end": "2024-01-01",
        "observation_start": "1600-01-01",
        "observation_end": "9999-12-31",
        "units": "lin",
        "count": 3,
        "observations": [
            {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2020-01-02", "value": "1.54"},
            {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2020-01-01", "value": "."},
            {"realtime_start": "2024-01-01", "realtime_end": "2024-01-01", "date": "2020-01-03", "value": "1.52"}
        ]
    }"#;

    #[test]
    fn test_parse_observations() {
        let series = parse_observations("DTB3", SAMPLE).unwrap();

        assert_eq!(series.id(), "DTB3");
        assert_eq!(series.len(), 3);
        // Sorted by date; "." is a missing value, not an error
        assert_eq!(series.observations()[0].value, None);
        assert_eq!(series.observations()[1].value, Some(1.54));
        assert_eq!(series.dropna().len(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage_value() {
        let body = r#"{"observations": [{"date": "2020-01-01", "value": "abc"}]}"#;
        assert!(matches!(
            parse_observations("X", body),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_series_classification() {
        let body = r#"{"error_code": 400, "error_message": "Bad Request.  The series does not exist."}"#;
        let err = classify_failure("NOTASERIES", StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, DataError::UnknownSeries(id) if id == "NOTASERIES"));
    }

    #[test]
    fn test_bad_key_is_provider_unavailable() {
        let body = r#"{"error_code": 400, "error_message": "Bad Request.  The value for variable api_key is not registered."}"#;
        let err = classify_failure("FEDFUNDS", StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, DataError::ProviderUnavailable { .. }));
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_server_error_without_body() {
        let err = classify_failure("FEDFUNDS", StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "FRED unavailable: HTTP 500 Internal Server Error");
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = FredClient::new(FredConfig::new("  "));
        assert!(matches!(result, Err(DataError::Config(_))));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = FredConfig::new("super-secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_provider_unavailable() {
        let config = FredConfig::new("key")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = FredClient::new(config).unwrap();

        let result = client.get_observations("FEDFUNDS").await;
        assert!(matches!(result, Err(DataError::ProviderUnavailable { .. })));
    }
}
