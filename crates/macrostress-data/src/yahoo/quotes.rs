//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::series::{PricePoint, PriceSeries};
use crate::source::PriceSource;
use crate::window::DateWindow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

/// Which closing-price field to read from each quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceField {
    /// Close adjusted for splits and dividends.
    #[default]
    AdjustedClose,
    /// Raw exchange close.
    Close,
}

/// Configuration for the Yahoo quote provider.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Closing-price field to consume
    pub price_field: PriceField,
    /// Pause between consecutive ticker requests
    pub rate_limit_delay: Duration,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            price_field: PriceField::AdjustedClose,
            rate_limit_delay: Duration::from_millis(200),
        }
    }
}

/// Yahoo Finance quote provider.
///
/// The chart endpoint serves one symbol per request, so a batch passed to
/// [`PriceSource::fetch_closes`] is N separate HTTP calls made one after
/// another, [`QuoteConfig::rate_limit_delay`] apart. Series in a batch are
/// not a consistent snapshot.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    config: QuoteConfig,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a provider with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(QuoteConfig::default())
    }

    /// Create a provider with a custom configuration.
    pub fn with_config(config: QuoteConfig) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            config,
        })
    }

    /// Fetch daily closes for a single symbol over an inclusive window.
    ///
    /// Unknown symbols and windows without trading days produce an empty
    /// series rather than an error.
    pub async fn fetch_ticker(&self, symbol: &str, window: &DateWindow) -> Result<PriceSeries> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let (start, end) = to_offset_range(window)?;
        debug!(symbol, %window, "requesting quote history");

        let response = match self.provider.get_quote_history(symbol, start, end).await {
            Ok(response) => response,
            Err(err) if is_empty_response(&err) => {
                debug!(symbol, error = %err, "no quote data returned");
                return Ok(PriceSeries::empty(symbol));
            }
            Err(err) => return Err(err.into()),
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(err) => {
                debug!(symbol, error = %err, "response carried no quotes");
                return Ok(PriceSeries::empty(symbol));
            }
        };

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let timestamp = i64::try_from(q.timestamp).ok()?;
                let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
                let price = match self.config.price_field {
                    PriceField::AdjustedClose => q.adjclose,
                    PriceField::Close => q.close,
                };
                (price.is_finite() && price > 0.0).then_some(PricePoint::new(date, price))
            })
            .collect();

        if points.len() < quotes.len() {
            warn!(
                symbol,
                dropped = quotes.len() - points.len(),
                "skipped quotes without a usable close"
            );
        }

        Ok(PriceSeries::new(symbol, points).window(window))
    }
}

#[async_trait]
impl PriceSource for YahooQuoteProvider {
    async fn fetch_closes(
        &self,
        tickers: &[String],
        window: &DateWindow,
    ) -> Result<Vec<PriceSeries>> {
        let mut series = Vec::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            if i > 0 && !self.config.rate_limit_delay.is_zero() {
                sleep(self.config.rate_limit_delay).await;
            }
            series.push(self.fetch_ticker(ticker, window).await?);
        }
        Ok(series)
    }
}

/// Yahoo answers unknown symbols and empty ranges with errors; those are empty results.
fn is_empty_response(err: &yahoo::YahooError) -> bool {
    match err {
        yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes => true,
        yahoo::YahooError::FetchFailed(msg) => msg.contains("404") || msg.contains("Not Found"),
        _ => false,
    }
}

/// Convert an inclusive date window into Yahoo's `[start, end)` timestamps.
fn to_offset_range(window: &DateWindow) -> Result<(time::OffsetDateTime, time::OffsetDateTime)> {
    let day_after_end = window.end().succ_opt().ok_or_else(|| {
        DataError::TimeConversion(format!("no day after {}", window.end()))
    })?;
    Ok((midnight_utc(window.start())?, midnight_utc(day_after_end)?))
}

fn midnight_utc(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}
