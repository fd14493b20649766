//! Provider seams and the data-access operations built on them.
//!
//! [`PriceSource`] and [`MacroSource`] abstract the two upstream providers so
//! the derived-metrics and dashboard code can run against any implementation,
//! including in-memory fixtures.

use crate::error::{DataError, Result};
use crate::frames::MultiSeriesLong;
use crate::series::{MacroSeries, PriceSeries};
use crate::window::DateWindow;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A source of daily closing prices.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily closes for every ticker in one batched request.
    ///
    /// Returns one series per ticker the provider knows; unknown tickers may be
    /// omitted or returned empty.
    async fn fetch_closes(
        &self,
        tickers: &[String],
        window: &DateWindow,
    ) -> Result<Vec<PriceSeries>>;
}

/// A source of statistical (macro) series.
#[async_trait]
pub trait MacroSource: Send + Sync {
    /// Fetch the full available history of `series_id`.
    async fn fetch_series(&self, series_id: &str) -> Result<MacroSeries>;
}

/// Fetch the full history of a statistical series.
///
/// The caller slices to a window and drops missing values.
pub async fn fetch_statistical_series<S>(source: &S, series_id: &str) -> Result<MacroSeries>
where
    S: MacroSource + ?Sized,
{
    if series_id.trim().is_empty() {
        return Err(DataError::UnknownSeries(series_id.to_string()));
    }
    let series = source.fetch_series(series_id).await?;
    debug!(series_id, observations = series.len(), "fetched statistical series");
    Ok(series.with_id(series_id))
}

/// Fetch daily closes of one ticker over an inclusive window.
///
/// An unknown ticker yields an empty series.
pub async fn fetch_single_price<S>(
    source: &S,
    ticker: &str,
    window: &DateWindow,
) -> Result<PriceSeries>
where
    S: PriceSource + ?Sized,
{
    if ticker.trim().is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }
    let series = source
        .fetch_closes(&[ticker.to_string()], window)
        .await?
        .into_iter()
        .find(|s| s.ticker() == ticker)
        .map_or_else(|| PriceSeries::empty(ticker), |s| s.window(window));
    debug!(ticker, rows = series.len(), "fetched single price series");
    Ok(series)
}

/// Fetch daily closes for a set of tickers in one provider call, in long form.
///
/// Duplicate tickers are requested once. Tickers with no data in the window
/// are absent from the result.
pub async fn fetch_multiple_prices<S>(
    source: &S,
    tickers: &[String],
    window: &DateWindow,
) -> Result<MultiSeriesLong>
where
    S: PriceSource + ?Sized,
{
    let requested: Vec<String> = tickers
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if requested.is_empty() {
        return Ok(MultiSeriesLong::default());
    }

    let fetched = source.fetch_closes(&requested, window).await?;
    let long = MultiSeriesLong::from_series(
        fetched
            .into_iter()
            .filter(|s| requested.iter().any(|t| t == s.ticker()))
            .map(|s| s.window(window)),
    );

    let present = long.tickers();
    for ticker in requested.iter().filter(|t| !present.contains(t)) {
        warn!(ticker = %ticker, %window, "no prices in window, ticker dropped");
    }

    Ok(long)
}
