//! Integration tests for the fetch operations over in-memory providers.

use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::NaiveDate;
use macrostress_data::{
    DataError, DateWindow, MacroObservation, MacroSeries, MacroSource, PricePoint, PriceSeries,
    PriceSource, Result, fetch_multiple_prices, fetch_single_price, fetch_statistical_series,
    normalize_prices,
};
use std::collections::HashMap;
use std::sync::Mutex;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serves fixed series and records every batch it was asked for.
struct FixturePrices {
    data: HashMap<String, PriceSeries>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FixturePrices {
    fn new(series: Vec<PriceSeries>) -> Self {
        Self {
            data: series
                .into_iter()
                .map(|s| (s.ticker().to_string(), s))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PriceSource for FixturePrices {
    async fn fetch_closes(
        &self,
        tickers: &[String],
        _window: &DateWindow,
    ) -> Result<Vec<PriceSeries>> {
        self.calls.lock().unwrap().push(tickers.to_vec());
        Ok(tickers
            .iter()
            .filter_map(|t| self.data.get(t).cloned())
            .collect())
    }
}

struct DownPrices;

#[async_trait]
impl PriceSource for DownPrices {
    async fn fetch_closes(
        &self,
        _tickers: &[String],
        _window: &DateWindow,
    ) -> Result<Vec<PriceSeries>> {
        Err(DataError::ProviderUnavailable {
            provider: "fixture",
            reason: "connection refused".to_string(),
        })
    }
}

struct FixtureMacro;

#[async_trait]
impl MacroSource for FixtureMacro {
    async fn fetch_series(&self, series_id: &str) -> Result<MacroSeries> {
        match series_id {
            "FEDFUNDS" => Ok(MacroSeries::new(
                "raw",
                vec![
                    MacroObservation::new(date(2020, 2, 1), Some(1.58)),
                    MacroObservation::new(date(2020, 1, 1), Some(1.55)),
                ],
            )),
            other => Err(DataError::UnknownSeries(other.to_string())),
        }
    }
}

fn daily(ticker: &str, start_day: u32, prices: &[f64]) -> PriceSeries {
    PriceSeries::new(
        ticker,
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(date(2020, 3, start_day + i as u32), *p))
            .collect(),
    )
}

fn march() -> DateWindow {
    DateWindow::new(date(2020, 3, 1), date(2020, 3, 31)).unwrap()
}

#[tokio::test]
async fn test_multiple_prices_single_batched_call() {
    let source = FixturePrices::new(vec![
        daily("XLK", 2, &[100.0, 101.0]),
        daily("XLF", 2, &[50.0, 49.0]),
    ]);
    let tickers = vec!["XLK".to_string(), "XLF".to_string(), "XLK".to_string()];

    let long = fetch_multiple_prices(&source, &tickers, &march())
        .await
        .unwrap();

    assert_eq!(long.len(), 4);
    assert_eq!(long.tickers(), vec!["XLF", "XLK"]);
    let calls = source.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec!["XLF".to_string(), "XLK".to_string()]);
}

#[tokio::test]
async fn test_absent_ticker_is_dropped_not_errored() {
    let source = FixturePrices::new(vec![daily("XLK", 2, &[100.0, 101.0])]);
    let tickers = vec!["XLK".to_string(), "GONE".to_string()];

    let long = fetch_multiple_prices(&source, &tickers, &march())
        .await
        .unwrap();

    assert_eq!(long.tickers(), vec!["XLK"]);
}

#[tokio::test]
async fn test_rows_outside_window_are_trimmed() {
    let source = FixturePrices::new(vec![daily("XLK", 28, &[1.0, 2.0, 3.0, 4.0])]);
    let window = DateWindow::new(date(2020, 3, 1), date(2020, 3, 29)).unwrap();

    let series = fetch_single_price(&source, "XLK", &window).await.unwrap();

    assert_eq!(series.prices(), vec![1.0, 2.0]);
}

#[tokio::test]
async fn test_unknown_single_ticker_is_empty() {
    let source = FixturePrices::new(vec![]);
    let series = fetch_single_price(&source, "NOPE", &march()).await.unwrap();

    assert!(series.is_empty());
    assert_eq!(series.ticker(), "NOPE");
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let result = fetch_single_price(&DownPrices, "SPY", &march()).await;
    assert!(matches!(result, Err(e) if e.is_provider_error()));
}

#[tokio::test]
async fn test_empty_ticker_set() {
    let source = FixturePrices::new(vec![]);
    let long = fetch_multiple_prices(&source, &[], &march()).await.unwrap();

    assert!(long.is_empty());
    assert!(source.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_statistical_series_named_by_id() {
    let series = fetch_statistical_series(&FixtureMacro, "FEDFUNDS")
        .await
        .unwrap();

    assert_eq!(series.id(), "FEDFUNDS");
    assert_eq!(series.observations()[0].date, date(2020, 1, 1));
}

#[tokio::test]
async fn test_unknown_statistical_series() {
    let result = fetch_statistical_series(&FixtureMacro, "NOTASERIES").await;
    assert!(matches!(result, Err(DataError::UnknownSeries(_))));
}

#[tokio::test]
async fn test_fetch_then_normalize() {
    let source = FixturePrices::new(vec![
        daily("XLK", 2, &[200.0, 220.0]),
        daily("XLF", 3, &[40.0, 36.0]),
    ]);
    let tickers = vec!["XLK".to_string(), "XLF".to_string()];

    let long = fetch_multiple_prices(&source, &tickers, &march())
        .await
        .unwrap();
    let normalized = normalize_prices(long).unwrap();

    let xlk = normalized.series("XLK").prices();
    let xlf = normalized.series("XLF").prices();
    assert_relative_eq!(xlk[0], 100.0);
    assert_relative_eq!(xlk[1], 110.0, epsilon = 1e-9);
    assert_relative_eq!(xlf[0], 100.0);
    assert_relative_eq!(xlf[1], 90.0, epsilon = 1e-9);
}
