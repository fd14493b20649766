//! Dashboard workflows over in-memory providers.

use approx::assert_relative_eq;
use async_trait::async_trait;
use chrono::NaiveDate;
use macrostress::data::{
    DataError, DateWindow, MacroObservation, MacroSeries, MacroSource, PricePoint, PriceSeries,
    PriceSource, Result as DataResult,
};
use macrostress::metrics::{CurveShape, PortfolioWeights, WeightError};
use macrostress::{
    EtfUniverse, Error, Scenario, StressWindow, market_overview, sector_heatmap,
    simulate_portfolio,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serves fixed daily closes and counts calls.
#[derive(Default)]
struct MockPrices {
    data: HashMap<String, PriceSeries>,
    calls: AtomicUsize,
}

impl MockPrices {
    fn with(mut self, ticker: &str, points: &[(NaiveDate, f64)]) -> Self {
        let points = points.iter().map(|(d, p)| PricePoint::new(*d, *p)).collect();
        self.data
            .insert(ticker.to_string(), PriceSeries::new(ticker, points));
        self
    }
}

#[async_trait]
impl PriceSource for MockPrices {
    async fn fetch_closes(
        &self,
        tickers: &[String],
        _window: &DateWindow,
    ) -> DataResult<Vec<PriceSeries>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(tickers
            .iter()
            .filter_map(|t| self.data.get(t).cloned())
            .collect())
    }
}

struct MockMacro {
    data: HashMap<&'static str, MacroSeries>,
}

#[async_trait]
impl MacroSource for MockMacro {
    async fn fetch_series(&self, series_id: &str) -> DataResult<MacroSeries> {
        self.data
            .get(series_id)
            .cloned()
            .ok_or_else(|| DataError::UnknownSeries(series_id.to_string()))
    }
}

fn monthly(id: &str, start_year: i32, values: &[f64]) -> MacroSeries {
    let observations = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let i = i as i32;
            let d = date(start_year + i / 12, (i % 12) as u32 + 1, 1);
            MacroObservation::new(d, Some(*v))
        })
        .collect();
    MacroSeries::new(id, observations)
}

fn bank_failure_macro() -> MockMacro {
    // 2022-01 .. 2023-04, sixteen months.
    let cpi: Vec<f64> = (0..16).map(|i| 280.0 + f64::from(i)).collect();
    let fed: Vec<f64> = (0..16).map(|i| 0.1 + 0.3 * f64::from(i)).collect();
    let gs10: Vec<f64> = vec![3.5; 16];
    let dtb3: Vec<f64> = vec![4.5; 16];
    MockMacro {
        data: HashMap::from([
            ("CPIAUCSL", monthly("CPIAUCSL", 2022, &cpi)),
            ("FEDFUNDS", monthly("FEDFUNDS", 2022, &fed)),
            ("GS10", monthly("GS10", 2022, &gs10)),
            ("DTB3", monthly("DTB3", 2022, &dtb3)),
        ]),
    }
}

#[tokio::test]
async fn test_offsetting_sectors_end_flat() {
    let prices = MockPrices::default()
        .with("XLK", &[(date(2023, 3, 1), 140.0), (date(2023, 4, 28), 154.0)])
        .with("XLF", &[(date(2023, 3, 1), 36.0), (date(2023, 4, 28), 32.4)]);
    let weights = PortfolioWeights::new([("SPY", 0), ("XLK", 50), ("XLF", 50)]);

    let report = simulate_portfolio(&prices, &Scenario::BankFailures.into(), &weights)
        .await
        .unwrap();

    assert_eq!(report.series.len(), 2);
    assert_relative_eq!(report.stats.total_return.unwrap(), 0.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_bad_weights_fetch_nothing() {
    let prices = MockPrices::default().with("SPY", &[(date(2020, 2, 3), 320.0)]);
    let weights = PortfolioWeights::new([("SPY", 60), ("XLK", 30)]);

    let err = simulate_portfolio(&prices, &Scenario::CovidShock.into(), &weights)
        .await
        .unwrap_err();

    assert_eq!(
        err.weight_error(),
        Some(&WeightError::SumMismatch { total: 90 })
    );
    assert_eq!(err.to_string(), "Validation failed: Weights must sum to 100% (got 90%)");
    assert_eq!(prices.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_market_overview_flags_inversion() {
    let prices = MockPrices::default().with(
        "SPY",
        &[(date(2023, 3, 1), 395.0), (date(2023, 3, 31), 409.0), (date(2023, 5, 1), 415.0)],
    );
    let scenario = StressWindow::from(Scenario::BankFailures);

    let report = market_overview(&prices, &bank_failure_macro(), &scenario)
        .await
        .unwrap();

    assert_eq!(report.market.len(), 2);
    assert_eq!(report.fed_funds.len(), 2);
    // 2023-03 and 2023-04 have a year of history behind them.
    assert_eq!(report.cpi_yoy.len(), 2);
    assert_relative_eq!(
        report.cpi_yoy.observations()[0].value.unwrap(),
        (294.0 / 282.0 - 1.0) * 100.0,
        epsilon = 1e-9
    );
    assert_eq!(report.curve_shape(), Some(CurveShape::Inverted));
    assert!(report.to_ascii_table().contains("inversion detected"));
}

#[tokio::test]
async fn test_market_overview_missing_series_is_provider_error() {
    let prices = MockPrices::default();
    let macros = MockMacro {
        data: HashMap::new(),
    };

    let err = market_overview(&prices, &macros, &Scenario::CovidShock.into())
        .await
        .unwrap_err();

    assert!(err.is_provider_error());
    assert!(matches!(err, Error::Data(DataError::UnknownSeries(_))));
}

#[tokio::test]
async fn test_heatmap_uses_sector_names_and_skips_spy() {
    let prices = MockPrices::default()
        .with("SPY", &[(date(2020, 2, 3), 320.0), (date(2020, 4, 30), 290.0)])
        .with("XLE", &[(date(2020, 2, 3), 50.0), (date(2020, 4, 30), 35.0)])
        .with("XLK", &[
            (date(2020, 2, 3), 90.0),
            (date(2020, 4, 30), 90.9),
            (date(2023, 3, 1), 130.0),
            (date(2023, 4, 28), 143.0),
        ]);
    let scenarios = vec![
        StressWindow::from(Scenario::CovidShock),
        StressWindow::from(Scenario::BankFailures),
    ];

    let report = sector_heatmap(&prices, &scenarios, &EtfUniverse::heatmap())
        .await
        .unwrap();
    let heatmap = &report.heatmap;

    assert_eq!(heatmap.columns(), ["Technology", "Energy"]);
    assert_eq!(heatmap.rows().len(), 3);
    assert_relative_eq!(
        heatmap.value("COVID Shock (Feb–Mar 2020)", "Energy").unwrap(),
        -30.0,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        heatmap.value("Bank Failures (Mar 2023)", "Technology").unwrap(),
        10.0,
        epsilon = 1e-9
    );
    assert_eq!(heatmap.value("Bank Failures (Mar 2023)", "Energy"), None);
    assert_relative_eq!(heatmap.value("Average", "Energy").unwrap(), -30.0, epsilon = 1e-9);
    assert_eq!(prices.calls.load(Ordering::SeqCst), 2);
}
