//! Static buy-and-hold portfolio over rebased ETF prices.

use crate::error::{Result, WeightError};
use crate::rebase::BASE_LEVEL;
use crate::returns::simple_returns;
use crate::risk::{annualized_volatility, max_drawdown, total_return};
use chrono::NaiveDate;
use macrostress_data::{MultiSeriesWide, PricePoint, PriceSeries};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Name of the combined portfolio series.
pub const PORTFOLIO_NAME: &str = "Portfolio";

/// Slider granularity for interactive weight input.
pub const WEIGHT_STEP: u8 = 5;

/// Required sum of all weights.
pub const WEIGHT_TOTAL: u32 = 100;

/// Integer percentage weights per ticker, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    weights: Vec<(String, u8)>,
}

impl PortfolioWeights {
    /// Build from `(ticker, percent)` pairs. A repeated ticker keeps its last weight.
    pub fn new<S: Into<String>>(weights: impl IntoIterator<Item = (S, u8)>) -> Self {
        let mut out: Vec<(String, u8)> = Vec::new();
        for (ticker, weight) in weights {
            let ticker = ticker.into();
            match out.iter_mut().find(|(t, _)| *t == ticker) {
                Some(slot) => slot.1 = weight,
                None => out.push((ticker, weight)),
            }
        }
        Self { weights: out }
    }

    /// All `(ticker, percent)` pairs, including zero weights.
    pub fn weights(&self) -> &[(String, u8)] {
        &self.weights
    }

    /// Weight of `ticker`, zero if absent.
    pub fn weight(&self, ticker: &str) -> u8 {
        self.weights
            .iter()
            .find(|(t, _)| t == ticker)
            .map_or(0, |(_, w)| *w)
    }

    /// Sum of the weights.
    pub fn total(&self) -> u32 {
        self.weights.iter().map(|(_, w)| u32::from(*w)).sum()
    }

    /// Check every weight is within 0..=100 and the sum is exactly 100.
    pub fn validate(&self) -> std::result::Result<(), WeightError> {
        let out_of_range = self
            .weights
            .iter()
            .find(|(_, w)| u32::from(*w) > WEIGHT_TOTAL);
        if let Some((ticker, weight)) = out_of_range {
            return Err(WeightError::OutOfRange {
                ticker: ticker.clone(),
                weight: *weight,
            });
        }
        let total = self.total();
        if total != WEIGHT_TOTAL {
            return Err(WeightError::SumMismatch { total });
        }
        Ok(())
    }

    /// Check every weight is a multiple of `step`, as a slider would produce.
    pub fn validate_step(&self, step: u8) -> std::result::Result<(), WeightError> {
        match self.weights.iter().find(|(_, w)| step != 0 && w % step != 0) {
            Some((ticker, weight)) => Err(WeightError::OffStep {
                ticker: ticker.clone(),
                weight: *weight,
                step,
            }),
            None => Ok(()),
        }
    }

    /// Tickers with a non-zero weight, in input order.
    pub fn selected(&self) -> Vec<String> {
        self.weights
            .iter()
            .filter(|(_, w)| *w > 0)
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Non-zero weights as fractions of one, aligned with [`Self::selected`].
    pub fn fractions(&self) -> Vec<f64> {
        self.weights
            .iter()
            .filter(|(_, w)| *w > 0)
            .map(|(_, w)| f64::from(*w) / 100.0)
            .collect()
    }
}

/// Weighted sum of rebased prices for the selected tickers.
///
/// `indexed` should already be forward-filled and rebased to 100. Rows where
/// any selected ticker is undefined are dropped, and the remaining values are
/// rescaled so the first of them is exactly 100: a ticker that starts trading
/// late only joins the portfolio from its first price. If a selected ticker
/// has no column at all the result is empty.
///
/// # Errors
///
/// Returns [`crate::MetricsError::ValidationFailed`] if the weights are invalid;
/// nothing is computed in that case.
pub fn portfolio_value(
    indexed: &MultiSeriesWide,
    weights: &PortfolioWeights,
) -> Result<PriceSeries> {
    weights.validate()?;

    let selected = weights.selected();
    let missing: Vec<&String> = selected
        .iter()
        .filter(|t| indexed.column(t).is_none())
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "no prices for weighted tickers, portfolio is empty");
        return Ok(PriceSeries::empty(PORTFOLIO_NAME));
    }

    let table = indexed.select(&selected)?;
    let height = table.height();
    let mut matrix = Array2::<f64>::from_elem((height, selected.len()), f64::NAN);
    for (j, ticker) in selected.iter().enumerate() {
        if let Some(column) = table.column(ticker) {
            for (i, value) in column.iter().enumerate() {
                if let Some(v) = value {
                    matrix[[i, j]] = *v;
                }
            }
        }
    }
    let allocation = Array1::from(weights.fractions());
    let values = matrix.dot(&allocation);

    let defined: Vec<(NaiveDate, f64)> = table
        .dates()
        .iter()
        .zip(values.iter())
        .filter(|(_, v)| v.is_finite())
        .map(|(date, v)| (*date, *v))
        .collect();
    let Some(base) = defined.first().map(|(_, v)| *v).filter(|b| *b != 0.0) else {
        return Ok(PriceSeries::empty(PORTFOLIO_NAME));
    };
    let points = defined
        .into_iter()
        .map(|(date, v)| PricePoint::new(date, v / base * BASE_LEVEL))
        .collect();

    Ok(PriceSeries::new(PORTFOLIO_NAME, points))
}

/// Summary statistics of a portfolio value series indexed to 100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Change from the first to the last value, in percent
    pub total_return: Option<f64>,
    /// Sample std of daily returns times sqrt(252)
    pub annualized_volatility: Option<f64>,
    /// Largest peak-to-trough decline, in percent
    pub max_drawdown: Option<f64>,
}

impl PortfolioStats {
    /// Compute from a portfolio value series.
    pub fn from_series(series: &PriceSeries) -> Self {
        let values = series.prices();
        Self {
            total_return: total_return(&values),
            annualized_volatility: annualized_volatility(&simple_returns(&values)),
            max_drawdown: max_drawdown(&values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use crate::rebase::rebase_wide;
    use approx::assert_relative_eq;
    use macrostress_data::{LongRow, MultiSeriesLong};
    use rstest::rstest;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, d).unwrap()
    }

    fn two_etfs() -> MultiSeriesWide {
        MultiSeriesLong::new(vec![
            LongRow::new(date(1), "A", 100.0),
            LongRow::new(date(2), "A", 110.0),
            LongRow::new(date(1), "B", 100.0),
            LongRow::new(date(2), "B", 90.0),
        ])
        .pivot()
        .unwrap()
    }

    #[test]
    fn test_portfolio_weighting() {
        let weights = PortfolioWeights::new([("A", 60), ("B", 40)]);
        let series = portfolio_value(&rebase_wide(&two_etfs()).unwrap(), &weights).unwrap();
        let values = series.prices();

        assert_eq!(series.ticker(), PORTFOLIO_NAME);
        assert_relative_eq!(values[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 102.0, epsilon = 1e-9);
    }

    #[rstest]
    #[case(vec![("A", 50), ("B", 40)], 90)]
    #[case(vec![("A", 60), ("B", 45)], 105)]
    #[case(vec![], 0)]
    fn test_weight_sum_gate(#[case] raw: Vec<(&str, u8)>, #[case] total: u32) {
        let weights = PortfolioWeights::new(raw);
        let result = portfolio_value(&two_etfs(), &weights);

        match result {
            Err(MetricsError::ValidationFailed(WeightError::SumMismatch { total: got })) => {
                assert_eq!(got, total);
            }
            other => panic!("expected sum mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_weight() {
        let weights = PortfolioWeights::new([("A", 150), ("B", 0)]);
        assert!(matches!(
            weights.validate(),
            Err(WeightError::OutOfRange { weight: 150, .. })
        ));
    }

    #[test]
    fn test_step_validation() {
        assert!(PortfolioWeights::new([("A", 55), ("B", 45)])
            .validate_step(WEIGHT_STEP)
            .is_ok());
        assert!(matches!(
            PortfolioWeights::new([("A", 52), ("B", 48)]).validate_step(WEIGHT_STEP),
            Err(WeightError::OffStep { weight: 52, .. })
        ));
    }

    #[test]
    fn test_zero_weights_are_not_selected() {
        let weights = PortfolioWeights::new([("SPY", 0), ("XLK", 100), ("XLF", 0)]);
        assert_eq!(weights.selected(), vec!["XLK".to_string()]);
        assert_eq!(weights.fractions(), vec![1.0]);
        assert_eq!(weights.weight("XLF"), 0);
        assert_eq!(weights.weight("QQQ"), 0);
    }

    #[test]
    fn test_repeated_ticker_keeps_last() {
        let weights = PortfolioWeights::new([("A", 10), ("A", 100)]);
        assert_eq!(weights.total(), 100);
        assert_eq!(weights.weights().len(), 1);
    }

    #[test]
    fn test_rows_with_undefined_ticker_are_dropped() {
        let wide = MultiSeriesLong::new(vec![
            LongRow::new(date(1), "A", 100.0),
            LongRow::new(date(2), "A", 101.0),
            LongRow::new(date(3), "A", 102.0),
            LongRow::new(date(2), "B", 50.0),
            LongRow::new(date(3), "B", 51.0),
        ])
        .pivot()
        .unwrap();
        let weights = PortfolioWeights::new([("A", 50), ("B", 50)]);

        let series = portfolio_value(&rebase_wide(&wide).unwrap(), &weights).unwrap();

        assert_eq!(series.dates(), vec![date(2), date(3)]);
    }

    #[test]
    fn test_late_listing_ticker_does_not_inflate_return() {
        // A gains 20% before B lists, then neither moves.
        let wide = MultiSeriesLong::new(vec![
            LongRow::new(date(1), "A", 100.0),
            LongRow::new(date(2), "A", 120.0),
            LongRow::new(date(3), "A", 120.0),
            LongRow::new(date(2), "B", 50.0),
            LongRow::new(date(3), "B", 50.0),
        ])
        .pivot()
        .unwrap();
        let weights = PortfolioWeights::new([("A", 50), ("B", 50)]);

        let series = portfolio_value(&rebase_wide(&wide).unwrap(), &weights).unwrap();
        let stats = PortfolioStats::from_series(&series);

        assert_relative_eq!(series.prices()[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(stats.total_return.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(stats.max_drawdown.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_ticker_gives_empty_portfolio() {
        let weights = PortfolioWeights::new([("A", 50), ("ZZZ", 50)]);
        let series = portfolio_value(&two_etfs(), &weights).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_stats_from_series() {
        let series = PriceSeries::new(
            PORTFOLIO_NAME,
            vec![
                PricePoint::new(date(1), 100.0),
                PricePoint::new(date(2), 120.0),
                PricePoint::new(date(3), 90.0),
                PricePoint::new(date(6), 130.0),
            ],
        );
        let stats = PortfolioStats::from_series(&series);

        assert_relative_eq!(stats.total_return.unwrap(), 30.0, epsilon = 1e-9);
        assert_relative_eq!(stats.max_drawdown.unwrap(), -25.0, epsilon = 1e-9);
        assert!(stats.annualized_volatility.unwrap() > 0.0);
    }

    #[test]
    fn test_stats_on_empty_series() {
        let stats = PortfolioStats::from_series(&PriceSeries::empty(PORTFOLIO_NAME));
        assert_eq!(stats, PortfolioStats::default());
    }
}
