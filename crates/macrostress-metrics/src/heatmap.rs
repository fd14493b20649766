//! Per-scenario sector returns and the scenario x sector matrix.

use crate::error::Result;
use macrostress_data::{DATE_COLUMN, MultiSeriesLong};
use macrostress_data::columnar::{read_strings, read_values};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label of the appended column-mean row.
pub const AVERAGE_LABEL: &str = "Average";

/// Total return `(last / first - 1) * 100` of each ticker over the rows given.
///
/// Tickers with a zero first price are skipped.
pub fn total_return_by_ticker(prices: &MultiSeriesLong) -> Result<BTreeMap<String, f64>> {
    let by_date = col("price").sort_by([col(DATE_COLUMN)], SortMultipleOptions::default());
    let df = prices
        .to_frame()?
        .lazy()
        .group_by([col("ticker")])
        .agg([((by_date.clone().last() / by_date.first() - lit(1.0)) * lit(100.0))
            .alias("return")])
        .collect()?;

    let returns = read_strings(&df, "ticker")?
        .into_iter()
        .zip(read_values(&df, "return")?)
        .filter_map(|(ticker, value)| Some((ticker?, value?)))
        .collect();
    Ok(returns)
}

/// Round to one decimal place, the precision the matrix is shown at.
fn round_cell(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One labelled row of returns, aligned with [`SectorHeatmap::columns`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    /// Scenario label, or [`AVERAGE_LABEL`]
    pub label: String,
    /// Returns in percent, `None` where the scenario had no data
    pub values: Vec<Option<f64>>,
}

/// Scenario x sector return matrix with a trailing average row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectorHeatmap {
    columns: Vec<String>,
    rows: Vec<HeatmapRow>,
}

impl SectorHeatmap {
    /// Assemble the matrix from `(scenario label, returns by column)` pairs.
    ///
    /// Cells are rounded to one decimal place first, and the average row is
    /// the mean of the rounded cells, skipping missing ones. Columns are the
    /// union of all keys sorted by descending average.
    ///
    /// # Example
    /// ```
    /// use macrostress_metrics::SectorHeatmap;
    /// use std::collections::BTreeMap;
    ///
    /// let covid = BTreeMap::from([
    ///     ("Energy".to_string(), -40.0),
    ///     ("Technology".to_string(), -5.04),
    /// ]);
    /// let hikes = BTreeMap::from([
    ///     ("Energy".to_string(), 10.0),
    ///     ("Technology".to_string(), 25.0),
    /// ]);
    /// let heatmap = SectorHeatmap::build(vec![
    ///     ("COVID".to_string(), covid),
    ///     ("Hikes".to_string(), hikes),
    /// ]);
    ///
    /// assert_eq!(heatmap.columns(), ["Technology", "Energy"]);
    /// assert_eq!(heatmap.average().unwrap().values, vec![Some(10.0), Some(-15.0)]);
    /// ```
    pub fn build(scenarios: Vec<(String, BTreeMap<String, f64>)>) -> Self {
        if scenarios.is_empty() {
            return Self::default();
        }

        let scenarios: Vec<(String, BTreeMap<String, f64>)> = scenarios
            .into_iter()
            .map(|(label, returns)| {
                let rounded = returns
                    .into_iter()
                    .map(|(name, value)| (name, round_cell(value)))
                    .collect();
                (label, rounded)
            })
            .collect();

        // Every column comes from some scenario's keys, so each has a mean.
        let names: BTreeSet<&String> = scenarios.iter().flat_map(|(_, r)| r.keys()).collect();
        let mut columns: Vec<(String, f64)> = names
            .into_iter()
            .map(|name| {
                let defined: Vec<f64> = scenarios
                    .iter()
                    .filter_map(|(_, r)| r.get(name).copied())
                    .collect();
                let mean = defined.iter().sum::<f64>() / defined.len() as f64;
                (name.clone(), mean)
            })
            .collect();
        columns.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut rows: Vec<HeatmapRow> = scenarios
            .iter()
            .map(|(label, returns)| HeatmapRow {
                label: label.clone(),
                values: columns
                    .iter()
                    .map(|(name, _)| returns.get(name).copied())
                    .collect(),
            })
            .collect();
        rows.push(HeatmapRow {
            label: AVERAGE_LABEL.to_string(),
            values: columns.iter().map(|(_, mean)| Some(*mean)).collect(),
        });

        Self {
            columns: columns.into_iter().map(|(name, _)| name).collect(),
            rows,
        }
    }

    /// Column names, best average first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, scenarios in input order followed by the average row.
    pub fn rows(&self) -> &[HeatmapRow] {
        &self.rows
    }

    /// Scenario rows only.
    pub fn scenario_rows(&self) -> &[HeatmapRow] {
        match self.rows.split_last() {
            Some((_, scenarios)) => scenarios,
            None => &[],
        }
    }

    /// The average row, if any scenario was supplied.
    pub fn average(&self) -> Option<&HeatmapRow> {
        self.rows.last()
    }

    /// Cell value for a row label and column name.
    pub fn value(&self, label: &str, column: &str) -> Option<f64> {
        let j = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|r| r.label == label)
            .and_then(|r| r.values[j])
    }

    /// Whether no scenarios were supplied.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
