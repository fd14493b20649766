//! Rebasing price levels to a common starting value of 100.

use crate::error::Result;
use macrostress_data::{MultiSeriesWide, PriceSeries};
use polars::prelude::*;

/// Starting level of every rebased series.
pub const BASE_LEVEL: f64 = 100.0;

/// Rebase a price series so its first price is 100.
pub fn rebase_series(series: &PriceSeries) -> Result<PriceSeries> {
    let df = series
        .to_frame()?
        .lazy()
        .with_column((col("price") / col("price").first() * lit(BASE_LEVEL)).alias("price"))
        .collect()?;
    Ok(PriceSeries::from_frame(series.ticker(), &df)?)
}

/// Forward-fill a wide table, then rebase every column to 100 at its first
/// defined value.
///
/// Cells before a column's first defined value stay undefined. A zero
/// baseline leaves the whole column undefined.
pub fn rebase_wide(prices: &MultiSeriesWide) -> Result<MultiSeriesWide> {
    let filled = prices.forward_fill()?;
    if filled.tickers().is_empty() {
        return Ok(filled);
    }

    let rebased: Vec<Expr> = filled
        .tickers()
        .iter()
        .map(|t| {
            let name = t.as_str();
            (col(name) / col(name).drop_nulls().first() * lit(BASE_LEVEL)).alias(name)
        })
        .collect();
    let df = filled.to_frame()?.lazy().with_columns(rebased).collect()?;
    Ok(MultiSeriesWide::from_frame(&df)?)
}
