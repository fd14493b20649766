//! Percentage changes: simple returns and year-over-year growth.

use crate::error::Result;
use macrostress_data::{DATE_COLUMN, MacroSeries};
use polars::prelude::*;

/// Lag, in observations, for year-over-year change on monthly data.
pub const YOY_LAG: usize = 12;

/// Simple period returns `v[t] / v[t-1] - 1`. The first period has no return
/// and is omitted, so the output is one shorter than the input.
pub fn simple_returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Percentage change over `lag` observations of a macro series, in percent.
///
/// The first `lag` observations are undefined, as is any observation where
/// either operand is missing or the earlier value is zero. Computed over the
/// whole series; window and drop undefined rows afterwards so the lag can
/// reach history before the window start.
pub fn percent_change(series: &MacroSeries, lag: usize) -> Result<MacroSeries> {
    let id = series.id();
    let df = series
        .to_frame()?
        .lazy()
        .sort([DATE_COLUMN], SortMultipleOptions::default())
        .with_column(
            ((col(id) / col(id).shift(lit(lag as i64)) - lit(1.0)) * lit(100.0)).alias(id),
        )
        .collect()?;
    Ok(MacroSeries::from_frame(id, &df)?)
}

/// Year-over-year percent change of a monthly series.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use macrostress_data::{MacroObservation, MacroSeries};
/// use macrostress_metrics::yoy_percent_change;
///
/// let observations = (0..13)
///     .map(|m| {
///         let date = NaiveDate::from_ymd_opt(2020 + m / 12, (m % 12) as u32 + 1, 1).unwrap();
///         MacroObservation::new(date, Some(100.0 + f64::from(m)))
///     })
///     .collect();
/// let yoy = yoy_percent_change(&MacroSeries::new("CPIAUCSL", observations)).unwrap();
///
/// assert_eq!(yoy.dropna().len(), 1);
/// ```
pub fn yoy_percent_change(series: &MacroSeries) -> Result<MacroSeries> {
    percent_change(series, YOY_LAG)
}
