//! Moving typed tables in and out of polars frames.
//!
//! Every table converts to a `DataFrame` with a `date` column of dtype `Date`
//! plus value columns; transforms run as lazy queries and are read back with
//! the `read_*` helpers.

use crate::error::{DataError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Name of the date column in every frame.
pub const DATE_COLUMN: &str = "date";

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Build a polars `Date` column from calendar dates.
pub fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into())
}

/// Read a `Date` column back into calendar dates.
pub fn read_dates(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    days.i32()?
        .into_iter()
        .map(|d| {
            d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                .ok_or_else(|| DataError::Parse(format!("null or invalid date in column '{name}'")))
        })
        .collect()
}

/// Read a numeric column as `f64`. Nulls, NaN and infinities read as `None`.
pub fn read_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    let values = values
        .f64()?
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite()))
        .collect();
    Ok(values)
}

/// Read a string column.
pub fn read_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = df
        .column(name)?
        .str()?
        .into_iter()
        .map(|s| s.map(str::to_string))
        .collect();
    Ok(values)
}

/// Outer-join frames on [`DATE_COLUMN`].
///
/// Each frame carries a `date` column plus value columns whose names do not
/// clash across frames. The result has one row per date in the union of all
/// inputs, sorted ascending, with nulls where a frame has no row for a date.
pub fn outer_join_on_date(frames: Vec<LazyFrame>) -> Result<LazyFrame> {
    if frames.is_empty() {
        return Ok(DataFrame::new(vec![date_column(DATE_COLUMN, &[])?])?.lazy());
    }

    let axis = concat(
        frames
            .iter()
            .map(|lf| lf.clone().select([col(DATE_COLUMN)]))
            .collect::<Vec<_>>(),
        UnionArgs::default(),
    )?
    .select([col(DATE_COLUMN).unique()]);

    let joined = frames.into_iter().fold(axis, |acc, frame| {
        acc.join(
            frame,
            [col(DATE_COLUMN)],
            [col(DATE_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
    });

    Ok(joined.sort([DATE_COLUMN], SortMultipleOptions::default()))
}
