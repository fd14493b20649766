//! Multi-ticker price tables in long (tidy) and wide (pivoted) form.
//!
//! The long form holds one row per (date, ticker) observation. The wide form
//! aligns all tickers on the union of their dates, leaving cells undefined
//! where a ticker has no observation (provider holidays differ, listings start
//! later). Reshaping runs as polars queries over [`MultiSeriesLong::to_frame`]
//! and [`MultiSeriesWide::to_frame`].

use crate::columnar::{
    DATE_COLUMN, date_column, outer_join_on_date, read_dates, read_strings, read_values,
};
use crate::error::Result;
use crate::series::{PricePoint, PriceSeries};
use crate::window::DateWindow;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One observation in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRow {
    /// Trading date
    pub date: NaiveDate,
    /// Ticker symbol
    pub ticker: String,
    /// Closing price (or a value derived from it)
    pub price: f64,
}

impl LongRow {
    /// Create a row.
    pub fn new(date: NaiveDate, ticker: impl Into<String>, price: f64) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            price,
        }
    }
}

/// Prices for N tickers in long form, ordered by (ticker, date).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesLong {
    rows: Vec<LongRow>,
}

impl MultiSeriesLong {
    /// Create a table; rows are sorted by (ticker, date) and duplicates keep the last value.
    pub fn new(mut rows: Vec<LongRow>) -> Self {
        rows.sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.date.cmp(&b.date)));
        rows.reverse();
        rows.dedup_by(|a, b| a.ticker == b.ticker && a.date == b.date);
        rows.reverse();
        Self { rows }
    }

    /// Stack single-ticker series. Empty series contribute nothing.
    pub fn from_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        let rows = series
            .into_iter()
            .flat_map(|s| {
                let ticker = s.ticker().to_string();
                s.points()
                    .iter()
                    .map(|p| LongRow::new(p.date, ticker.clone(), p.price))
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::new(rows)
    }

    /// Read a frame with `date`, `ticker` and `price` columns. Rows with a
    /// missing ticker or price are skipped.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let rows = read_dates(df, DATE_COLUMN)?
            .into_iter()
            .zip(read_strings(df, "ticker")?)
            .zip(read_values(df, "price")?)
            .filter_map(|((date, ticker), price)| Some(LongRow::new(date, ticker?, price?)))
            .collect();
        Ok(Self::new(rows))
    }

    /// Rows in (ticker, date) order.
    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct tickers, sorted.
    pub fn tickers(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.ticker.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// The series for one ticker (empty if absent).
    pub fn series(&self, ticker: &str) -> PriceSeries {
        let points = self
            .rows
            .iter()
            .filter(|r| r.ticker == ticker)
            .map(|r| PricePoint::new(r.date, r.price))
            .collect();
        PriceSeries::new(ticker, points)
    }

    /// Restrict to rows inside `window`.
    pub fn window(&self, window: &DateWindow) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .filter(|r| window.contains(r.date))
                .cloned()
                .collect(),
        }
    }

    /// Pivot long to wide: one row per date in the union of all tickers' dates,
    /// one column per ticker in sorted order.
    pub fn pivot(&self) -> Result<MultiSeriesWide> {
        let long = self.to_frame()?.lazy();
        let columns = self
            .tickers()
            .into_iter()
            .map(|ticker| {
                long.clone()
                    .filter(col("ticker").eq(lit(ticker.as_str())))
                    .select([col(DATE_COLUMN), col("price").alias(ticker.as_str())])
            })
            .collect();
        let df = outer_join_on_date(columns)?.collect()?;
        MultiSeriesWide::from_frame(&df)
    }

    /// Convert to a DataFrame with columns: date, ticker, price
    pub fn to_frame(&self) -> Result<DataFrame> {
        let dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        let tickers: Vec<&str> = self.rows.iter().map(|r| r.ticker.as_str()).collect();
        let prices: Vec<f64> = self.rows.iter().map(|r| r.price).collect();

        let df = DataFrame::new(vec![
            date_column(DATE_COLUMN, &dates)?,
            Series::new("ticker".into(), tickers).into(),
            Series::new("price".into(), prices).into(),
        ])?;
        Ok(df)
    }
}

/// Prices for N tickers aligned on a common date axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSeriesWide {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl MultiSeriesWide {
    /// Read a frame with a `date` column; every other column is a ticker.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let dates = read_dates(df, DATE_COLUMN)?;
        let mut tickers = Vec::new();
        let mut columns = Vec::new();
        for name in df.get_column_names() {
            if name.as_str() == DATE_COLUMN {
                continue;
            }
            columns.push(read_values(df, name.as_str())?);
            tickers.push(name.to_string());
        }
        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Date axis in increasing order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column names.
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Whether there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    /// Values for one ticker, aligned with [`Self::dates`].
    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|i| self.columns[i].as_slice())
    }

    /// Propagate the last known value of each column into later gaps.
    ///
    /// Leading gaps stay undefined: no value is invented before a ticker's
    /// first observation.
    pub fn forward_fill(&self) -> Result<Self> {
        let df = self.to_frame()?;
        let filled = df
            .get_columns()
            .iter()
            .map(|c| {
                if c.name().as_str() == DATE_COLUMN {
                    Ok(c.clone())
                } else {
                    c.as_materialized_series()
                        .fill_null(FillNullStrategy::Forward(None))
                        .map(Column::from)
                }
            })
            .collect::<PolarsResult<Vec<_>>>()?;
        Self::from_frame(&DataFrame::new(filled)?)
    }

    /// Keep only the named columns, in the order given. Unknown names are skipped.
    pub fn select(&self, tickers: &[String]) -> Result<Self> {
        let names: Vec<&str> = std::iter::once(DATE_COLUMN)
            .chain(
                tickers
                    .iter()
                    .map(String::as_str)
                    .filter(|t| self.column(t).is_some()),
            )
            .collect();
        Self::from_frame(&self.to_frame()?.select(names)?)
    }

    /// Unpivot wide to long, dropping undefined cells.
    pub fn melt(&self) -> Result<MultiSeriesLong> {
        if self.tickers.is_empty() {
            return Ok(MultiSeriesLong::default());
        }
        let wide = self.to_frame()?.lazy();
        let stacked = self
            .tickers
            .iter()
            .map(|ticker| {
                wide.clone()
                    .select([
                        col(DATE_COLUMN),
                        lit(ticker.as_str()).alias("ticker"),
                        col(ticker.as_str()).alias("price"),
                    ])
                    .filter(col("price").is_not_null())
            })
            .collect::<Vec<_>>();
        let df = concat(stacked, UnionArgs::default())?.collect()?;
        MultiSeriesLong::from_frame(&df)
    }

    /// Convert to a DataFrame with columns: date, then one column per ticker
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![date_column(DATE_COLUMN, &self.dates)?];
        for (ticker, values) in self.tickers.iter().zip(&self.columns) {
            columns.push(Series::new(ticker.as_str().into(), values.clone()).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Rebase each ticker so its first chronological price is 100.
///
/// Rows are sorted by (ticker, date) before the per-ticker baseline is taken,
/// so the input order does not matter.
pub fn normalize_prices(series: MultiSeriesLong) -> Result<MultiSeriesLong> {
    let df = series
        .to_frame()?
        .lazy()
        .sort(["ticker", DATE_COLUMN], SortMultipleOptions::default())
        .with_column(
            (col("price") / col("price").first().over([col("ticker")]) * lit(100.0))
                .alias("price"),
        )
        .collect()?;
    MultiSeriesLong::from_frame(&df)
}
