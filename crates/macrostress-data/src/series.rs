//! Single-column time series: daily prices and macro releases.

use crate::columnar::{DATE_COLUMN, date_column, read_dates, read_values};
use crate::error::Result;
use crate::window::DateWindow;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Sort by key and keep the last observation of each duplicated key.
pub(crate) fn sort_dedup_last<T, K: Ord + Copy>(items: &mut Vec<T>, key: impl Fn(&T) -> K) {
    items.sort_by_key(&key);
    items.reverse();
    items.dedup_by_key(|item| key(&*item));
    items.reverse();
}

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub price: f64,
}

impl PricePoint {
    /// Create a price point.
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Daily closing prices of one ticker, strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create a series; points are sorted by date and duplicate dates keep the last value.
    pub fn new(ticker: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        sort_dedup_last(&mut points, |p| p.date);
        Self {
            ticker: ticker.into(),
            points,
        }
    }

    /// An empty series, the result of a valid query with no matching data.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    /// Ticker symbol.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Observations in date order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Prices in date order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Earliest observation.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Latest observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Restrict to observations inside `window`.
    pub fn window(&self, window: &DateWindow) -> Self {
        Self {
            ticker: self.ticker.clone(),
            points: self
                .points
                .iter()
                .filter(|p| window.contains(p.date))
                .copied()
                .collect(),
        }
    }

    /// Convert to a DataFrame with columns: date, price
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            date_column(DATE_COLUMN, &self.dates())?,
            Series::new("price".into(), self.prices()).into(),
        ])?;
        Ok(df)
    }

    /// Read a frame with `date` and `price` columns. Rows without a finite
    /// price are skipped.
    pub fn from_frame(ticker: impl Into<String>, df: &DataFrame) -> Result<Self> {
        let points = read_dates(df, DATE_COLUMN)?
            .into_iter()
            .zip(read_values(df, "price")?)
            .filter_map(|(date, price)| price.map(|p| PricePoint::new(date, p)))
            .collect();
        Ok(Self::new(ticker, points))
    }
}

/// One release of a macro series. `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroObservation {
    /// Observation date
    pub date: NaiveDate,
    /// Released value
    pub value: Option<f64>,
}

impl MacroObservation {
    /// Create an observation.
    pub const fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// A statistical series with irregular release dates, named by its series id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    id: String,
    observations: Vec<MacroObservation>,
}

impl MacroSeries {
    /// Create a series; observations are sorted by date and deduplicated.
    pub fn new(id: impl Into<String>, mut observations: Vec<MacroObservation>) -> Self {
        sort_dedup_last(&mut observations, |o| o.date);
        Self {
            id: id.into(),
            observations,
        }
    }

    /// Series identifier, also the name of the value column.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Observations in date order.
    pub fn observations(&self) -> &[MacroObservation] {
        &self.observations
    }

    /// Number of observations, defined or not.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Rename the value column.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Restrict to observations inside `window`.
    pub fn window(&self, window: &DateWindow) -> Self {
        Self {
            id: self.id.clone(),
            observations: self
                .observations
                .iter()
                .filter(|o| window.contains(o.date))
                .copied()
                .collect(),
        }
    }

    /// Drop observations without a value.
    pub fn dropna(&self) -> Self {
        Self {
            id: self.id.clone(),
            observations: self
                .observations
                .iter()
                .filter(|o| o.value.is_some())
                .copied()
                .collect(),
        }
    }

    /// Defined `(date, value)` pairs.
    pub fn defined(&self) -> Vec<(NaiveDate, f64)> {
        self.observations
            .iter()
            .filter_map(|o| o.value.map(|v| (o.date, v)))
            .collect()
    }

    /// Convert to a DataFrame with columns: date, `<id>`
    pub fn to_frame(&self) -> Result<DataFrame> {
        let dates: Vec<NaiveDate> = self.observations.iter().map(|o| o.date).collect();
        let values: Vec<Option<f64>> = self.observations.iter().map(|o| o.value).collect();
        let df = DataFrame::new(vec![
            date_column(DATE_COLUMN, &dates)?,
            Series::new(self.id.as_str().into(), values).into(),
        ])?;
        Ok(df)
    }

    /// Read a frame with a `date` column and a value column named `id`.
    pub fn from_frame(id: impl Into<String>, df: &DataFrame) -> Result<Self> {
        let id = id.into();
        let observations = read_dates(df, DATE_COLUMN)?
            .into_iter()
            .zip(read_values(df, &id)?)
            .map(|(date, value)| MacroObservation::new(date, value))
            .collect();
        Ok(Self::new(id, observations))
    }
}
