//! Yield curve spread between a long- and a short-tenor rate.

use crate::error::Result;
use chrono::NaiveDate;
use macrostress_data::columnar::{read_dates, read_values};
use macrostress_data::{DATE_COLUMN, DateWindow, MacroSeries, outer_join_on_date};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign of the yield curve over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveShape {
    /// The spread went below zero at least once.
    Inverted,
    /// The spread stayed at or above zero.
    Positive,
}

impl CurveShape {
    /// Message shown alongside the spread chart.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Inverted => {
                "Yield curve inversion detected: when the curve dips below 0, it often precedes a recession."
            }
            Self::Positive => {
                "The yield curve is currently positive: inversions (when spread < 0) often signal recessions."
            }
        }
    }
}

impl fmt::Display for CurveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted => write!(f, "inverted"),
            Self::Positive => write!(f, "positive"),
        }
    }
}

/// One date of the joined curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldCurveRow {
    /// Observation date
    pub date: NaiveDate,
    /// Long-tenor yield
    pub long: Option<f64>,
    /// Short-tenor yield
    pub short: Option<f64>,
    /// `long - short`, defined only when both sides are
    pub spread: Option<f64>,
}

/// Two rate series outer-joined on date with their spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldCurve {
    long_id: String,
    short_id: String,
    rows: Vec<YieldCurveRow>,
}

impl YieldCurve {
    /// Long-tenor series id.
    pub fn long_id(&self) -> &str {
        &self.long_id
    }

    /// Short-tenor series id.
    pub fn short_id(&self) -> &str {
        &self.short_id
    }

    /// Rows in date order.
    pub fn rows(&self) -> &[YieldCurveRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Restrict to rows inside `window`.
    pub fn window(&self, window: &DateWindow) -> Self {
        self.filtered(|r| window.contains(r.date))
    }

    /// Drop rows where either yield is missing.
    pub fn dropna(&self) -> Self {
        self.filtered(|r| r.long.is_some() && r.short.is_some())
    }

    /// Defined spreads in date order.
    pub fn spreads(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.spread).collect()
    }

    /// Smallest defined spread.
    pub fn min_spread(&self) -> Option<f64> {
        self.spreads().into_iter().reduce(f64::min)
    }

    /// Inverted if any spread is below zero; `None` when no spread is defined.
    pub fn shape(&self) -> Option<CurveShape> {
        self.min_spread().map(|min| {
            if min < 0.0 {
                CurveShape::Inverted
            } else {
                CurveShape::Positive
            }
        })
    }

    fn filtered(&self, keep: impl Fn(&YieldCurveRow) -> bool) -> Self {
        Self {
            long_id: self.long_id.clone(),
            short_id: self.short_id.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).copied().collect(),
        }
    }
}

/// Outer-join `long` and `short` on date and subtract `long - short`.
///
/// The join keeps the union of dates; rows where either side is missing keep
/// an undefined spread until the caller windows and drops them.
pub fn yield_spread(long: &MacroSeries, short: &MacroSeries) -> Result<YieldCurve> {
    let side = |series: &MacroSeries, name: &str| -> Result<LazyFrame> {
        Ok(series
            .to_frame()?
            .lazy()
            .select([col(DATE_COLUMN), col(series.id()).alias(name)]))
    };
    let df = outer_join_on_date(vec![side(long, "long")?, side(short, "short")?])?
        .with_column((col("long") - col("short")).alias("spread"))
        .collect()?;

    let rows = read_dates(&df, DATE_COLUMN)?
        .into_iter()
        .zip(read_values(&df, "long")?)
        .zip(read_values(&df, "short")?)
        .zip(read_values(&df, "spread")?)
        .map(|(((date, long), short), spread)| YieldCurveRow {
            date,
            long,
            short,
            spread,
        })
        .collect();

    Ok(YieldCurve {
        long_id: long.id().to_string(),
        short_id: short.id().to_string(),
        rows,
    })
}
