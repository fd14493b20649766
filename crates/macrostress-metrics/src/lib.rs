#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/macrostress/macrostress/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod heatmap;
pub mod portfolio;
pub mod rebase;
pub mod returns;
pub mod risk;
pub mod spread;

// Re-export main types
pub use error::{MetricsError, Result, WeightError};
pub use heatmap::{AVERAGE_LABEL, HeatmapRow, SectorHeatmap, total_return_by_ticker};
pub use portfolio::{
    PORTFOLIO_NAME, PortfolioStats, PortfolioWeights, WEIGHT_STEP, WEIGHT_TOTAL, portfolio_value,
};
pub use rebase::{BASE_LEVEL, rebase_series, rebase_wide};
pub use returns::{YOY_LAG, percent_change, simple_returns, yoy_percent_change};
pub use risk::{
    TRADING_DAYS_PER_YEAR, annualized_volatility, max_drawdown, sample_std, total_return,
};
pub use spread::{CurveShape, YieldCurve, YieldCurveRow, yield_spread};
