#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/macrostress/macrostress/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod columnar;
pub mod error;
pub mod frames;
pub mod fred;
pub mod series;
pub mod source;
pub mod window;
pub mod yahoo;

pub use columnar::{DATE_COLUMN, outer_join_on_date};
pub use error::{DataError, Result};
pub use frames::{LongRow, MultiSeriesLong, MultiSeriesWide, normalize_prices};
pub use series::{MacroObservation, MacroSeries, PricePoint, PriceSeries};
pub use source::{
    MacroSource, PriceSource, fetch_multiple_prices, fetch_single_price, fetch_statistical_series,
};
pub use window::DateWindow;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
