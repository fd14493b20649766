//! Yahoo Finance market-data provider.

pub mod quotes;

pub use quotes::{PriceField, QuoteConfig, YahooQuoteProvider};
