//! Fixed catalogs: stress scenarios, ETFs, macro series and trivia.
//!
//! Every dashboard workflow also accepts arbitrary windows and tickers; the
//! catalogs only supply the defaults the dashboard offers.

pub mod facts;
pub mod scenario;
pub mod sector;

pub use facts::{FUN_FACTS, random_fact};
pub use scenario::Scenario;
pub use sector::{EtfUniverse, SectorEtf};

use macrostress_data::fred::{CPI, FED_FUNDS, TBILL_3M, TREASURY_10Y};

/// Macro series fetched for the market overview, with display names.
pub const MACRO_SERIES: [(&str, &str); 4] = [
    (FED_FUNDS, "Fed Funds Rate"),
    (CPI, "CPI (All Urban Consumers)"),
    (TREASURY_10Y, "10-Year Treasury"),
    (TBILL_3M, "3-Month T-Bill"),
];
