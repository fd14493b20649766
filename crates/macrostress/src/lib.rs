#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/macrostress/macrostress/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod dashboard;
pub mod error;

// Re-export main types from sub-crates
pub use macrostress_data as data;
pub use macrostress_metrics as metrics;
pub use macrostress_output as output;

pub use catalog::{EtfUniverse, MACRO_SERIES, Scenario, SectorEtf, random_fact};
pub use dashboard::{
    StressWindow, market_overview, scenario_sector_returns, sector_heatmap, simulate_portfolio,
};
pub use error::{Error, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
