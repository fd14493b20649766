//! FRED statistical-series provider.
//!
//! Series used by the dashboard:
//! - `FEDFUNDS`: effective federal funds rate (monthly)
//! - `CPIAUCSL`: consumer price index, all urban consumers (monthly)
//! - `GS10`: 10-year Treasury constant maturity (monthly)
//! - `DTB3`: 3-month Treasury bill secondary market rate (daily)

pub mod client;

pub use client::{FRED_API_KEY_ENV, FRED_BASE_URL, FredClient, FredConfig};

/// Effective federal funds rate.
pub const FED_FUNDS: &str = "FEDFUNDS";
/// Consumer price index for all urban consumers.
pub const CPI: &str = "CPIAUCSL";
/// 10-year Treasury constant maturity rate.
pub const TREASURY_10Y: &str = "GS10";
/// 3-month Treasury bill rate.
pub const TBILL_3M: &str = "DTB3";
