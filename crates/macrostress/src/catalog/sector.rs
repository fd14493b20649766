//! Broad-market and sector ETFs used by the portfolio builder and heatmap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exchange-traded fund in the dashboard universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectorEtf {
    /// SPDR S&P 500
    Spy,

    /// Technology Select Sector SPDR
    Xlk,

    /// Financial Select Sector SPDR
    Xlf,

    /// Energy Select Sector SPDR
    Xle,

    /// Health Care Select Sector SPDR
    Xlv,
}

impl SectorEtf {
    /// All five ETFs offered by the portfolio builder.
    pub fn all() -> Vec<Self> {
        vec![Self::Spy, Self::Xlk, Self::Xlf, Self::Xle, Self::Xlv]
    }

    /// The four sector ETFs shown in the heatmap.
    pub fn sectors() -> Vec<Self> {
        vec![Self::Xlk, Self::Xlf, Self::Xle, Self::Xlv]
    }

    /// Exchange ticker.
    pub const fn ticker(&self) -> &'static str {
        match self {
            Self::Spy => "SPY",
            Self::Xlk => "XLK",
            Self::Xlf => "XLF",
            Self::Xle => "XLE",
            Self::Xlv => "XLV",
        }
    }

    /// Sector the fund tracks.
    pub const fn sector_name(&self) -> &'static str {
        match self {
            Self::Spy => "Broad Market",
            Self::Xlk => "Technology",
            Self::Xlf => "Financials",
            Self::Xle => "Energy",
            Self::Xlv => "Healthcare",
        }
    }

    /// Parse from a ticker, case-insensitive.
    pub fn from_ticker(ticker: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|etf| etf.ticker().eq_ignore_ascii_case(ticker.trim()))
    }
}

impl fmt::Display for SectorEtf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

impl FromStr for SectorEtf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ticker(s).ok_or_else(|| {
            let tickers: Vec<&str> = Self::all().iter().map(Self::ticker).collect();
            format!("unknown ETF '{s}' (expected one of: {})", tickers.join(", "))
        })
    }
}

/// An ordered set of ETFs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtfUniverse {
    etfs: Vec<SectorEtf>,
}

impl EtfUniverse {
    /// Create a universe from the given funds, dropping repeats.
    pub fn new(etfs: impl IntoIterator<Item = SectorEtf>) -> Self {
        let mut out = Vec::new();
        for etf in etfs {
            if !out.contains(&etf) {
                out.push(etf);
            }
        }
        Self { etfs: out }
    }

    /// The five funds offered by the portfolio builder.
    pub fn portfolio() -> Self {
        Self::new(SectorEtf::all())
    }

    /// The four sector funds shown in the heatmap.
    pub fn heatmap() -> Self {
        Self::new(SectorEtf::sectors())
    }

    /// Funds in order.
    pub fn etfs(&self) -> &[SectorEtf] {
        &self.etfs
    }

    /// Tickers in order.
    pub fn symbols(&self) -> Vec<String> {
        self.etfs.iter().map(|etf| etf.ticker().to_string()).collect()
    }

    /// Sector name for a ticker in this universe.
    pub fn sector_name(&self, ticker: &str) -> Option<&'static str> {
        self.etfs
            .iter()
            .find(|etf| etf.ticker() == ticker)
            .map(SectorEtf::sector_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_sizes() {
        assert_eq!(SectorEtf::all().len(), 5);
        assert_eq!(SectorEtf::sectors().len(), 4);
        assert!(!SectorEtf::sectors().contains(&SectorEtf::Spy));
    }

    #[test]
    fn test_sector_names() {
        assert_eq!(SectorEtf::Xlk.sector_name(), "Technology");
        assert_eq!(SectorEtf::Xlv.sector_name(), "Healthcare");
    }

    #[test]
    fn test_from_ticker() {
        assert_eq!(SectorEtf::from_ticker("xle"), Some(SectorEtf::Xle));
        assert_eq!(SectorEtf::from_ticker("QQQ"), None);
        assert!("QQQ".parse::<SectorEtf>().is_err());
    }

    #[test]
    fn test_heatmap_symbols() {
        assert_eq!(EtfUniverse::heatmap().symbols(), vec!["XLK", "XLF", "XLE", "XLV"]);
    }

    #[test]
    fn test_universe_dedup_and_names() {
        let universe = EtfUniverse::new([SectorEtf::Xle, SectorEtf::Spy, SectorEtf::Xle]);
        assert_eq!(universe.etfs(), [SectorEtf::Xle, SectorEtf::Spy]);
        assert_eq!(universe.sector_name("XLE"), Some("Energy"));
        assert_eq!(universe.sector_name("XLK"), None);
    }
}
