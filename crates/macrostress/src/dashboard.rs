//! Dashboard workflows: market overview, portfolio simulation and sector heatmap.
//!
//! Each workflow composes the fetch operations with the pure metrics over the
//! provider traits, so any [`PriceSource`] / [`MacroSource`] can back them.

use crate::catalog::{EtfUniverse, Scenario, SectorEtf};
use crate::error::Result;
use macrostress_data::fred::{CPI, FED_FUNDS, TBILL_3M, TREASURY_10Y};
use macrostress_data::{
    DateWindow, MacroSource, PriceSource, fetch_multiple_prices, fetch_single_price,
    fetch_statistical_series,
};
use macrostress_metrics::{
    PortfolioStats, PortfolioWeights, SectorHeatmap, portfolio_value, rebase_wide,
    total_return_by_ticker, yield_spread, yoy_percent_change,
};
use macrostress_output::{HeatmapReport, MarketReport, PortfolioReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A labelled analysis window, either from the catalog or user supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressWindow {
    /// Display label
    pub label: String,
    /// Inclusive date range
    pub window: DateWindow,
    /// What happened, empty for custom windows
    pub description: String,
    /// Investor takeaway, empty for custom windows
    pub insight: String,
}

impl StressWindow {
    /// A user-defined window without narrative.
    pub fn custom(label: impl Into<String>, window: DateWindow) -> Self {
        Self {
            label: label.into(),
            window,
            description: String::new(),
            insight: String::new(),
        }
    }

    /// Every catalog scenario, in order.
    pub fn catalog() -> Vec<Self> {
        Scenario::all().into_iter().map(Self::from).collect()
    }
}

impl From<Scenario> for StressWindow {
    fn from(scenario: Scenario) -> Self {
        Self {
            label: scenario.label().to_string(),
            window: scenario.window(),
            description: scenario.description().to_string(),
            insight: scenario.insight().to_string(),
        }
    }
}

/// Load the macro market overview for one window.
///
/// Fetches the broad-market ETF over the window and the four FRED series over
/// their full history. CPI year-over-year change is computed before the
/// series is sliced so the first months of the window keep their values.
pub async fn market_overview<P, M>(
    prices: &P,
    macros: &M,
    scenario: &StressWindow,
) -> Result<MarketReport>
where
    P: PriceSource + ?Sized,
    M: MacroSource + ?Sized,
{
    let window = &scenario.window;
    info!(scenario = %scenario.label, %window, "loading market overview");

    let market = fetch_single_price(prices, SectorEtf::Spy.ticker(), window).await?;
    let fed_funds = fetch_statistical_series(macros, FED_FUNDS)
        .await?
        .window(window)
        .dropna();
    let cpi = fetch_statistical_series(macros, CPI).await?;
    let cpi_yoy = yoy_percent_change(&cpi)?.window(window).dropna();
    let long = fetch_statistical_series(macros, TREASURY_10Y).await?;
    let short = fetch_statistical_series(macros, TBILL_3M).await?;
    let curve = yield_spread(&long, &short)?.window(window).dropna();

    debug!(
        market = market.len(),
        fed_funds = fed_funds.len(),
        cpi_yoy = cpi_yoy.len(),
        curve = curve.len(),
        "market overview rows"
    );

    Ok(MarketReport {
        scenario: scenario.label.clone(),
        window: *window,
        description: scenario.description.clone(),
        insight: scenario.insight.clone(),
        market,
        fed_funds,
        cpi_yoy,
        curve,
    })
}

/// Simulate a static buy-and-hold portfolio over one window.
///
/// Weights are validated before anything is fetched; an invalid set returns
/// [`crate::Error::Metrics`] without touching the provider. Zero-weight
/// tickers are not requested.
pub async fn simulate_portfolio<P>(
    prices: &P,
    scenario: &StressWindow,
    weights: &PortfolioWeights,
) -> Result<PortfolioReport>
where
    P: PriceSource + ?Sized,
{
    weights.validate()?;

    let window = &scenario.window;
    let selected = weights.selected();
    info!(scenario = %scenario.label, tickers = ?selected, "simulating portfolio");

    let long = fetch_multiple_prices(prices, &selected, window).await?;
    let indexed = rebase_wide(&long.pivot()?)?;
    let series = portfolio_value(&indexed, weights)?;
    let stats = PortfolioStats::from_series(&series);

    Ok(PortfolioReport {
        scenario: scenario.label.clone(),
        window: *window,
        weights: weights.clone(),
        series,
        stats,
    })
}

/// Total return of each fund in `universe` over one window, keyed by sector name.
///
/// Funds without prices in the window are absent from the result.
pub async fn scenario_sector_returns<P>(
    prices: &P,
    scenario: &StressWindow,
    universe: &EtfUniverse,
) -> Result<BTreeMap<String, f64>>
where
    P: PriceSource + ?Sized,
{
    let long = fetch_multiple_prices(prices, &universe.symbols(), &scenario.window).await?;
    let returns = total_return_by_ticker(&long)?
        .into_iter()
        .map(|(ticker, ret)| {
            let name = universe.sector_name(&ticker).map_or(ticker, str::to_string);
            (name, ret)
        })
        .collect();
    Ok(returns)
}

/// Build the scenario x sector heatmap, fetching one window after another.
pub async fn sector_heatmap<P>(
    prices: &P,
    scenarios: &[StressWindow],
    universe: &EtfUniverse,
) -> Result<HeatmapReport>
where
    P: PriceSource + ?Sized,
{
    let mut rows = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let returns = scenario_sector_returns(prices, scenario, universe).await?;
        rows.push((scenario.label.clone(), returns));
    }
    Ok(HeatmapReport::new(SectorHeatmap::build(rows)))
}
