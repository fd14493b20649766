//! Parsing `--weight TICKER=PERCENT` arguments.

use macrostress::SectorEtf;
use macrostress::metrics::{PortfolioWeights, WEIGHT_STEP, WeightError};

/// Parse one `TICKER=PERCENT` pair.
pub(crate) fn parse_weight(arg: &str) -> Result<(SectorEtf, u8), String> {
    let (ticker, percent) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected TICKER=PERCENT, got '{arg}'"))?;
    let etf: SectorEtf = ticker.parse()?;
    let weight: u8 = percent
        .trim()
        .parse()
        .map_err(|_| format!("weight for {etf} must be an integer from 0 to 100, got '{percent}'"))?;
    if weight > 100 {
        return Err(format!("weight for {etf} must be between 0 and 100, got {weight}"));
    }
    Ok((etf, weight))
}

/// Weights for every fund in the portfolio universe, zero where not given.
///
/// A fund given twice keeps its last weight. Each weight must sit on the
/// slider grid of [`WEIGHT_STEP`]; the sum is checked later by the workflow.
pub(crate) fn build_weights(pairs: &[(SectorEtf, u8)]) -> Result<PortfolioWeights, WeightError> {
    let weights = PortfolioWeights::new(SectorEtf::all().into_iter().map(|etf| {
        let weight = pairs
            .iter()
            .rev()
            .find(|(e, _)| *e == etf)
            .map_or(0, |(_, w)| *w);
        (etf.ticker(), weight)
    }));
    weights.validate_step(WEIGHT_STEP)?;
    Ok(weights)
}
