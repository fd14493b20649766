//! Return-based risk statistics on a value series.

use ndarray::ArrayView1;

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    (values.len() >= 2).then(|| ArrayView1::from(values).std(1.0))
}

/// Annualized volatility of daily `returns`: sample std scaled by the square
/// root of [`TRADING_DAYS_PER_YEAR`]. `None` with fewer than two returns.
pub fn annualized_volatility(returns: &[f64]) -> Option<f64> {
    sample_std(returns).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Largest peak-to-trough decline of `values`, in percent (zero or negative).
pub fn max_drawdown(values: &[f64]) -> Option<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            (v / peak - 1.0) * 100.0
        })
        .reduce(f64::min)
}

/// Total return from the first to the last value, in percent.
///
/// For a series indexed to 100 at its first row this is `last - 100`.
pub fn total_return(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    let last = *values.last()?;
    (first != 0.0).then(|| (last / first - 1.0) * 100.0)
}
