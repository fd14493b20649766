//! Plain-text reports for the three dashboard views.

use chrono::{DateTime, NaiveDate, Utc};
use macrostress_data::{DateWindow, MacroSeries, PriceSeries};
use macrostress_metrics::{CurveShape, PortfolioStats, PortfolioWeights, SectorHeatmap, YieldCurve};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const WIDTH: usize = 80;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required field was not set on the builder.
    #[error("Missing report field: {0}")]
    MissingField(&'static str),
}

/// Format an optional number, `n/a` when undefined.
pub fn fmt_value(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

/// First, last and range of a dated numeric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Series label.
    pub name: String,
    /// Number of defined observations.
    pub observations: usize,
    /// Earliest observation.
    pub first: Option<(NaiveDate, f64)>,
    /// Latest observation.
    pub last: Option<(NaiveDate, f64)>,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
}

impl SeriesSummary {
    /// Summarize date-ordered points.
    pub fn from_points(name: impl Into<String>, points: &[(NaiveDate, f64)]) -> Self {
        Self {
            name: name.into(),
            observations: points.len(),
            first: points.first().copied(),
            last: points.last().copied(),
            min: points.iter().map(|(_, v)| *v).reduce(f64::min),
            max: points.iter().map(|(_, v)| *v).reduce(f64::max),
        }
    }

    /// Summarize a price series.
    pub fn from_prices(name: impl Into<String>, series: &PriceSeries) -> Self {
        let points: Vec<(NaiveDate, f64)> =
            series.points().iter().map(|p| (p.date, p.price)).collect();
        Self::from_points(name, &points)
    }

    /// Summarize the defined values of a macro series.
    pub fn from_macro(name: impl Into<String>, series: &MacroSeries) -> Self {
        Self::from_points(name, &series.defined())
    }

    fn ascii_row(&self) -> String {
        let first = self.first.map(|(_, v)| v);
        let last = self.last.map(|(_, v)| v);
        format!(
            "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10}\n",
            self.name,
            self.observations,
            fmt_value(first, 2),
            fmt_value(last, 2),
            fmt_value(self.min, 2),
            fmt_value(self.max, 2)
        )
    }

    fn markdown_row(&self) -> String {
        format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            self.name,
            self.observations,
            fmt_value(self.first.map(|(_, v)| v), 2),
            fmt_value(self.last.map(|(_, v)| v), 2),
            fmt_value(self.min, 2),
            fmt_value(self.max, 2)
        )
    }
}

/// Macro market overview for one scenario window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    /// Scenario label.
    pub scenario: String,
    /// Scenario window.
    pub window: DateWindow,
    /// What happened in the window.
    pub description: String,
    /// Investor takeaway.
    pub insight: String,
    /// Broad market closes.
    pub market: PriceSeries,
    /// Effective federal funds rate.
    pub fed_funds: MacroSeries,
    /// CPI year-over-year change, in percent.
    pub cpi_yoy: MacroSeries,
    /// Long minus short treasury yield.
    pub curve: YieldCurve,
}

impl MarketReport {
    /// Shape of the yield curve over the window.
    pub fn curve_shape(&self) -> Option<CurveShape> {
        self.curve.shape()
    }

    /// Summary rows in display order.
    pub fn summaries(&self) -> Vec<SeriesSummary> {
        let spread: Vec<(NaiveDate, f64)> = self
            .curve
            .rows()
            .iter()
            .filter_map(|r| r.spread.map(|s| (r.date, s)))
            .collect();
        vec![
            SeriesSummary::from_prices(format!("{} price", self.market.ticker()), &self.market),
            SeriesSummary::from_macro("Fed Funds Rate (%)", &self.fed_funds),
            SeriesSummary::from_macro("CPI YoY (%)", &self.cpi_yoy),
            SeriesSummary::from_points(
                format!("{} - {} spread", self.curve.long_id(), self.curve.short_id()),
                &spread,
            ),
        ]
    }

    fn curve_message(&self) -> &'static str {
        self.curve_shape()
            .map_or("No yield curve data for this window.", |s| s.message())
    }

    /// Generate an ASCII table representation.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nMacro Market Overview: {}\n", self.scenario));
        output.push_str(&format!("Period: {}\n", self.window));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!("{}\n", self.description));
        output.push_str(&format!("Insight: {}\n", self.insight));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>6} {:>10} {:>10} {:>10} {:>10}\n",
            "Series", "Obs", "First", "Last", "Min", "Max"
        ));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        for summary in self.summaries() {
            output.push_str(&summary.ascii_row());
        }
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(self.curve_message());
        output.push('\n');
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output
    }

    /// Generate a Markdown representation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Macro Market Overview: {}\n\n", self.scenario));
        output.push_str(&format!("**Period:** {}\n\n", self.window));
        output.push_str(&format!("{}\n\n", self.description));
        output.push_str(&format!("> {}\n\n", self.insight));
        output.push_str("| Series | Obs | First | Last | Min | Max |\n");
        output.push_str("|--------|-----|-------|------|-----|-----|\n");
        for summary in self.summaries() {
            output.push_str(&summary.markdown_row());
        }
        output.push_str(&format!("\n{}\n", self.curve_message()));

        output
    }
}

/// Simulated buy-and-hold portfolio over one scenario window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Scenario label.
    pub scenario: String,
    /// Scenario window.
    pub window: DateWindow,
    /// Validated weights.
    pub weights: PortfolioWeights,
    /// Portfolio value indexed to 100.
    pub series: PriceSeries,
    /// Return and risk statistics.
    pub stats: PortfolioStats,
}

impl PortfolioReport {
    /// Generate an ASCII table representation.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPortfolio Simulation: {}\n", self.scenario));
        output.push_str(&format!("Period: {}\n", self.window));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output.push_str("\nAllocation:\n");
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        for (ticker, weight) in self.weights.weights().iter().filter(|(_, w)| *w > 0) {
            output.push_str(&format!("  {:<10} {:>5}%\n", ticker, weight));
        }

        output.push_str("\nPerformance:\n");
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "  Total Return (%):         {}\n",
            fmt_value(self.stats.total_return, 1)
        ));
        output.push_str(&format!(
            "  Volatility (Ann.):        {}\n",
            fmt_value(self.stats.annualized_volatility, 1)
        ));
        output.push_str(&format!(
            "  Max Drawdown (%):         {}\n",
            fmt_value(self.stats.max_drawdown, 1)
        ));
        output.push_str(&format!("  Trading Days:             {}\n", self.series.len()));

        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');

        output
    }

    /// Generate a Markdown representation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Portfolio Simulation: {}\n\n", self.scenario));
        output.push_str(&format!("**Period:** {}\n\n", self.window));

        output.push_str("## Allocation\n\n");
        output.push_str("| Ticker | Weight |\n");
        output.push_str("|--------|--------|\n");
        for (ticker, weight) in self.weights.weights().iter().filter(|(_, w)| *w > 0) {
            output.push_str(&format!("| {} | {}% |\n", ticker, weight));
        }

        output.push_str("\n## Performance\n\n");
        output.push_str(&format!(
            "- **Total Return (%):** {}\n",
            fmt_value(self.stats.total_return, 1)
        ));
        output.push_str(&format!(
            "- **Volatility (Ann.):** {}\n",
            fmt_value(self.stats.annualized_volatility, 1)
        ));
        output.push_str(&format!(
            "- **Max Drawdown (%):** {}\n",
            fmt_value(self.stats.max_drawdown, 1)
        ));

        output
    }
}

/// Sector returns across every scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapReport {
    /// Table title.
    pub title: String,
    /// Scenario x sector matrix.
    pub heatmap: SectorHeatmap,
}

impl HeatmapReport {
    /// Wrap a heatmap under the default title.
    pub fn new(heatmap: SectorHeatmap) -> Self {
        Self {
            title: "Sector Performance Across Macro Shocks (%)".to_string(),
            heatmap,
        }
    }

    /// Generate an ASCII table representation, scenarios as columns.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();
        let rows = self.heatmap.rows();
        let width = 14 + rows.len() * 12;

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(width));
        output.push('\n');

        if self.heatmap.is_empty() {
            output.push_str("No scenarios.\n");
            return output;
        }

        output.push_str(&format!("{:<14}", "Sector"));
        for row in rows {
            output.push_str(&format!(" {:>11}", truncate(&row.label, 11)));
        }
        output.push('\n');
        output.push_str(&"-".repeat(width));
        output.push('\n');

        for (j, column) in self.heatmap.columns().iter().enumerate() {
            output.push_str(&format!("{:<14}", column));
            for row in rows {
                output.push_str(&format!(" {:>11}", fmt_value(row.values[j], 1)));
            }
            output.push('\n');
        }
        output.push_str(&"=".repeat(width));
        output.push('\n');

        output
    }

    /// Generate a Markdown representation, scenarios as columns.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let rows = self.heatmap.rows();

        output.push_str(&format!("# {}\n\n", self.title));
        if self.heatmap.is_empty() {
            output.push_str("No scenarios.\n");
            return output;
        }

        output.push_str("| Sector |");
        for row in rows {
            output.push_str(&format!(" {} |", row.label));
        }
        output.push_str("\n|--------|");
        for _ in rows {
            output.push_str("------|");
        }
        output.push('\n');

        for (j, column) in self.heatmap.columns().iter().enumerate() {
            output.push_str(&format!("| {} |", column));
            for row in rows {
                output.push_str(&format!(" {} |", fmt_value(row.values[j], 1)));
            }
            output.push('\n');
        }

        output
    }
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_string()
    } else {
        label.chars().take(width.saturating_sub(1)).chain(['~']).collect()
    }
}

/// JSON envelope for any report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Report contents (JSON format).
    pub contents: serde_json::Value,
}

impl Report {
    /// Create a new report.
    pub fn new(title: String, contents: serde_json::Value) -> Self {
        Self {
            title,
            timestamp: Utc::now(),
            contents,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    contents: Option<serde_json::Value>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the report contents from any serializable value.
    pub fn contents<T: Serialize>(mut self, contents: &T) -> Result<Self, ReportError> {
        self.contents = Some(serde_json::to_value(contents)?);
        Ok(self)
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        Ok(Report::new(
            self.title.ok_or(ReportError::MissingField("title"))?,
            self.contents.unwrap_or(serde_json::Value::Null),
        ))
    }
}
