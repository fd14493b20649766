//! Rendering reports to the terminal and writing exports.

use clap::ValueEnum;
use macrostress::output::{
    ExportError, ExportFormat, Exporter, HeatmapReport, MarketReport, PortfolioReport,
    ReportBuilder, ReportError,
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// How a report is printed to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Plain-text tables
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// JSON envelope with title and timestamp
    Json,
}

/// A report that renders as a text table and as Markdown.
pub(crate) trait Render: Serialize {
    fn title(&self) -> String;
    fn ascii(&self) -> String;
    fn markdown(&self) -> String;
}

impl Render for MarketReport {
    fn title(&self) -> String {
        format!("Market Overview: {}", self.scenario)
    }

    fn ascii(&self) -> String {
        self.to_ascii_table()
    }

    fn markdown(&self) -> String {
        self.to_markdown()
    }
}

impl Render for PortfolioReport {
    fn title(&self) -> String {
        format!("Portfolio Simulation: {}", self.scenario)
    }

    fn ascii(&self) -> String {
        self.to_ascii_table()
    }

    fn markdown(&self) -> String {
        self.to_markdown()
    }
}

impl Render for HeatmapReport {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn ascii(&self) -> String {
        self.to_ascii_table()
    }

    fn markdown(&self) -> String {
        self.to_markdown()
    }
}

/// Render `report` in the requested format.
pub(crate) fn render<R: Render>(report: &R, format: OutputFormat) -> Result<String, ReportError> {
    match format {
        OutputFormat::Text => Ok(report.ascii()),
        OutputFormat::Markdown => Ok(report.markdown()),
        OutputFormat::Json => ReportBuilder::new()
            .title(report.title())
            .contents(report)?
            .build()?
            .to_json(),
    }
}

/// Write `value` to `path`, picking CSV or JSON from the file extension.
pub(crate) fn export_to_path<E: Exporter>(value: &E, path: &Path) -> Result<(), ExportError> {
    let format = ExportFormat::from_path(path)?;
    value.export_to_file(path, format)?;
    info!(path = %path.display(), ?format, "exported");
    Ok(())
}
