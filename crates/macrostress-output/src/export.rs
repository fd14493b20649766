//! Export functionality for MacroStress tables.
//!
//! CSV and JSON export of price series, macro series, the yield curve,
//! the sector heatmap and complete reports.

use crate::report::{HeatmapReport, MarketReport, PortfolioReport};
use chrono::NaiveDate;
use macrostress_data::{MacroSeries, MultiSeriesLong, PriceSeries};
use macrostress_metrics::{SectorHeatmap, YieldCurve};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writer produced bytes that are not UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file extension. JSON files are pretty-printed.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::PrettyJson),
            Some(other) => Err(ExportError::InvalidFormat(format!(
                "unsupported extension .{other} (expected .csv or .json)"
            ))),
            None => Err(ExportError::InvalidFormat(format!(
                "{} has no extension (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

/// One `(date, ticker, price)` record.
#[derive(Debug, Serialize)]
struct PriceRecord<'a> {
    date: NaiveDate,
    ticker: &'a str,
    price: f64,
}

/// One `(date, series_id, value)` record; missing values stay empty.
#[derive(Debug, Serialize)]
struct MacroRecord<'a> {
    date: NaiveDate,
    series_id: &'a str,
    value: Option<f64>,
}

impl Exporter for PriceSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for point in self.points() {
                    wtr.serialize(PriceRecord {
                        date: point.date,
                        ticker: self.ticker(),
                        price: point.price,
                    })?;
                }
                into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for MultiSeriesLong {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in self.rows() {
                    wtr.serialize(row)?;
                }
                into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for MacroSeries {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for o in self.observations() {
                    wtr.serialize(MacroRecord {
                        date: o.date,
                        series_id: self.id(),
                        value: o.value,
                    })?;
                }
                into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for YieldCurve {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in self.rows() {
                    wtr.serialize(row)?;
                }
                into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for SectorHeatmap {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                let mut header = vec!["scenario".to_string()];
                header.extend(self.columns().iter().cloned());
                wtr.write_record(&header)?;
                for row in self.rows() {
                    let mut record = vec![row.label.clone()];
                    record.extend(
                        row.values
                            .iter()
                            .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
                    );
                    wtr.write_record(&record)?;
                }
                into_string(wtr)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for HeatmapReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.heatmap.export_to_string(format),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for PortfolioReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Header information as comments
                output.push_str(&format!("# Scenario: {}\n", self.scenario));
                output.push_str(&format!("# Period: {}\n", self.window));
                let allocation: Vec<String> = self
                    .weights
                    .weights()
                    .iter()
                    .filter(|(_, w)| *w > 0)
                    .map(|(t, w)| format!("{t}={w}"))
                    .collect();
                output.push_str(&format!("# Weights: {}\n", allocation.join(" ")));

                output.push_str(&self.series.export_to_string(format)?);
                Ok(output)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for MarketReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                output.push_str(&format!("# Scenario: {}\n", self.scenario));
                output.push_str(&format!("# Period: {}\n", self.window));
                output.push_str(&self.market.export_to_string(format)?);
                output.push_str(&self.fed_funds.export_to_string(format)?);
                output.push_str(&self.cpi_yoy.export_to_string(format)?);
                output.push_str(&self.curve.export_to_string(format)?);
                Ok(output)
            }
            _ => to_json(self, format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrostress_data::{DateWindow, LongRow, MacroObservation, PricePoint};
    use macrostress_metrics::{PortfolioStats, PortfolioWeights, yield_spread};
    use std::collections::BTreeMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn portfolio() -> PriceSeries {
        PriceSeries::new(
            "Portfolio",
            vec![PricePoint::new(date(2), 100.0), PricePoint::new(date(3), 101.5)],
        )
    }

    #[test]
    fn test_price_series_export_csv() {
        let csv = portfolio().export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,ticker,price"));
        assert_eq!(lines.next(), Some("2024-01-02,Portfolio,100.0"));
        assert_eq!(lines.next(), Some("2024-01-03,Portfolio,101.5"));
    }

    #[test]
    fn test_price_series_export_json() {
        let json = portfolio().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"Portfolio\""));
        assert!(json.contains("101.5"));
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_price_series_export_pretty_json() {
        let json = portfolio()
            .export_to_string(ExportFormat::PrettyJson)
            .unwrap();
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }

    #[test]
    fn test_long_table_export_csv() {
        let long = MultiSeriesLong::new(vec![
            LongRow::new(date(2), "XLK", 170.0),
            LongRow::new(date(2), "XLF", 34.0),
        ]);
        let csv = long.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("date,ticker,price\n"));
        assert!(csv.contains("2024-01-02,XLF,34.0"));
    }

    #[test]
    fn test_macro_series_missing_value_is_empty_cell() {
        let series = MacroSeries::new(
            "DTB3",
            vec![
                MacroObservation::new(date(2), Some(5.2)),
                MacroObservation::new(date(3), None),
            ],
        );
        let csv = series.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("2024-01-02,DTB3,5.2"));
        assert!(csv.contains("2024-01-03,DTB3,\n"));
    }

    #[test]
    fn test_yield_curve_export_csv() {
        let gs10 = MacroSeries::new("GS10", vec![MacroObservation::new(date(2), Some(4.0))]);
        let dtb3 = MacroSeries::new("DTB3", vec![MacroObservation::new(date(2), Some(5.0))]);
        let csv = yield_spread(&gs10, &dtb3)
            .unwrap()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("date,long,short,spread\n"));
        assert!(csv.contains("2024-01-02,4.0,5.0,-1.0"));
    }

    #[test]
    fn test_heatmap_export_csv() {
        let heatmap = SectorHeatmap::build(vec![
            (
                "A".to_string(),
                BTreeMap::from([("Energy".to_string(), 10.0), ("Healthcare".to_string(), 2.0)]),
            ),
            ("B".to_string(), BTreeMap::from([("Energy".to_string(), 20.0)])),
        ]);

        let csv = heatmap.export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "scenario,Energy,Healthcare");
        assert_eq!(lines[1], "A,10,2");
        assert_eq!(lines[2], "B,20,");
        assert_eq!(lines[3], "Average,15,2");
    }

    #[test]
    fn test_portfolio_report_export_csv() {
        let report = PortfolioReport {
            scenario: "Test".to_string(),
            window: DateWindow::new(date(1), date(31)).unwrap(),
            weights: PortfolioWeights::new([("SPY", 50), ("XLK", 50), ("XLF", 0)]),
            series: portfolio(),
            stats: PortfolioStats::from_series(&portfolio()),
        };

        let csv = report.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("# Scenario: Test"));
        assert!(csv.contains("# Weights: SPY=50 XLK=50\n"));
        assert!(csv.contains("2024-01-03,Portfolio,101.5"));

        let json = report.export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"total_return\""));
    }

    #[test]
    fn test_export_to_file() {
        use std::io::Read;

        let temp_dir = std::env::temp_dir();
        let csv_path = temp_dir.join("macrostress_test_export.csv");
        let json_path = temp_dir.join("macrostress_test_export.json");

        // Test CSV export
        portfolio()
            .export_to_file(&csv_path, ExportFormat::Csv)
            .unwrap();
        let mut csv_content = String::new();
        File::open(&csv_path)
            .unwrap()
            .read_to_string(&mut csv_content)
            .unwrap();
        assert!(csv_content.contains("Portfolio"));

        // Test JSON export
        portfolio()
            .export_to_file(&json_path, ExportFormat::Json)
            .unwrap();
        let mut json_content = String::new();
        File::open(&json_path)
            .unwrap()
            .read_to_string(&mut json_content)
            .unwrap();
        assert!(json_content.contains("\"Portfolio\""));

        // Clean up
        std::fs::remove_file(csv_path).ok();
        std::fs::remove_file(json_path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_export_format_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/portfolio.CSV")).unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("heatmap.json")).unwrap(),
            ExportFormat::PrettyJson
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("heatmap.xlsx")),
            Err(ExportError::InvalidFormat(_))
        ));
        assert!(matches!(
            ExportFormat::from_path(Path::new("heatmap")),
            Err(ExportError::InvalidFormat(_))
        ));
    }
}
