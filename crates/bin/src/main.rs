//! MacroStress CLI binary.
//!
//! Runs the dashboard workflows against Yahoo Finance and FRED and prints
//! the resulting reports.

mod integration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use integration::providers::{macro_source, price_source};
use integration::render::{OutputFormat, export_to_path, render};
use integration::weights::{build_weights, parse_weight};
use macrostress::data::DateWindow;
use macrostress::metrics::SectorHeatmap;
use macrostress::output::HeatmapReport;
use macrostress::{
    EtfUniverse, Scenario, SectorEtf, StressWindow, market_overview, random_fact,
    scenario_sector_returns, simulate_portfolio,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "macrostress")]
#[command(about = "MacroStress: stress-test portfolios against historical macro shocks", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// FRED API key for the macro series
    #[arg(long, global = true, env = "FRED_API_KEY", hide_env_values = true)]
    fred_api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the stress scenarios and the ETF key
    Scenarios,

    /// Market overview: S&P 500, Fed Funds, CPI inflation and the yield curve
    Market {
        #[command(flatten)]
        window: WindowArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Also write the report to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Simulate a static ETF portfolio through a scenario
    Portfolio {
        #[command(flatten)]
        window: WindowArgs,

        /// Allocation as TICKER=PERCENT in steps of 5, repeatable
        #[arg(long = "weight", short, value_parser = parse_weight)]
        weights: Vec<(SectorEtf, u8)>,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Also write the report to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Sector returns across every scenario
    Heatmap {
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Also write the heatmap to a .csv or .json file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// Scenario number, key or label
    #[arg(long, short, default_value = "1")]
    scenario: Scenario,

    /// Custom window start (YYYY-MM-DD), replaces the scenario window
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// Custom window end (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
}

impl WindowArgs {
    fn resolve(&self) -> Result<StressWindow, Box<dyn std::error::Error>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                let window = DateWindow::new(start, end)?;
                Ok(StressWindow::custom(format!("Custom ({window})"), window))
            }
            _ => Ok(StressWindow::from(self.scenario)),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scenarios => list_scenarios(),
        Commands::Market {
            window,
            format,
            export,
        } => {
            let scenario = window.resolve()?;
            let prices = price_source()?;
            let macros = macro_source(cli.fred_api_key.as_deref())?;
            let report = market_overview(&prices, &macros, &scenario).await?;

            println!("{}", render(&report, format)?);
            if format == OutputFormat::Text {
                print_fun_fact();
            }
            if let Some(path) = export {
                export_to_path(&report, &path)?;
            }
        }
        Commands::Portfolio {
            window,
            weights,
            format,
            export,
        } => {
            let scenario = window.resolve()?;
            let weights = build_weights(&weights)?;
            weights.validate()?;
            let prices = price_source()?;
            let report = simulate_portfolio(&prices, &scenario, &weights).await?;
            if report.series.is_empty() {
                warn!(scenario = %scenario.label, "no portfolio values for this window");
            }

            println!("{}", render(&report, format)?);
            if let Some(path) = export {
                export_to_path(&report, &path)?;
            }
        }
        Commands::Heatmap { format, export } => {
            let report = build_heatmap().await?;

            println!("{}", render(&report, format)?);
            if let Some(path) = export {
                export_to_path(&report, &path)?;
            }
        }
    }

    Ok(())
}

/// Log to stderr so reports on stdout stay clean.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,macrostress=debug,macrostress_data=debug,macrostress_metrics=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_scenarios() {
    println!("\n{}", "=".repeat(80));
    println!("MACRO STRESS SCENARIOS");
    println!("{}", "=".repeat(80));

    for (i, scenario) in Scenario::all().into_iter().enumerate() {
        println!("\n{}. {} [{}]", i + 1, scenario.label(), scenario.key());
        println!("   Window:  {}", scenario.window());
        println!("   {}", scenario.description());
        println!("   Tip:     {}", scenario.insight());
    }

    println!("\n{}", "-".repeat(80));
    println!("ETF KEY");
    println!("{}", "-".repeat(80));
    for etf in SectorEtf::all() {
        println!("  {:<6} {}", etf.ticker(), etf.sector_name());
    }

    print_fun_fact();
}

fn print_fun_fact() {
    let mut rng = rand::thread_rng();
    println!("\nFun fact: {}", random_fact(&mut rng));
}

/// Fetch every scenario one after another behind a progress bar.
async fn build_heatmap() -> Result<HeatmapReport, Box<dyn std::error::Error>> {
    let prices = price_source()?;
    let universe = EtfUniverse::heatmap();
    let scenarios = StressWindow::catalog();

    let pb = ProgressBar::new(scenarios.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut rows = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        pb.set_message(scenario.label.clone());
        let returns = scenario_sector_returns(&prices, scenario, &universe).await?;
        info!(scenario = %scenario.label, sectors = returns.len(), "scenario loaded");
        rows.push((scenario.label.clone(), returns));
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(HeatmapReport::new(SectorHeatmap::build(rows)))
}
