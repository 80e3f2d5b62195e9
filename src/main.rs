//! NBA MVP Vote-Share Backtester
//!
//! Command-line entry point: loads the cleaned season table, runs the
//! walk-forward backtest and prints the precision summary.

use clap::{Parser, Subcommand};
use mvp_predictor::{
    backtest::Backtester,
    config::{Config, ModelKind},
    data::Dataset,
    model::{build_regressor, Regressor},
    report::{format_summary, save_predictions},
    utils::{current_year, parse_year, validate_year_range},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mvp-predictor")]
#[command(about = "Backtest NBA MVP vote-share predictions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the walk-forward backtest
    Backtest {
        /// First season of the range
        #[arg(short, long)]
        start: String,
        /// Last season of the range ('P' for the current year)
        #[arg(short, long)]
        end: String,
        /// Regressor to use (overrides config)
        #[arg(short, long, value_enum)]
        model: Option<ModelKind>,
        /// Ridge penalty (overrides config)
        #[arg(long)]
        alpha: Option<f64>,
        /// Write the combined prediction table to this CSV file
        #[arg(short, long)]
        output: Option<String>,
        /// Print the full report as JSON instead of the summary
        #[arg(long)]
        json: bool,
        /// Predicted players listed per season
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show the seasons available in the dataset
    Years,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Backtest {
            start,
            end,
            model,
            alpha,
            output,
            json,
            top,
        } => {
            if let Some(kind) = model {
                config.model.kind = kind;
            }
            if let Some(alpha) = alpha {
                config.model.ridge.alpha = alpha;
            }
            if output.is_some() {
                config.output.predictions_path = output;
            }
            if let Some(top) = top {
                config.output.top_n = top;
            }
            config.validate()?;
            run_backtest(&config, &start, &end, json)
        }
        Commands::Years => show_years(&config),
    }
}

fn load_dataset(config: &Config) -> anyhow::Result<Dataset> {
    let path = config.dataset.resolved_path();
    let dataset = Dataset::load(&path, &config.dataset)
        .map_err(|e| anyhow::anyhow!("failed to load dataset {}: {}", path.display(), e))?;
    Ok(dataset)
}

fn run_backtest(config: &Config, start: &str, end: &str, json: bool) -> anyhow::Result<()> {
    let dataset = load_dataset(config)?;
    let (first, last) = dataset
        .year_bounds()
        .ok_or_else(|| anyhow::anyhow!("dataset is empty"))?;

    let this_year = current_year();
    let range = validate_year_range(
        parse_year(start, this_year)?,
        parse_year(end, this_year)?,
        first,
        last,
        config.backtest.warmup_years,
    )?;

    let mut regressor = build_regressor(&config.model);
    tracing::info!(
        "Backtesting {} on {}-{} ({} player-seasons)",
        regressor.name(),
        range.start,
        range.end,
        dataset.len()
    );

    let backtester = Backtester::new(&dataset, config.backtest.clone());
    let report = backtester.run(&range.years(), regressor.as_mut())?;

    if let Some(path) = &config.output.predictions_path {
        save_predictions(path, &report.predictions)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_summary(&report, config.output.top_n));
    }
    Ok(())
}

fn show_years(config: &Config) -> anyhow::Result<()> {
    let dataset = load_dataset(config)?;
    match dataset.year_bounds() {
        Some((first, last)) => {
            println!("Available seasons: {} to {} ({} seasons)", first, last, dataset.years().len());
            println!(
                "Backtesting needs an end year at least {} years after the start year",
                config.backtest.warmup_years
            );
        }
        None => println!("Dataset is empty"),
    }
    Ok(())
}
