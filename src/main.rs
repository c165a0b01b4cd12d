use analytics::{
    AnalyticsEngine, BenchmarkReport, PerformanceReport, ewma_volatility, garman_klass_volatility,
    parkinson_volatility, rolling_std,
};
use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::settings::Config;
use configuration::{AnalyticsOverrides, init_tracing, load_config_from};
use core_types::{PriceSeries, ReturnSeries, SelectionMethod, TimeSeries};
use datasource::{PriceColumn, load_bars, load_prices};
use optimizer::{AssetUniverse, EfficientFrontier, MarkowitzOptimizer};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// The main entry point for the TuringQuant command-line tool.
fn main() -> ExitCode {
    // Load TURINGQUANT__* variables from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match prepare_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Report(args) => handle_report(args, &config),
        Commands::Benchmark(args) => handle_benchmark(args, &config),
        Commands::Volatility(args) => handle_volatility(args, &config),
        Commands::Optimize(args) => handle_optimize(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn prepare_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_config_from(cli.config.as_deref())?;
    cli.overrides.apply(&mut config.analytics);
    config.analytics.validate()?;
    Ok(config)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance, risk and portfolio analytics for price series.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: AnalyticsOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise the returns of one price file.
    Report(ReportArgs),
    /// Compare a price file with a benchmark.
    Benchmark(BenchmarkArgs),
    /// Print a time-varying volatility estimate.
    Volatility(VolatilityArgs),
    /// Search for the best allocation across several assets.
    Optimize(OptimizeArgs),
}

#[derive(Parser)]
struct RangeArgs {
    /// Price column to use (open, high, low, close, adjusted_close).
    #[arg(long, default_value = "close")]
    column: PriceColumn,

    /// First date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct ReportArgs {
    /// CSV file with a date column and price columns.
    #[arg(long)]
    prices: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BenchmarkArgs {
    #[arg(long)]
    prices: PathBuf,

    /// CSV file of the benchmark, e.g. an index.
    #[arg(long)]
    benchmark: PathBuf,

    #[command(flatten)]
    range: RangeArgs,

    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Estimator {
    /// Rolling sample standard deviation of returns.
    Rolling,
    /// Exponentially weighted standard deviation of returns.
    Ewma,
    /// Garman-Klass estimator on OHLC bars.
    GarmanKlass,
    /// Parkinson high-low estimator on OHLC bars.
    Parkinson,
}

#[derive(Parser)]
struct VolatilityArgs {
    #[arg(long)]
    prices: PathBuf,

    #[arg(long, value_enum, default_value = "rolling")]
    estimator: Estimator,

    /// Window (or EWMA span); defaults to the configured value.
    #[arg(long)]
    window: Option<usize>,

    /// Number of most recent points to print.
    #[arg(long, default_value_t = 10)]
    tail: usize,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Parser)]
struct OptimizeArgs {
    /// One CSV file per asset; the file name is the asset name.
    #[arg(long, num_args = 1.., required = true)]
    prices: Vec<PathBuf>,

    /// Number of random portfolios to draw.
    #[arg(long)]
    portfolios: Option<usize>,

    /// How the best portfolio is chosen (sharpe-ratio, volatility, return).
    #[arg(long)]
    method: Option<SelectionMethod>,

    /// Seed for reproducible weights.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    range: RangeArgs,

    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs, config: &Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::new(config.analytics.clone());
    let returns = load_returns(&engine, &args.prices, &args.range)?;
    let report = engine
        .calculate(&returns)
        .with_context(|| format!("calculating the report for {}", args.prices.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report_table(&report));
    }
    Ok(())
}

fn handle_benchmark(args: BenchmarkArgs, config: &Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::new(config.analytics.clone());
    let returns = load_returns(&engine, &args.prices, &args.range)?;
    let benchmark = load_returns(&engine, &args.benchmark, &args.range)?;
    let report = engine.compare(&returns, &benchmark)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", benchmark_table(&report));
    }
    Ok(())
}

fn handle_volatility(args: VolatilityArgs, config: &Config) -> anyhow::Result<()> {
    let settings = &config.analytics;
    let engine = AnalyticsEngine::new(settings.clone());

    let series = match args.estimator {
        Estimator::Rolling => {
            let returns = load_returns(&engine, &args.prices, &args.range)?;
            rolling_std(&returns, args.window.unwrap_or(settings.rolling_window))?
        }
        Estimator::Ewma => {
            let returns = load_returns(&engine, &args.prices, &args.range)?;
            ewma_volatility(&returns, args.window.unwrap_or(settings.ewma_span))?
        }
        Estimator::GarmanKlass => {
            let bars = load_bars(&args.prices)?;
            let window = args.window.unwrap_or(settings.rolling_window);
            garman_klass_volatility(&bars, window, settings.annualization_factor)?
        }
        Estimator::Parkinson => {
            let bars = load_bars(&args.prices)?;
            let window = args.window.unwrap_or(settings.rolling_window);
            parkinson_volatility(&bars, window, settings.annualization_factor)?
        }
    };
    // Return-based estimators are already restricted through their prices.
    let (start, end) = date_bounds(&args.range);
    let series = series.between(start, end);

    println!("{}", series_table("Volatility", &series.tail(args.tail)));
    Ok(())
}

fn handle_optimize(args: OptimizeArgs, config: &Config) -> anyhow::Result<()> {
    let mut settings = config.optimizer.clone();
    if let Some(portfolios) = args.portfolios {
        settings.num_portfolios = portfolios;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    let method = args.method.unwrap_or(settings.selection);

    let mut assets = Vec::with_capacity(args.prices.len());
    for path in &args.prices {
        let prices = load_range(path, &args.range)?;
        // Portfolio returns combine simple returns regardless of the configured kind.
        assets.push((asset_name(path), analytics::to_returns(&prices)?));
    }

    let universe = AssetUniverse::new(assets)?;
    let frontier = MarkowitzOptimizer::new(
        settings,
        config.analytics.annualization_factor,
        config.analytics.risk_free_rate,
    )
    .run(&universe)?;

    if args.json {
        let best = frontier.best(method);
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "method": method.to_string(),
                "assets": frontier.assets(),
                "best": best,
            }))?
        );
    } else {
        println!("{}", allocation_table(&frontier, method));
    }
    Ok(())
}

// ==============================================================================
// Loading Helpers
// ==============================================================================

fn load_range(path: &Path, range: &RangeArgs) -> anyhow::Result<PriceSeries> {
    let prices = load_prices(path, range.column).with_context(|| format!("loading {}", path.display()))?;
    let (start, end) = date_bounds(range);
    Ok(prices.between(start, end))
}

fn load_returns(engine: &AnalyticsEngine, path: &Path, range: &RangeArgs) -> anyhow::Result<ReturnSeries> {
    let prices = load_range(path, range)?;
    engine
        .returns(&prices)
        .with_context(|| format!("computing returns for {}", path.display()))
}

/// Inclusive bounds covering whole days; open ends are unbounded.
fn date_bounds(range: &RangeArgs) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = range
        .from
        .map_or(DateTime::<Utc>::MIN_UTC, |d| d.and_time(NaiveTime::MIN).and_utc());
    let end = range.to.map_or(DateTime::<Utc>::MAX_UTC, |d| {
        d.and_time(NaiveTime::MIN)
            .and_utc()
            .checked_add_signed(Duration::days(1))
            .map_or(DateTime::<Utc>::MAX_UTC, |next| next - Duration::nanoseconds(1))
    });
    (start, end)
}

fn asset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn new_table(header: [&str; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn opt(value: Option<f64>, format: fn(f64) -> String) -> String {
    value.map_or_else(|| "n/a".to_string(), format)
}

fn ratio(value: f64) -> String {
    format!("{value:.3}")
}

fn report_table(report: &PerformanceReport) -> Table {
    let mut table = new_table(["Metric", "Value"]);
    table
        .add_row(vec!["Periods".to_string(), report.periods.to_string()])
        .add_row(vec!["Start".to_string(), report.start.format("%Y-%m-%d").to_string()])
        .add_row(vec!["End".to_string(), report.end.format("%Y-%m-%d").to_string()])
        .add_row(vec!["Cumulative return".to_string(), pct(report.cumulative_return)])
        .add_row(vec!["CAGR".to_string(), opt(report.cagr, pct)])
        .add_row(vec!["Annualized return".to_string(), pct(report.annualized_return)])
        .add_row(vec!["Annualized volatility".to_string(), opt(report.annualized_volatility, pct)])
        .add_row(vec!["Sharpe ratio".to_string(), opt(report.sharpe_ratio, ratio)])
        .add_row(vec!["Max drawdown".to_string(), pct(report.max_drawdown)])
        .add_row(vec!["MAR ratio".to_string(), opt(report.mar_ratio, ratio)])
        .add_row(vec![
            format!(
                "VaR ({:.0}%, {} period{})",
                report.var_confidence * 100.0,
                report.var_horizon,
                if report.var_horizon == 1 { "" } else { "s" }
            ),
            opt(report.value_at_risk, pct),
        ])
        .add_row(vec!["Best period".to_string(), pct(report.best_period)])
        .add_row(vec!["Worst period".to_string(), pct(report.worst_period)])
        .add_row(vec!["Positive periods".to_string(), pct(report.positive_period_ratio)]);
    table
}

fn benchmark_table(report: &BenchmarkReport) -> Table {
    let mut table = new_table(["Metric", "Value"]);
    table
        .add_row(vec!["Aligned periods".to_string(), report.aligned_periods.to_string()])
        .add_row(vec!["Asset return".to_string(), pct(report.asset_cumulative_return)])
        .add_row(vec!["Benchmark return".to_string(), pct(report.benchmark_cumulative_return)])
        .add_row(vec!["Excess return".to_string(), pct(report.excess_return)])
        .add_row(vec!["Beta".to_string(), opt(report.beta, ratio)])
        .add_row(vec!["CAPM expected return".to_string(), opt(report.capm_expected_return, pct)])
        .add_row(vec!["Tracking error".to_string(), opt(report.tracking_error, pct)]);
    table
}

fn series_table(label: &str, series: &TimeSeries) -> Table {
    let mut table = new_table(["Timestamp", label]);
    for (timestamp, value) in series.points() {
        table.add_row(vec![timestamp.format("%Y-%m-%d %H:%M").to_string(), format!("{value:.6}")]);
    }
    table
}

fn allocation_table(frontier: &EfficientFrontier, method: SelectionMethod) -> String {
    let Some(best) = frontier.best(method) else {
        return format!("No portfolio qualifies under {method}.");
    };

    let mut weights = new_table(["Asset", "Weight"]);
    for (asset, weight) in frontier.assets().iter().zip(&best.weights) {
        weights.add_row(vec![asset.clone(), pct(*weight)]);
    }

    let mut summary = new_table(["Metric", "Value"]);
    summary
        .add_row(vec!["Selection".to_string(), method.to_string()])
        .add_row(vec!["Portfolios drawn".to_string(), frontier.portfolios().len().to_string()])
        .add_row(vec!["Expected return".to_string(), pct(best.expected_return)])
        .add_row(vec!["Volatility".to_string(), pct(best.volatility)])
        .add_row(vec!["Sharpe ratio".to_string(), opt(best.sharpe_ratio, ratio)]);

    format!("{weights}\n{summary}")
}
