//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::csv_adapter::{CsvAdapter, Resample};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, Backtester};
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_strategy_config,
};
use crate::domain::error::StratbenchError;
use crate::domain::strategy::forest::ForestParams;
use crate::domain::strategy::{
    BuyAndHold, Classifier, MeanReversion, Momentum, RsiReversion, Strategy, TrendFollowing,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Compare trading strategies on one price series")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every enabled strategy and report the comparison
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory for metrics.csv and equity.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without loading data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&cli.log_level);

    let outcome = match cli.command {
        Command::Backtest { config, output } => run_backtest(&config, output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StratbenchError> {
    FileConfigAdapter::from_file(path)
}

fn run_backtest(config_path: &Path, output: Option<&Path>) -> Result<(), StratbenchError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_data_config(&adapter)?;

    let dir = adapter.get_string("data", "dir").unwrap_or_default();
    let resample = Resample::parse(&adapter.get_string("data", "resample").unwrap_or_default())?;
    let data_port = CsvAdapter::new(PathBuf::from(dir.trim())).with_resample(resample);

    let result = run_backtest_pipeline(&data_port, &adapter)?;
    print_summary(&result);

    if let Some(dir) = output {
        CsvReportAdapter::new().write(&result, dir)?;
        eprintln!("\nReport written to {}", dir.display());
    }
    Ok(())
}

/// Validate the configuration, load the series and run the comparison.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &dyn ConfigPort,
) -> Result<BacktestResult, StratbenchError> {
    validate_backtest_config(config)?;
    let enabled = validate_strategy_config(config)?;
    let bt_config = build_backtest_config(config)?;
    let strategies = build_strategies(config, &enabled)?;

    let ticker = config
        .get_string("data", "ticker")
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: "data".into(),
            key: "ticker".into(),
        })?;
    let series = data_port.load_series(ticker.trim())?;
    eprintln!(
        "Loaded {} bars for {} ({} to {})",
        series.len(),
        ticker.trim(),
        series.first_timestamp(),
        series.last_timestamp()
    );

    let mut backtester = Backtester::new(series, strategies, bt_config)?;
    eprintln!(
        "Running {} strategies: {}",
        enabled.len(),
        backtester.strategy_names().join(", ")
    );
    backtester.run()?;
    backtester.result().cloned()
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, StratbenchError> {
    validate_backtest_config(adapter)?;
    let defaults = BacktestConfig::default();
    Ok(BacktestConfig {
        initial_capital: adapter
            .get_number("backtest", "initial_capital")?
            .unwrap_or(defaults.initial_capital),
        fee: adapter.get_number("backtest", "fee")?.unwrap_or(defaults.fee),
        periods_per_year: adapter
            .get_number("backtest", "periods_per_year")?
            .unwrap_or(defaults.periods_per_year),
        parallel: adapter
            .get_flag("backtest", "parallel")?
            .unwrap_or(defaults.parallel),
    })
}

/// Build the enabled strategies in order, reading each one's parameters from
/// the section of the same name.
pub fn build_strategies(
    adapter: &dyn ConfigPort,
    enabled: &[String],
) -> Result<Vec<Box<dyn Strategy>>, StratbenchError> {
    enabled
        .iter()
        .map(|name| build_strategy(adapter, name))
        .collect()
}

fn build_strategy(
    adapter: &dyn ConfigPort,
    name: &str,
) -> Result<Box<dyn Strategy>, StratbenchError> {
    let strategy: Box<dyn Strategy> = match name {
        "trend_following" => {
            let d = TrendFollowing::default();
            Box::new(TrendFollowing::new(
                window(adapter, name, "short_window", d.short_window)?,
                window(adapter, name, "long_window", d.long_window)?,
            ))
        }
        "mean_reversion" => {
            let d = MeanReversion::default();
            Box::new(MeanReversion::new(
                window(adapter, name, "short_window", d.short_window)?,
                window(adapter, name, "long_window", d.long_window)?,
            ))
        }
        "buy_and_hold" => Box::new(BuyAndHold),
        "momentum" => {
            let d = Momentum::default();
            Box::new(Momentum::new(
                adapter.get_count(name, "window")?.unwrap_or(d.window),
                adapter.get_count(name, "poly")?.unwrap_or(d.poly),
                adapter.get_number(name, "threshold")?.unwrap_or(d.threshold),
            )?)
        }
        "rsi_reversion" => {
            let d = RsiReversion::default();
            Box::new(RsiReversion::new(
                window(adapter, name, "rsi_window", d.rsi_window)?,
                window(adapter, name, "ma_window", d.ma_window)?,
                window(adapter, name, "vol_window", d.vol_window)?,
            ))
        }
        "classifier" => {
            let d = Classifier::default();
            let forest = d.forest_params();
            let params = ForestParams {
                n_trees: tree_setting(adapter, name, "n_trees", forest.n_trees)?,
                max_depth: tree_setting(adapter, name, "max_depth", forest.max_depth)?,
                min_samples_leaf: window(
                    adapter,
                    name,
                    "min_samples_leaf",
                    forest.min_samples_leaf,
                )?,
                seed: match adapter.get_count(name, "seed")? {
                    Some(seed) => seed as u64,
                    None => forest.seed,
                },
            };
            Box::new(
                Classifier::new(
                    adapter.get_count(name, "lookahead")?.unwrap_or(d.lookahead()),
                    adapter.get_number(name, "train_ratio")?.unwrap_or(d.train_ratio()),
                )?
                .with_forest_params(params),
            )
        }
        other => {
            return Err(StratbenchError::config_invalid(
                "strategies",
                "enabled",
                format!("unknown strategy '{}'", other),
            ))
        }
    };
    tracing::debug!(strategy = strategy.name(), config = %strategy.describe(), "strategy built");
    Ok(strategy)
}

fn window(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, StratbenchError> {
    match adapter.get_count(section, key)? {
        Some(0) => Err(StratbenchError::config_invalid(
            section,
            key,
            "window must be at least 1",
        )),
        Some(w) => Ok(w),
        None => Ok(default),
    }
}

/// A forest size setting: positive and at most `u16::MAX`.
fn tree_setting(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: u16,
) -> Result<u16, StratbenchError> {
    let value = window(adapter, section, key, usize::from(default))?;
    u16::try_from(value).map_err(|_| {
        StratbenchError::config_invalid(section, key, format!("{} exceeds {}", value, u16::MAX))
    })
}

fn print_summary(result: &BacktestResult) {
    let run = &result.run;
    eprintln!(
        "\n=== Comparison from {} ({} rows) ===",
        run.anchor,
        result.report.timestamps.len()
    );
    if !run.excluded.is_empty() {
        eprintln!("Excluded (never active): {}", run.excluded.join(", "));
    }
    eprintln!(
        "{:<16} {:>10} {:>12} {:>10} {:>10} {:>8}",
        "Strategy", "Total", "Annualized", "Volatility", "Drawdown", "Sharpe"
    );
    for (name, m) in result.report.iter() {
        eprintln!(
            "{:<16} {:>9.2}% {:>11.2}% {:>9.2}% {:>9.2}% {:>8.2}",
            name,
            m.total_return * 100.0,
            m.annualized_return * 100.0,
            m.annualized_volatility * 100.0,
            m.max_drawdown * 100.0,
            m.sharpe_ratio
        );
        if m.is_degenerate() {
            let flags: Vec<String> = m.flags.iter().map(|f| f.to_string()).collect();
            eprintln!("  degenerate: {}", flags.join(", "));
        }
    }
}

fn run_validate(config_path: &Path) -> Result<(), StratbenchError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_backtest_config(&adapter)?;
    validate_data_config(&adapter)?;
    let enabled = validate_strategy_config(&adapter)?;
    let strategies = build_strategies(&adapter, &enabled)?;

    eprintln!("Config is valid");
    for strategy in &strategies {
        eprintln!("  {}", strategy.describe());
    }
    Ok(())
}
