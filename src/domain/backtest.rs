//! Backtester: runs every strategy over one price series and compares them.
//!
//! Stages:
//! 1. per strategy, in parallel: features -> signals -> returns
//! 2. barrier: all strategy results collected
//! 3. equity compilation on the common anchor
//! 4. metrics

use crate::domain::config_validation::validate_run_config;
use crate::domain::equity::{compile, CompiledRun};
use crate::domain::error::StratbenchError;
use crate::domain::metrics::MetricsReport;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::returns::{derive_returns, StrategyReturns};
use crate::domain::strategy::Strategy;
use rayon::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Proportional cost per unit of position change.
    pub fee: f64,
    pub periods_per_year: f64,
    pub parallel: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            fee: 0.001,
            periods_per_year: 365.0,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub run: CompiledRun,
    pub report: MetricsReport,
}

pub struct Backtester {
    series: PriceSeries,
    strategies: Vec<Box<dyn Strategy>>,
    config: BacktestConfig,
    result: Option<BacktestResult>,
}

impl Backtester {
    pub fn new(
        series: PriceSeries,
        strategies: Vec<Box<dyn Strategy>>,
        config: BacktestConfig,
    ) -> Result<Self, StratbenchError> {
        validate_run_config(&config)?;

        let mut seen = HashSet::new();
        for strategy in &strategies {
            if !seen.insert(strategy.name().to_string()) {
                return Err(StratbenchError::DuplicateStrategy {
                    name: strategy.name().to_string(),
                });
            }
        }

        Ok(Self {
            series,
            strategies,
            config,
            result: None,
        })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy and compile the comparison. A second call recomputes
    /// from scratch and replaces the previous result.
    pub fn run(&mut self) -> Result<&BacktestResult, StratbenchError> {
        let fee = self.config.fee;
        let series = &self.series;
        let strategies = &mut self.strategies;

        tracing::info!(
            strategies = strategies.len(),
            bars = series.len(),
            parallel = self.config.parallel,
            "running strategies"
        );

        let results: Vec<StrategyReturns> = if self.config.parallel {
            strategies
                .par_iter_mut()
                .map(|strategy| evaluate(strategy.as_mut(), series, fee))
                .collect::<Result<_, _>>()?
        } else {
            strategies
                .iter_mut()
                .map(|strategy| evaluate(strategy.as_mut(), series, fee))
                .collect::<Result<_, _>>()?
        };

        let run = compile(results, self.config.initial_capital)?;
        let report = MetricsReport::compute(&run, self.config.periods_per_year);
        tracing::info!(
            anchor = %run.anchor,
            rows = report.timestamps.len(),
            "backtest complete"
        );

        Ok(self.result.insert(BacktestResult { run, report }))
    }

    pub fn result(&self) -> Result<&BacktestResult, StratbenchError> {
        self.result.as_ref().ok_or(StratbenchError::NotRun)
    }

    pub fn metrics(&self) -> Result<&MetricsReport, StratbenchError> {
        self.result().map(|r| &r.report)
    }

    pub fn equity_curves(&self) -> Result<&CompiledRun, StratbenchError> {
        self.result().map(|r| &r.run)
    }
}

fn evaluate(
    strategy: &mut dyn Strategy,
    series: &PriceSeries,
    fee: f64,
) -> Result<StrategyReturns, StratbenchError> {
    let features = strategy.generate_features(series)?;
    let signals = strategy.generate_signals(&features)?;
    let returns = derive_returns(strategy.name(), series, &signals, fee)?;
    tracing::debug!(
        strategy = strategy.name(),
        first_position = ?returns.first_position(),
        "strategy evaluated"
    );
    Ok(returns)
}
