//! Return/position engine.
//!
//! position[t] = signal[t-1], position[0] = 0. This lag is the only place
//! where signals become exposure, so a signal can never earn the return of
//! its own bar.
//!
//! return[t]   = close[t] / close[t-1] - 1
//! trade[t]    = |position[t] - position[t-1]|
//! strategy[t] = return[t] * position[t] - fee * trade[t]
//!
//! Index 0 of the return, trade and strategy-return series is NaN.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::SignalSeries;
use chrono::NaiveDateTime;

/// Per-bar series derived from one strategy's signals.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReturns {
    pub name: String,
    pub timestamps: Vec<NaiveDateTime>,
    pub positions: Vec<f64>,
    pub returns: Vec<f64>,
    pub trades: Vec<f64>,
    pub strategy_returns: Vec<f64>,
}

impl StrategyReturns {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Index of the first bar holding a non-zero position.
    pub fn first_position(&self) -> Option<usize> {
        self.positions.iter().position(|p| *p != 0.0)
    }

    /// Index of the first bar with a defined strategy return.
    pub fn first_defined_return(&self) -> Option<usize> {
        self.strategy_returns.iter().position(|r| r.is_finite())
    }
}

pub fn derive_returns(
    name: &str,
    series: &PriceSeries,
    signals: &SignalSeries,
    fee: f64,
) -> Result<StrategyReturns, StratbenchError> {
    check_alignment(name, series, signals)?;

    let closes = series.closes();
    let n = closes.len();

    let mut positions = vec![0.0; n];
    for t in 1..n {
        positions[t] = signals.values[t - 1].as_f64();
    }

    let mut returns = vec![f64::NAN; n];
    let mut trades = vec![f64::NAN; n];
    let mut strategy_returns = vec![f64::NAN; n];
    for t in 1..n {
        returns[t] = closes[t] / closes[t - 1] - 1.0;
        trades[t] = (positions[t] - positions[t - 1]).abs();
        strategy_returns[t] = returns[t] * positions[t] - fee * trades[t];
    }

    Ok(StrategyReturns {
        name: name.to_string(),
        timestamps: series.timestamps(),
        positions,
        returns,
        trades,
        strategy_returns,
    })
}

fn check_alignment(
    name: &str,
    series: &PriceSeries,
    signals: &SignalSeries,
) -> Result<(), StratbenchError> {
    let misaligned = |reason: String| StratbenchError::Alignment {
        strategy: name.to_string(),
        reason,
    };

    if signals.values.len() != series.len() || signals.timestamps.len() != series.len() {
        return Err(misaligned(format!(
            "{} signals for {} bars",
            signals.values.len(),
            series.len()
        )));
    }
    if let Some((i, (bar, ts))) = series
        .bars()
        .iter()
        .zip(&signals.timestamps)
        .enumerate()
        .find(|(_, (bar, ts))| bar.timestamp != **ts)
    {
        return Err(misaligned(format!(
            "row {} is {} in the signals but {} in the prices",
            i, ts, bar.timestamp
        )));
    }
    Ok(())
}
