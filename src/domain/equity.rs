//! Equity compiler.
//!
//! Builds one compounded equity curve per strategy, aligns all curves on the
//! common anchor (the latest activation point) and re-normalizes them so
//! every curve starts at exactly `initial_capital` on the anchor bar.

use crate::domain::error::StratbenchError;
use crate::domain::returns::StrategyReturns;
use chrono::NaiveDateTime;

/// A strategy's anchor-aligned equity and the per-bar series behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub name: String,
    /// Index of the strategy's own activation point in the source series.
    pub activation: usize,
    pub equity: Vec<f64>,
    pub strategy_returns: Vec<f64>,
    pub positions: Vec<f64>,
}

/// Output of [`compile`]: every usable strategy's curve over the shared
/// timestamps starting at the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRun {
    pub anchor: NaiveDateTime,
    /// Index of the anchor bar in the source series.
    pub anchor_index: usize,
    pub timestamps: Vec<NaiveDateTime>,
    pub curves: Vec<EquityCurve>,
    /// Names of strategies dropped for having no activation point.
    pub excluded: Vec<String>,
}

impl CompiledRun {
    pub fn curve(&self, name: &str) -> Option<&EquityCurve> {
        self.curves.iter().find(|c| c.name == name)
    }
}

/// Compound strategy returns into an equity curve seeded at `seed` with
/// `initial_capital`. Entries before the seed are NaN; an undefined return
/// after it yields NaN equity for that bar without breaking the chain.
pub fn compound(strategy_returns: &[f64], seed: usize, initial_capital: f64) -> Vec<f64> {
    let mut equity = vec![f64::NAN; strategy_returns.len()];
    if seed >= strategy_returns.len() {
        return equity;
    }

    let mut level = initial_capital;
    equity[seed] = level;
    for t in (seed + 1)..strategy_returns.len() {
        let r = strategy_returns[t];
        if r.is_finite() {
            level *= 1.0 + r;
            equity[t] = level;
        }
    }
    equity
}

/// First bar holding a position, or for a strategy that never trades the
/// first bar with defined equity.
pub fn activation_point(returns: &StrategyReturns) -> Option<usize> {
    returns
        .first_position()
        .or_else(|| returns.first_defined_return())
}

pub fn compile(
    results: Vec<StrategyReturns>,
    initial_capital: f64,
) -> Result<CompiledRun, StratbenchError> {
    let mut usable = Vec::with_capacity(results.len());
    let mut excluded = Vec::new();
    for result in results {
        match activation_point(&result) {
            Some(activation) => usable.push((activation, result)),
            None => {
                let err = StratbenchError::UnusableStrategy {
                    name: result.name.clone(),
                };
                tracing::warn!(strategy = %result.name, "{}", err);
                excluded.push(result.name);
            }
        }
    }

    let anchor_index = usable
        .iter()
        .map(|(activation, _)| *activation)
        .max()
        .ok_or(StratbenchError::NoUsableStrategies)?;

    // Every result was checked against the same price series.
    let timestamps = usable[0].1.timestamps[anchor_index..].to_vec();
    let anchor = timestamps[0];

    let curves = usable
        .into_iter()
        .map(|(activation, result)| {
            let raw = compound(&result.strategy_returns, activation, initial_capital);
            let equity = renormalize(
                &raw[anchor_index..],
                &result.strategy_returns[anchor_index..],
                initial_capital,
            );
            tracing::debug!(
                strategy = %result.name,
                activation,
                anchor_index,
                "equity compiled"
            );
            EquityCurve {
                name: result.name,
                activation,
                equity,
                strategy_returns: result.strategy_returns[anchor_index..].to_vec(),
                positions: result.positions[anchor_index..].to_vec(),
            }
        })
        .collect();

    tracing::info!(%anchor, excluded = excluded.len(), "strategies aligned on common anchor");

    Ok(CompiledRun {
        anchor,
        anchor_index,
        timestamps,
        curves,
        excluded,
    })
}

/// Rescale a truncated curve so it starts at `initial_capital`.
///
/// The base is the first defined equity value; rows before it stay NaN.
/// The curve is rebuilt by compounding from `initial_capital` at the base
/// row, which equals `raw * initial_capital / base` while keeping the start
/// exact. With no usable base the curve is flat at `initial_capital`.
fn renormalize(raw: &[f64], strategy_returns: &[f64], initial_capital: f64) -> Vec<f64> {
    match raw.iter().position(|v| v.is_finite()) {
        Some(base) if raw[base] != 0.0 => compound(strategy_returns, base, initial_capital),
        _ => vec![initial_capital; raw.len()],
    }
}
