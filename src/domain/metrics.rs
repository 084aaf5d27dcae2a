//! Performance metrics over anchor-aligned equity curves.
//!
//! Degenerate results (zero volatility, too few samples, a zero-length
//! period) are reported as NaN plus a [`DegenerateMetric`] flag, never as an
//! error.

use super::equity::CompiledRun;
use chrono::NaiveDateTime;
use std::fmt;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegenerateMetric {
    /// First and last timestamps are less than a whole day apart.
    NonPositivePeriod,
    /// Fewer than two strategy returns; volatility is undefined.
    InsufficientSamples,
    /// Volatility is exactly zero; Sharpe is undefined.
    ZeroVolatility,
    /// No row survived dropping undefined values.
    EmptyWindow,
}

impl fmt::Display for DegenerateMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DegenerateMetric::NonPositivePeriod => "non_positive_period",
            DegenerateMetric::InsufficientSamples => "insufficient_samples",
            DegenerateMetric::ZeroVolatility => "zero_volatility",
            DegenerateMetric::EmptyWindow => "empty_window",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub flags: Vec<DegenerateMetric>,
}

impl Metrics {
    /// Metrics for one strategy. `equity`, `strategy_returns` and
    /// `timestamps` must be of equal length and fully defined.
    pub fn compute(
        equity: &[f64],
        strategy_returns: &[f64],
        timestamps: &[NaiveDateTime],
        periods_per_year: f64,
    ) -> Self {
        let (Some(first), Some(last)) = (equity.first(), equity.last()) else {
            return Self::empty();
        };
        let mut flags = Vec::new();

        let total_return = last / first - 1.0;
        let max_drawdown = compute_drawdown(equity);

        let days = match (timestamps.first(), timestamps.last()) {
            (Some(start), Some(end)) => (*end - *start).num_days(),
            _ => 0,
        };
        let years = days as f64 / DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            flags.push(DegenerateMetric::NonPositivePeriod);
            f64::NAN
        };

        let annualized_volatility = match sample_stddev(strategy_returns) {
            Some(sd) => sd * periods_per_year.sqrt(),
            None => {
                flags.push(DegenerateMetric::InsufficientSamples);
                f64::NAN
            }
        };

        let sharpe_ratio = if annualized_volatility == 0.0 {
            flags.push(DegenerateMetric::ZeroVolatility);
            f64::NAN
        } else {
            annualized_return / annualized_volatility
        };

        Metrics {
            total_return,
            annualized_return,
            annualized_volatility,
            max_drawdown,
            sharpe_ratio,
            flags,
        }
    }

    fn empty() -> Self {
        Metrics {
            total_return: f64::NAN,
            annualized_return: f64::NAN,
            annualized_volatility: f64::NAN,
            max_drawdown: f64::NAN,
            sharpe_ratio: f64::NAN,
            flags: vec![DegenerateMetric::EmptyWindow],
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Metrics for every strategy of a run, in the run's strategy order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub rows: Vec<(String, Metrics)>,
    /// Timestamps of the rows the metrics were computed on.
    pub timestamps: Vec<NaiveDateTime>,
}

impl MetricsReport {
    /// Drops every row where any strategy's equity or return is undefined,
    /// then computes each strategy's metrics over the remaining rows.
    pub fn compute(run: &CompiledRun, periods_per_year: f64) -> Self {
        let keep: Vec<usize> = (0..run.timestamps.len())
            .filter(|&t| {
                run.curves
                    .iter()
                    .all(|c| c.equity[t].is_finite() && c.strategy_returns[t].is_finite())
            })
            .collect();

        let timestamps: Vec<NaiveDateTime> = keep.iter().map(|&t| run.timestamps[t]).collect();
        let rows = run
            .curves
            .iter()
            .map(|curve| {
                let equity: Vec<f64> = keep.iter().map(|&t| curve.equity[t]).collect();
                let returns: Vec<f64> = keep.iter().map(|&t| curve.strategy_returns[t]).collect();
                let metrics = Metrics::compute(&equity, &returns, &timestamps, periods_per_year);
                if metrics.is_degenerate() {
                    tracing::debug!(
                        strategy = %curve.name,
                        flags = ?metrics.flags,
                        "degenerate metrics"
                    );
                }
                (curve.name.clone(), metrics)
            })
            .collect();

        MetricsReport { rows, timestamps }
    }

    pub fn get(&self, name: &str) -> Option<&Metrics> {
        self.rows.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Metrics)> {
        self.rows.iter().map(|(n, m)| (n.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Most negative fractional decline from the running peak; 0 when the
/// curve never falls.
fn compute_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &value in equity {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
