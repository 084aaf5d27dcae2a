//! Technical indicator kernels.
//!
//! Every kernel is a pure function over an ordered slice of prices that
//! returns a vector of the same length. Entries before enough history exists
//! are `f64::NAN`. Strategies reach the kernels either directly or through
//! the process-wide [`backend::KernelBackend`] handle.
//!
//! [`IndicatorType`] names a computed column and serves as the key of a
//! strategy's feature map.

pub mod backend;
pub mod bollinger;
pub mod drawdown;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;

use crate::domain::error::StratbenchError;
use std::fmt;

/// Rolling kernels rebuild their running sums from scratch this often to
/// bound floating-point drift.
pub const RECOMPUTE_INTERVAL: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Drawdown,
    Roc(usize),
    BollingerUpper {
        period: usize,
        stddev_mult_x100: u32,
    },
    BollingerLower {
        period: usize,
        stddev_mult_x100: u32,
    },
    MacdHistogram {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    LogReturn,
    SmoothedReturn(usize),
    Momentum(usize),
    UpTarget(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Drawdown => write!(f, "DRAWDOWN"),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BBU({},{})", period, mult)
            }
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BBL({},{})", period, mult)
            }
            IndicatorType::MacdHistogram { fast, slow, signal } => {
                write!(f, "MACDH({},{},{})", fast, slow, signal)
            }
            IndicatorType::LogReturn => write!(f, "LOGRET"),
            IndicatorType::SmoothedReturn(period) => write!(f, "SMOOTHRET({})", period),
            IndicatorType::Momentum(period) => write!(f, "MOMENTUM({})", period),
            IndicatorType::UpTarget(horizon) => write!(f, "TARGET({})", horizon),
        }
    }
}

pub(crate) fn check_window(kernel: &'static str, window: usize) -> Result<(), StratbenchError> {
    if window == 0 {
        return Err(StratbenchError::InvalidWindow { kernel, window });
    }
    Ok(())
}
