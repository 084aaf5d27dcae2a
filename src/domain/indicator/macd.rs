//! MACD (Moving Average Convergence Divergence) kernel.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Built on the EMA kernel, so every output is defined from the first sample.

use super::ema::ema;
use crate::domain::error::StratbenchError;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(
    data: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdOutput, StratbenchError> {
    let ema_fast = ema(data, fast)?;
    let ema_slow = ema(data, slow)?;

    let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal_period)?;
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Ok(MacdOutput {
        line,
        signal,
        histogram,
    })
}
