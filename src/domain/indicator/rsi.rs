//! RSI (Relative Strength Index) kernel.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 when avg_gain > 0, otherwise 50 (no movement).
//!
//! Warmup: first n samples are NaN (need n price changes for the first average).

use super::check_window;
use crate::domain::error::StratbenchError;

pub fn rsi(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("RSI", window)?;

    let n = data.len();
    let mut values = vec![f64::NAN; n];
    if n <= window {
        return Ok(values);
    }

    let change = |i: usize| data[i] - data[i - 1];
    let period = window as f64;

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=window {
        let delta = change(i);
        avg_gain += delta.max(0.0);
        avg_loss += (-delta).max(0.0);
    }
    avg_gain /= period;
    avg_loss /= period;
    values[window] = rsi_value(avg_gain, avg_loss);

    for i in (window + 1)..n {
        let delta = change(i);
        avg_gain = (avg_gain * (period - 1.0) + delta.max(0.0)) / period;
        avg_loss = (avg_loss * (period - 1.0) + (-delta).max(0.0)) / period;
        values[i] = rsi_value(avg_gain, avg_loss);
    }

    Ok(values)
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { 100.0 } else { 50.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
