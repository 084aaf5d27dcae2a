//! Rolling standard deviation kernel.
//!
//! Population standard deviation over the trailing n samples.
//! STDDEV(n)[i] = sqrt(sum((P[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) samples are NaN.
//!
//! Streaming form keeps a running sum and sum of squares of values shifted by
//! a reference sample. Both sums are rebuilt every `RECOMPUTE_INTERVAL`
//! samples, re-picking the reference from the current window.

use super::{check_window, RECOMPUTE_INTERVAL};
use crate::domain::error::StratbenchError;

pub fn stddev(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("STDDEV", window)?;

    let n = data.len();
    let mut values = vec![f64::NAN; n];
    if n < window {
        return Ok(values);
    }

    let period = window as f64;
    let mut shift = data[0];
    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for i in 0..n {
        let entering = data[i] - shift;
        sum += entering;
        sum_sq += entering * entering;

        if i >= window {
            let leaving = data[i - window] - shift;
            sum -= leaving;
            sum_sq -= leaving * leaving;

            if i % RECOMPUTE_INTERVAL == 0 {
                let start = i + 1 - window;
                shift = data[start];
                sum = 0.0;
                sum_sq = 0.0;
                for x in &data[start..=i] {
                    let d = x - shift;
                    sum += d;
                    sum_sq += d * d;
                }
            }
        }

        if i + 1 >= window {
            let mean = sum / period;
            let variance = (sum_sq / period - mean * mean).max(0.0);
            values[i] = variance.sqrt();
        }
    }

    Ok(values)
}

/// Two-pass window-by-window standard deviation. Used by the reference backend.
pub fn stddev_reference(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("STDDEV", window)?;

    let period = window as f64;
    let values = (0..data.len())
        .map(|i| {
            if i + 1 < window {
                return f64::NAN;
            }
            let slice = &data[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / period;
            let variance = slice
                .iter()
                .map(|x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period;
            variance.sqrt()
        })
        .collect();

    Ok(values)
}
