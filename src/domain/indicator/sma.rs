//! Simple Moving Average kernel.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]), defined for i >= n-1.
//!
//! The running sum is kept over values shifted by a reference sample, so a
//! constant series produces exactly that constant regardless of window.

use super::{check_window, RECOMPUTE_INTERVAL};
use crate::domain::error::StratbenchError;

pub fn sma(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("SMA", window)?;

    let n = data.len();
    if window == 1 {
        return Ok(data.to_vec());
    }

    let mut result = vec![f64::NAN; n];
    if n < window {
        return Ok(result);
    }

    let mut shift = data[0];
    let mut sum = 0.0;

    for i in 0..n {
        sum += data[i] - shift;
        if i >= window {
            sum -= data[i - window] - shift;

            if i % RECOMPUTE_INTERVAL == 0 {
                let start = i + 1 - window;
                shift = data[start];
                sum = data[start..=i].iter().map(|x| x - shift).sum();
            }
        }

        if i + 1 >= window {
            result[i] = shift + sum / window as f64;
        }
    }

    Ok(result)
}

/// Window-by-window SMA, O(n·w). Used by the reference backend.
pub fn sma_reference(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("SMA", window)?;

    let result = (0..data.len())
        .map(|i| {
            if i + 1 < window {
                f64::NAN
            } else {
                data[i + 1 - window..=i].iter().sum::<f64>() / window as f64
            }
        })
        .collect();

    Ok(result)
}
