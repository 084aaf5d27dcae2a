//! Rate of change kernel, as a fraction.
//!
//! ROC(n)[i] = (P[i] - P[i-n]) / P[i-n]
//! If P[i-n] == 0: ROC = 0
//! Warmup: first n samples are NaN.

use super::check_window;
use crate::domain::error::StratbenchError;

pub fn rate_of_change(data: &[f64], period: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("ROC", period)?;

    let values = (0..data.len())
        .map(|i| {
            if i < period {
                return f64::NAN;
            }
            let prev = data[i - period];
            if prev == 0.0 {
                0.0
            } else {
                (data[i] - prev) / prev
            }
        })
        .collect();

    Ok(values)
}
