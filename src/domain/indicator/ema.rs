//! Exponential Moving Average kernel.
//!
//! k = 2/(n+1), EMA[0] = P[0], EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! No warmup: defined from the first sample.

use super::check_window;
use crate::domain::error::StratbenchError;

pub fn ema(data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
    check_window("EMA", window)?;

    let mut values = Vec::with_capacity(data.len());
    let k = 2.0 / (window as f64 + 1.0);

    let mut iter = data.iter();
    let Some(&first) = iter.next() else {
        return Ok(values);
    };

    let mut ema = first;
    values.push(ema);
    for &price in iter {
        // Same recursion written as a correction, exact when price == ema.
        ema += k * (price - ema);
        values.push(ema);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_defined_from_first_sample() {
        let result = ema(&[10.0, 20.0, 30.0], 5).unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| v.is_finite()));
        assert_eq!(result[0], 10.0);
    }

    #[test]
    fn ema_period_1() {
        let result = ema(&[10.0, 20.0, 30.0], 1).unwrap();
        assert!((result[1] - 20.0).abs() < f64::EPSILON);
        assert!((result[2] - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        let result = ema(&data, 3).unwrap();
        let k = 2.0 / 4.0;

        for i in 1..data.len() {
            let expected = data[i] * k + result[i - 1] * (1.0 - k);
            assert!((result[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_equal_prices() {
        let result = ema(&[100.0; 10], 3).unwrap();
        for v in result {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn ema_empty() {
        assert!(ema(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn ema_period_0() {
        assert!(ema(&[10.0, 20.0], 0).is_err());
    }

    #[test]
    fn ema_smoothing_factor() {
        let period = 10;
        let k = 2.0 / (period as f64 + 1.0);
        assert!((k - 2.0 / 11.0).abs() < f64::EPSILON);
    }
}
