//! Bollinger Bands kernel.
//!
//! - Middle: SMA over n samples
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation from the rolling kernel.
//! Warmup: first (n-1) samples are NaN.

use super::{sma::sma, stddev::stddev};
use crate::domain::error::StratbenchError;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(
    data: &[f64],
    period: usize,
    stddev_mult_x100: u32,
) -> Result<BollingerBands, StratbenchError> {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let middle = sma(data, period)?;
    let spread = stddev(data, period)?;

    let upper = middle.iter().zip(&spread).map(|(m, s)| m + mult * s).collect();
    let lower = middle.iter().zip(&spread).map(|(m, s)| m - mult * s).collect();

    Ok(BollingerBands {
        upper,
        middle,
        lower,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_warmup() {
        let bands = bollinger(&[10.0, 20.0, 30.0, 40.0], 3, 200).unwrap();
        assert!(bands.upper[1].is_nan());
        assert!(bands.lower[1].is_nan());
        assert!(bands.upper[2].is_finite());
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bands = bollinger(&[10.0, 20.0, 30.0], 3, 200).unwrap();

        let middle = 20.0;
        let sd = (200.0_f64 / 3.0).sqrt();
        assert!((bands.middle[2] - middle).abs() < 1e-10);
        assert!((bands.upper[2] - (middle + 2.0 * sd)).abs() < 1e-10);
        assert!((bands.lower[2] - (middle - 2.0 * sd)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_constant_collapses() {
        let bands = bollinger(&[100.0; 10], 5, 200).unwrap();
        for i in 4..10 {
            assert_eq!(bands.upper[i], 100.0);
            assert_eq!(bands.lower[i], 100.0);
        }
    }
}
