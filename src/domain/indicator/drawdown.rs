//! Running maximum drawdown kernel.
//!
//! peak[i] = max(peak[i-1], P[i]); DD[i] = (P[i] - peak[i]) / peak[i].
//! Always <= 0 for positive prices and exactly 0 at a new peak. A zero peak
//! yields 0.

pub fn max_drawdown(data: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;

    data.iter()
        .map(|&price| {
            if price > peak {
                peak = price;
            }
            if peak == 0.0 {
                0.0
            } else {
                (price - peak) / peak
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_basic() {
        let result = max_drawdown(&[100.0, 110.0, 99.0, 121.0, 110.0]);

        assert_eq!(result[0], 0.0);
        assert_eq!(result[1], 0.0);
        assert!((result[2] - (-0.1)).abs() < 1e-12);
        assert_eq!(result[3], 0.0);
        assert!((result[4] - (110.0 - 121.0) / 121.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_monotonic_rise_is_zero() {
        let data: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        assert!(max_drawdown(&data).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn drawdown_zero_peak() {
        assert_eq!(max_drawdown(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn drawdown_empty() {
        assert!(max_drawdown(&[]).is_empty());
    }
}
