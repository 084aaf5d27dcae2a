//! Momentum on smoothed log returns.
//!
//! Log returns are smoothed with a trailing moving average and scaled by
//! their rolling population standard deviation:
//!
//! momentum = SMA(logret, w) / (STDDEV(logret, w) + 1e-4)
//!
//! Long above `threshold`, short below `-threshold`.

use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::sma::sma;
use crate::domain::indicator::stddev::stddev;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

const MIN_PRICE: f64 = 1e-8;
const STD_FLOOR: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct Momentum {
    pub window: usize,
    pub poly: usize,
    pub threshold: f64,
}

impl Momentum {
    pub fn new(window: usize, poly: usize, threshold: f64) -> Result<Self, StratbenchError> {
        if window < 3 {
            return Err(StratbenchError::config_invalid(
                "momentum",
                "window",
                "window must be at least 3",
            ));
        }
        if poly < 1 {
            return Err(StratbenchError::config_invalid(
                "momentum",
                "poly",
                "poly must be positive",
            ));
        }
        Ok(Self {
            window,
            poly,
            threshold,
        })
    }

    /// Effective smoothing window for a series of `length` samples: capped by
    /// the length, odd, and larger than `poly`.
    pub fn resolve_window(&self, length: usize) -> usize {
        let mut window = self.window.min(length.max(1));
        if window % 2 == 0 {
            window = (window - 1).max(3);
        }
        if window <= self.poly {
            window = self.poly + 3;
            if window % 2 == 0 {
                window += 1;
            }
        }
        window
    }

    fn momentum_key(&self) -> IndicatorType {
        IndicatorType::Momentum(self.window)
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self {
            window: 11,
            poly: 2,
            threshold: 0.05,
        }
    }
}

impl Strategy for Momentum {
    fn name(&self) -> &str {
        "Momentum"
    }

    fn describe(&self) -> String {
        format!(
            "Momentum (window={}, poly={}, threshold={})",
            self.window, self.poly, self.threshold
        )
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        let closes = series.closes();
        let n = closes.len();

        let log_prices: Vec<f64> = closes.iter().map(|p| p.max(MIN_PRICE).ln()).collect();
        let log_returns: Vec<f64> = (0..n)
            .map(|i| if i == 0 { 0.0 } else { log_prices[i] - log_prices[i - 1] })
            .collect();

        let window = self.resolve_window(n);
        let smoothed = if n < 3 {
            vec![0.0; n]
        } else {
            sma(&log_returns, window)?
        };
        let rolling_std = stddev(&log_returns, window)?;

        let momentum = smoothed
            .iter()
            .zip(&rolling_std)
            .map(|(s, sd)| {
                let m = s / (sd + STD_FLOOR);
                if m.is_finite() { m } else { 0.0 }
            })
            .collect();

        tracing::debug!(window, bars = n, "momentum features");

        Ok(Features::from_series(series)
            .with_column(IndicatorType::LogReturn, log_returns)
            .with_column(IndicatorType::SmoothedReturn(self.window), smoothed)
            .with_column(self.momentum_key(), momentum))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        let momentum = features.require(self.name(), &self.momentum_key())?;
        let threshold = self.threshold;

        Ok(features.signals(|i| {
            if momentum[i] > threshold {
                Signal::Long
            } else if momentum[i] < -threshold {
                Signal::Short
            } else {
                Signal::Flat
            }
        }))
    }
}
