//! RSI reversion through the shared kernel backend.
//!
//! Long when RSI < 30 (oversold), short when RSI > 70 (overbought). The
//! moving averages, volatility and drawdown columns are computed alongside
//! for reporting and do not drive the signal.

use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::backend::KernelBackend;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone)]
pub struct RsiReversion {
    pub rsi_window: usize,
    pub ma_window: usize,
    pub vol_window: usize,
}

impl RsiReversion {
    pub fn new(rsi_window: usize, ma_window: usize, vol_window: usize) -> Self {
        Self {
            rsi_window,
            ma_window,
            vol_window,
        }
    }
}

impl Default for RsiReversion {
    fn default() -> Self {
        Self::new(14, 50, 20)
    }
}

impl Strategy for RsiReversion {
    fn name(&self) -> &str {
        "RsiReversion"
    }

    fn describe(&self) -> String {
        format!(
            "RSI Reversion (rsi={}, ma={}, vol={})",
            self.rsi_window, self.ma_window, self.vol_window
        )
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        let backend = KernelBackend::global()?;
        let closes = series.closes();

        Ok(Features::from_series(series)
            .with_column(
                IndicatorType::Sma(self.ma_window),
                backend.sma(&closes, self.ma_window)?,
            )
            .with_column(
                IndicatorType::Ema(self.ma_window),
                backend.ema(&closes, self.ma_window)?,
            )
            .with_column(
                IndicatorType::Rsi(self.rsi_window),
                backend.rsi(&closes, self.rsi_window)?,
            )
            .with_column(
                IndicatorType::Stddev(self.vol_window),
                backend.stddev(&closes, self.vol_window)?,
            )
            .with_column(IndicatorType::Drawdown, backend.max_drawdown(&closes)))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        let rsi = features.require(self.name(), &IndicatorType::Rsi(self.rsi_window))?;

        Ok(features.signals(|i| {
            if rsi[i] < OVERSOLD {
                Signal::Long
            } else if rsi[i] > OVERBOUGHT {
                Signal::Short
            } else {
                Signal::Flat
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::series;
    use super::*;

    #[test]
    fn computes_all_columns() {
        let prices: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let strategy = RsiReversion::default();
        let features = strategy.generate_features(&series(&prices)).unwrap();

        for key in [
            IndicatorType::Sma(50),
            IndicatorType::Ema(50),
            IndicatorType::Rsi(14),
            IndicatorType::Stddev(20),
            IndicatorType::Drawdown,
        ] {
            assert_eq!(features.column(&key).unwrap().len(), 80, "{key}");
        }
    }

    #[test]
    fn falling_prices_are_oversold() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let mut strategy = RsiReversion::new(5, 10, 5);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert!(signals.values[..5].iter().all(|s| *s == Signal::Flat));
        assert!(signals.values[5..].iter().all(|s| *s == Signal::Long));
    }

    #[test]
    fn rising_prices_are_overbought() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let mut strategy = RsiReversion::new(5, 10, 5);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert_eq!(signals.values[29], Signal::Short);
    }

    #[test]
    fn flat_prices_stay_neutral() {
        let mut strategy = RsiReversion::new(5, 10, 5);
        let features = strategy.generate_features(&series(&[75.0; 20])).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert!(signals.values.iter().all(|s| *s == Signal::Flat));
    }
}
