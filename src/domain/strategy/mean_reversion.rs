//! Mean reversion on two simple moving averages.
//!
//! Long where close < SMA(long); short where close > SMA(short). When both
//! hold on the same bar the short rule wins. Flat otherwise, including
//! warm-up bars where either average is undefined.

use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::sma::sma;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

#[derive(Debug, Clone)]
pub struct MeanReversion {
    pub short_window: usize,
    pub long_window: usize,
}

impl MeanReversion {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self::new(30, 100)
    }
}

impl Strategy for MeanReversion {
    fn name(&self) -> &str {
        "MeanReversion"
    }

    fn describe(&self) -> String {
        format!(
            "Mean Reversion (short={}, long={})",
            self.short_window, self.long_window
        )
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        let closes = series.closes();
        Ok(Features::from_series(series)
            .with_column(
                IndicatorType::Sma(self.short_window),
                sma(&closes, self.short_window)?,
            )
            .with_column(
                IndicatorType::Sma(self.long_window),
                sma(&closes, self.long_window)?,
            ))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        let short = features.require(self.name(), &IndicatorType::Sma(self.short_window))?;
        let long = features.require(self.name(), &IndicatorType::Sma(self.long_window))?;
        let closes = features.closes();

        Ok(features.signals(|i| {
            if closes[i] > short[i] {
                Signal::Short
            } else if closes[i] < long[i] {
                Signal::Long
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
    fn warmup_is_flat() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let mut strategy = MeanReversion::new(3, 5);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert!(signals.values[..2].iter().all(|s| *s == Signal::Flat));
    }

    #[test]
    fn dip_below_long_average_goes_long() {
        // Flat at 100 then a drop: close is below both averages.
        let mut prices = vec![100.0; 10];
        prices.push(90.0);
        let mut strategy = MeanReversion::new(3, 5);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert_eq!(signals.values[10], Signal::Long);
    }

    #[test]
    fn spike_above_short_average_goes_short() {
        let mut prices = vec![100.0; 10];
        prices.push(110.0);
        let mut strategy = MeanReversion::new(3, 5);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        assert_eq!(signals.values[10], Signal::Short);
    }

    #[test]
    fn short_rule_wins_when_both_hold() {
        // Close above SMA(short) but below SMA(long).
        let prices = [120.0, 120.0, 120.0, 80.0, 80.0, 90.0];
        let mut strategy = MeanReversion::new(2, 6);
        let features = strategy.generate_features(&series(&prices)).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();

        // SMA(2) = 85, SMA(6) = 101.67, close = 90.
        assert_eq!(signals.values[5], Signal::Short);
    }

    #[test]
    fn equal_to_averages_is_flat() {
        let mut strategy = MeanReversion::new(2, 3);
        let features = strategy.generate_features(&series(&[50.0; 6])).unwrap();
        let signals = strategy.generate_signals(&features).unwrap();
        assert!(signals.values.iter().all(|s| *s == Signal::Flat));
    }
}
