//! Trend following: short SMA versus long SMA crossover.
//!
//! Long while SMA(short) > SMA(long), short while SMA(short) < SMA(long),
//! flat when equal or during warm-up.

use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::sma::sma;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

#[derive(Debug, Clone)]
pub struct TrendFollowing {
    pub short_window: usize,
    pub long_window: usize,
}

impl TrendFollowing {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Default for TrendFollowing {
    fn default() -> Self {
        Self::new(20, 30)
    }
}

impl Strategy for TrendFollowing {
    fn name(&self) -> &str {
        "TrendFollowing"
    }

    fn describe(&self) -> String {
        format!(
            "Trend Following (short={}, long={})",
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

        Ok(features.signals(|i| {
            if short[i] > long[i] {
                Signal::Long
            } else if short[i] < long[i] {
                Signal::Short
            } else {
                Signal::Flat
            }
        }))
    }
}
