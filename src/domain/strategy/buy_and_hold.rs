//! Buy and hold: long on every bar.

use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

#[derive(Debug, Clone, Default)]
pub struct BuyAndHold;

impl Strategy for BuyAndHold {
    fn name(&self) -> &str {
        "BuyAndHold"
    }

    fn describe(&self) -> String {
        "Buy and Hold".to_string()
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        Ok(Features::from_series(series))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        Ok(features.signals(|_| Signal::Long))
    }
}
