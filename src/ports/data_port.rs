//! Price data access port trait.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::PriceSeries;

pub trait DataPort {
    /// Load the full, validated price series for `ticker`.
    fn load_series(&self, ticker: &str) -> Result<PriceSeries, StratbenchError>;
}
