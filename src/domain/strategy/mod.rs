//! Strategy contract and the concrete strategy variants.
//!
//! A strategy turns a [`PriceSeries`] into [`Features`] and then into a
//! [`SignalSeries`]. Row `i` of any feature may only depend on bars `0..=i`;
//! the one exception is a supervised-learning target, which must never be
//! turned into a tradable signal for the same timestamps.

pub mod buy_and_hold;
pub mod classifier;
pub mod forest;
pub mod mean_reversion;
pub mod momentum;
pub mod rsi_reversion;
pub mod trend_following;

pub use buy_and_hold::BuyAndHold;
pub use classifier::Classifier;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
pub use rsi_reversion::RsiReversion;
pub use trend_following::TrendFollowing;

use crate::domain::error::StratbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};
use chrono::NaiveDateTime;
use std::collections::HashMap;

pub trait Strategy: Send {
    /// Identifier used as the report key; unique within a run.
    fn name(&self) -> &str;

    /// Human-readable summary including parameters.
    fn describe(&self) -> String {
        self.name().to_string()
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError>;

    /// Must return one signal per feature row; warm-up rows are `Flat`.
    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError>;
}

/// Immutable feature table produced by a strategy: the source timestamps and
/// closes plus named indicator columns, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    timestamps: Vec<NaiveDateTime>,
    closes: Vec<f64>,
    columns: HashMap<IndicatorType, Vec<f64>>,
}

impl Features {
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            timestamps: series.timestamps(),
            closes: series.closes(),
            columns: HashMap::new(),
        }
    }

    /// Column lengths are checked when the column is required.
    pub fn with_column(mut self, key: IndicatorType, values: Vec<f64>) -> Self {
        self.columns.insert(key, values);
        self
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn column(&self, key: &IndicatorType) -> Option<&[f64]> {
        self.columns.get(key).map(Vec::as_slice)
    }

    /// Like [`Features::column`], but a missing column or one whose length
    /// differs from the row count is an error naming the requesting strategy.
    pub fn require(&self, strategy: &str, key: &IndicatorType) -> Result<&[f64], StratbenchError> {
        let values = self
            .column(key)
            .ok_or_else(|| StratbenchError::MissingFeature {
                strategy: strategy.to_string(),
                feature: key.to_string(),
            })?;
        if values.len() != self.len() {
            return Err(StratbenchError::FeatureLength {
                strategy: strategy.to_string(),
                feature: key.to_string(),
                len: values.len(),
                expected: self.len(),
            });
        }
        Ok(values)
    }

    /// Build a signal series by evaluating `rule` at every row.
    pub fn signals(&self, rule: impl Fn(usize) -> Signal) -> SignalSeries {
        let values = (0..self.len()).map(rule).collect();
        SignalSeries::new(self.timestamps.clone(), values)
    }
}
