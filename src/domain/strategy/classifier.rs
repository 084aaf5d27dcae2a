//! Classifier strategy: predicts whether the close `lookahead` bars ahead is
//! higher than today's, and trades the prediction out of sample.
//!
//! The up-move target is the only feature that looks forward. It is used
//! for training only, on rows whose whole target horizon lies before the
//! evaluation segment. Signals are emitted on the evaluation segment only.

use super::forest::{ForestModel, ForestParams};
use super::{Features, Strategy};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::bollinger::bollinger;
use crate::domain::indicator::macd::{macd, DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::roc::rate_of_change;
use crate::domain::indicator::rsi::rsi;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Signal, SignalSeries};

const BAND_PERIOD: usize = 20;
const BAND_MULT_X100: u32 = 200;
const RSI_PERIOD: usize = 14;
const SHORT_CHANGE: usize = 5;
const LONG_CHANGE: usize = 15;

#[derive(Debug)]
pub struct Classifier {
    lookahead: usize,
    train_ratio: f64,
    params: ForestParams,
    model: Option<ForestModel>,
}

impl Classifier {
    pub fn new(lookahead: usize, train_ratio: f64) -> Result<Self, StratbenchError> {
        if lookahead == 0 {
            return Err(StratbenchError::config_invalid(
                "classifier",
                "lookahead",
                "lookahead must be positive",
            ));
        }
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(StratbenchError::config_invalid(
                "classifier",
                "train_ratio",
                format!("train_ratio must be in (0, 1), got {}", train_ratio),
            ));
        }
        Ok(Self {
            lookahead,
            train_ratio,
            params: ForestParams::default(),
            model: None,
        })
    }

    pub fn with_forest_params(mut self, params: ForestParams) -> Self {
        self.params = params;
        self
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn train_ratio(&self) -> f64 {
        self.train_ratio
    }

    pub fn forest_params(&self) -> &ForestParams {
        &self.params
    }

    /// The model fitted by the last call to `generate_signals`.
    pub fn model(&self) -> Option<&ForestModel> {
        self.model.as_ref()
    }

    fn model_error(&self, stage: &str, reason: String) -> StratbenchError {
        StratbenchError::InsufficientData {
            strategy: self.name().to_string(),
            reason: format!("model {} failed: {}", stage, reason),
        }
    }

    fn input_keys() -> [IndicatorType; 6] {
        [
            IndicatorType::BollingerUpper {
                period: BAND_PERIOD,
                stddev_mult_x100: BAND_MULT_X100,
            },
            IndicatorType::BollingerLower {
                period: BAND_PERIOD,
                stddev_mult_x100: BAND_MULT_X100,
            },
            IndicatorType::MacdHistogram {
                fast: DEFAULT_FAST,
                slow: DEFAULT_SLOW,
                signal: DEFAULT_SIGNAL,
            },
            IndicatorType::Rsi(RSI_PERIOD),
            IndicatorType::Roc(SHORT_CHANGE),
            IndicatorType::Roc(LONG_CHANGE),
        ]
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            lookahead: 15,
            train_ratio: 0.8,
            params: ForestParams::default(),
            model: None,
        }
    }
}

/// Training and evaluation row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Partition {
    pub train: Vec<usize>,
    pub evaluate: Vec<usize>,
}

/// Split the fully-defined rows `valid` (ascending bar indices) at
/// `floor(len * train_ratio)`. Training rows are those before the split
/// whose target horizon `i + lookahead` also falls before the first
/// evaluation bar.
pub(crate) fn partition(valid: &[usize], train_ratio: f64, lookahead: usize) -> Partition {
    let split = (valid.len() as f64 * train_ratio).floor() as usize;
    let evaluate = valid[split.min(valid.len())..].to_vec();
    let boundary = evaluate.first().copied().unwrap_or(usize::MAX);
    let train = valid[..split.min(valid.len())]
        .iter()
        .copied()
        .filter(|&i| i + lookahead < boundary)
        .collect();
    Partition { train, evaluate }
}

impl Strategy for Classifier {
    fn name(&self) -> &str {
        "Classifier"
    }

    fn describe(&self) -> String {
        format!(
            "Random Forest Classifier (lookahead={}, train_ratio={}, trees={}, depth={})",
            self.lookahead, self.train_ratio, self.params.n_trees, self.params.max_depth
        )
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        let closes = series.closes();
        let n = closes.len();

        let bands = bollinger(&closes, BAND_PERIOD, BAND_MULT_X100)?;
        let hist = macd(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)?.histogram;
        let rsi_values = rsi(&closes, RSI_PERIOD)?;
        let short_change = rate_of_change(&closes, SHORT_CHANGE)?;
        let long_change = rate_of_change(&closes, LONG_CHANGE)?;

        let target = (0..n)
            .map(|i| match closes.get(i + self.lookahead) {
                Some(future) if *future > closes[i] => 1.0,
                Some(_) => 0.0,
                None => f64::NAN,
            })
            .collect();

        let [upper, lower, macd_hist, rsi_key, short_key, long_key] = Self::input_keys();
        Ok(Features::from_series(series)
            .with_column(upper, bands.upper)
            .with_column(lower, bands.lower)
            .with_column(macd_hist, hist)
            .with_column(rsi_key, rsi_values)
            .with_column(short_key, short_change)
            .with_column(long_key, long_change)
            .with_column(IndicatorType::UpTarget(self.lookahead), target))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        let keys = Self::input_keys();
        let columns = keys
            .iter()
            .map(|key| features.require(self.name(), key))
            .collect::<Result<Vec<_>, _>>()?;
        let target = features.require(self.name(), &IndicatorType::UpTarget(self.lookahead))?;

        let row = |i: usize| columns.iter().map(|c| c[i]).collect::<Vec<f64>>();
        let valid: Vec<usize> = (0..features.len())
            .filter(|&i| columns.iter().all(|c| c[i].is_finite()))
            .collect();

        let Partition { train, evaluate } = partition(&valid, self.train_ratio, self.lookahead);
        if train.is_empty() {
            return Err(StratbenchError::InsufficientData {
                strategy: self.name().to_string(),
                reason: format!(
                    "no training rows among {} defined rows (lookahead {})",
                    valid.len(),
                    self.lookahead
                ),
            });
        }
        if evaluate.is_empty() {
            return Err(StratbenchError::InsufficientData {
                strategy: self.name().to_string(),
                reason: format!("no evaluation rows among {} defined rows", valid.len()),
            });
        }

        let labels: Vec<bool> = train.iter().map(|&i| target[i] > 0.5).collect();
        let train_rows = train.iter().map(|&i| row(i)).collect();
        let model = ForestModel::fit(train_rows, &labels, &self.params)
            .map_err(|reason| self.model_error("fit", reason))?;
        let predicted = model
            .predict(evaluate.iter().map(|&i| row(i)).collect())
            .map_err(|reason| self.model_error("prediction", reason))?;

        tracing::debug!(
            train = model.n_samples(),
            evaluate = evaluate.len(),
            up_share = model.up_share(),
            "classifier fitted"
        );

        let mut values = vec![Signal::Flat; features.len()];
        for (&i, up) in evaluate.iter().zip(predicted) {
            values[i] = if up { Signal::Long } else { Signal::Short };
        }
        self.model = Some(model);

        Ok(SignalSeries::new(features.timestamps().to_vec(), values))
    }
}
