//! OHLCV bar and price series representation.

use crate::domain::error::StratbenchError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// An ordered, read-only sequence of bars with strictly increasing timestamps
/// and positive closes.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, StratbenchError> {
        if bars.is_empty() {
            return Err(StratbenchError::InvalidSeries {
                reason: "series is empty".into(),
            });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(StratbenchError::InvalidSeries {
                    reason: format!("non-finite value in bar {} ({})", i, bar.timestamp),
                });
            }
            if bar.close <= 0.0 {
                return Err(StratbenchError::InvalidSeries {
                    reason: format!(
                        "non-positive close {} in bar {} ({})",
                        bar.close, i, bar.timestamp
                    ),
                });
            }
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(StratbenchError::InvalidSeries {
                    reason: format!(
                        "timestamps not strictly increasing at bar {} ({} after {})",
                        i,
                        bar.timestamp,
                        bars[i - 1].timestamp
                    ),
                });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> NaiveDateTime {
        self.bars[0].timestamp
    }

    pub fn last_timestamp(&self) -> NaiveDateTime {
        self.bars[self.bars.len() - 1].timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn accepts_ordered_bars() {
        let series = PriceSeries::new(vec![bar(1, 100.0), bar(2, 101.0), bar(3, 102.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 102.0]);
        assert_eq!(series.first_timestamp(), bar(1, 0.0).timestamp);
        assert_eq!(series.last_timestamp(), bar(3, 0.0).timestamp);
    }

    #[test]
    fn rejects_empty() {
        let err = PriceSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let err = PriceSeries::new(vec![bar(1, 100.0), bar(1, 101.0)]).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_descending_timestamps() {
        let err = PriceSeries::new(vec![bar(2, 100.0), bar(1, 101.0)]).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_non_finite_close() {
        let err = PriceSeries::new(vec![bar(1, 100.0), bar(2, f64::NAN)]).unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn rejects_non_positive_close() {
        for close in [0.0, -5.0] {
            let err = PriceSeries::new(vec![bar(1, 100.0), bar(2, close)]).unwrap_err();
            assert!(
                matches!(
                    err,
                    StratbenchError::InvalidSeries { ref reason } if reason.contains("bar 1")
                ),
                "close {close}: {err}"
            );
        }
    }
}
