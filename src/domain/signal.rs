//! Trading signals emitted by strategies.

use chrono::NaiveDateTime;

/// Desired exposure for the next bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn as_f64(self) -> f64 {
        match self {
            Signal::Short => -1.0,
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }
}

/// One signal per bar, carrying the timestamps it was derived from so the
/// engine can verify alignment against the price series.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<Signal>,
}

impl SignalSeries {
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<Signal>) -> Self {
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
