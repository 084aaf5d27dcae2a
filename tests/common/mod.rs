#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use stratbench::domain::error::StratbenchError;
pub use stratbench::domain::ohlcv::OhlcvBar;
use stratbench::domain::ohlcv::PriceSeries;
use stratbench::domain::signal::{Signal, SignalSeries};
use stratbench::domain::strategy::{Features, Strategy};
use stratbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_series(&self, ticker: &str) -> Result<PriceSeries, StratbenchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StratbenchError::Data {
                reason: reason.clone(),
            });
        }
        PriceSeries::new(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

/// Replays a fixed signal vector, ignoring the prices.
pub struct ScriptedStrategy {
    pub name: String,
    pub signals: Vec<Signal>,
}

impl ScriptedStrategy {
    pub fn new(name: &str, signals: Vec<Signal>) -> Self {
        Self {
            name: name.to_string(),
            signals,
        }
    }

    /// `Long` from signal index `start` onwards, `Flat` before.
    pub fn long_from(name: &str, start: usize, len: usize) -> Self {
        let signals = (0..len)
            .map(|i| if i >= start { Signal::Long } else { Signal::Flat })
            .collect();
        Self::new(name, signals)
    }

    pub fn flat(name: &str, len: usize) -> Self {
        Self::new(name, vec![Signal::Flat; len])
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_features(&self, series: &PriceSeries) -> Result<Features, StratbenchError> {
        Ok(Features::from_series(series))
    }

    fn generate_signals(&mut self, features: &Features) -> Result<SignalSeries, StratbenchError> {
        Ok(SignalSeries::new(
            features.timestamps().to_vec(),
            self.signals.clone(),
        ))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn day(offset: i64) -> NaiveDateTime {
    date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::days(offset)
}

pub fn make_bar(timestamp: NaiveDateTime, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1000.0,
    }
}

/// One bar per day from 2024-01-01.
pub fn daily_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(day(i as i64), close))
        .collect()
}

pub fn daily_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(daily_bars(closes)).unwrap()
}

/// A deterministic oscillating uptrend long enough for every strategy's
/// warm-up.
pub fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + x * 0.15 + (x * 0.2).sin() * 6.0 + (x * 0.05).cos() * 3.0
        })
        .collect()
}

/// CSV text with a `Date,Open,High,Low,Close,Volume` header.
pub fn csv_text(closes: &[f64]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for bar in daily_bars(closes) {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}
