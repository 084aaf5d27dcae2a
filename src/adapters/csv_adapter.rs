//! CSV file data adapter.
//!
//! Reads `<dir>/<ticker>.csv` with a header row. Columns are located by name
//! (case-insensitive); `Date` and `Close` are required, `Open`, `High` and
//! `Low` default to the close and `Volume` to zero. Rows are sorted by
//! timestamp and, with [`Resample::Daily`], aggregated to one bar per
//! calendar day.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    #[default]
    None,
    Daily,
}

impl Resample {
    pub fn parse(value: &str) -> Result<Self, StratbenchError> {
        match value.trim() {
            "" | "none" => Ok(Resample::None),
            "daily" => Ok(Resample::Daily),
            other => Err(StratbenchError::config_invalid(
                "data",
                "resample",
                format!("expected 'daily' or 'none', got '{}'", other),
            )),
        }
    }
}

pub struct CsvAdapter {
    base_path: PathBuf,
    resample: Resample,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            resample: Resample::None,
        }
    }

    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn read_bars(&self, ticker: &str) -> Result<Vec<OhlcvBar>, StratbenchError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| StratbenchError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| StratbenchError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();
        let source_name = path.display().to_string();
        let columns = locate_columns(&headers, &source_name)?;

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| StratbenchError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let row = line + 2;

            let date_str = record.get(columns.date).unwrap_or_default();
            let timestamp = parse_timestamp(date_str).ok_or_else(|| StratbenchError::Data {
                reason: format!("row {}: invalid date '{}'", row, date_str),
            })?;

            let close = field(&record, columns.close, "close", row)?;
            let optional = |idx: Option<usize>, name: &str, default: f64| match idx {
                Some(i) => field(&record, i, name, row),
                None => Ok(default),
            };

            bars.push(OhlcvBar {
                timestamp,
                open: optional(columns.open, "open", close)?,
                high: optional(columns.high, "high", close)?,
                low: optional(columns.low, "low", close)?,
                close,
                volume: optional(columns.volume, "volume", 0.0)?,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn load_series(&self, ticker: &str) -> Result<PriceSeries, StratbenchError> {
        let bars = self.read_bars(ticker)?;
        let rows = bars.len();
        let bars = match self.resample {
            Resample::None => bars,
            Resample::Daily => resample_daily(bars),
        };
        tracing::info!(
            ticker,
            rows,
            bars = bars.len(),
            resample = ?self.resample,
            "price data loaded"
        );
        PriceSeries::new(bars)
    }
}

fn locate_columns(
    headers: &csv::StringRecord,
    source_name: &str,
) -> Result<Columns, StratbenchError> {
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let required = |name: &str| {
        find(name).ok_or_else(|| StratbenchError::MissingColumn {
            column: name.to_string(),
            source_name: source_name.to_string(),
        })
    };

    Ok(Columns {
        date: required("Date")?,
        close: required("Close")?,
        open: find("Open"),
        high: find("High"),
        low: find("Low"),
        volume: find("Volume"),
    })
}

fn field(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    row: usize,
) -> Result<f64, StratbenchError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.parse().map_err(|e| StratbenchError::Data {
        reason: format!("row {}: invalid {} value '{}': {}", row, name, raw, e),
    })
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (space or `T`) and the same
/// with a numeric UTC offset, which is normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%dT%H:%M:%S%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Aggregate sorted bars per calendar day: first open, highest high, lowest
/// low, last close, summed volume. Each day is stamped at midnight.
pub fn resample_daily(bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    let mut days: Vec<OhlcvBar> = Vec::new();
    for bar in bars {
        let day = bar.timestamp.date();
        match days.last_mut() {
            Some(current) if current.timestamp.date() == day => {
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => days.push(OhlcvBar {
                timestamp: day.and_time(NaiveTime::default()),
                ..bar
            }),
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, ticker: &str, content: &str) {
        fs::write(dir.path().join(format!("{}.csv", ticker)), content).unwrap();
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn load_series_returns_correct_data() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "BTC",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );
        let series = CsvAdapter::new(dir.path().to_path_buf())
            .load_series("BTC")
            .unwrap();

        assert_eq!(series.len(), 2);
        let bar = &series.bars()[0];
        assert_eq!(bar.timestamp, day(2024, 1, 15));
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 110.0);
        assert_eq!(bar.low, 90.0);
        assert_eq!(bar.close, 105.0);
        assert_eq!(bar.volume, 50000.0);
    }

    #[test]
    fn columns_found_by_name_in_any_order() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "X", "close,volume,date\n10.5,7,2024-03-01\n");
        let series = CsvAdapter::new(dir.path().to_path_buf()).load_series("X").unwrap();

        let bar = &series.bars()[0];
        assert_eq!(bar.close, 10.5);
        assert_eq!(bar.open, 10.5);
        assert_eq!(bar.high, 10.5);
        assert_eq!(bar.volume, 7.0);
    }

    #[test]
    fn missing_close_column_is_config_error() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "X", "Date,Open\n2024-01-01,1.0\n");
        let err = CsvAdapter::new(dir.path().to_path_buf())
            .load_series("X")
            .unwrap_err();
        assert!(matches!(err, StratbenchError::MissingColumn { column, .. } if column == "Close"));
    }

    #[test]
    fn missing_file_is_data_error() {
        let dir = TempDir::new().unwrap();
        let err = CsvAdapter::new(dir.path().to_path_buf())
            .load_series("NOPE")
            .unwrap_err();
        assert!(matches!(err, StratbenchError::Data { .. }));
    }

    #[test]
    fn bad_number_is_data_error() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "X", "Date,Close\n2024-01-01,abc\n");
        let err = CsvAdapter::new(dir.path().to_path_buf())
            .load_series("X")
            .unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn rows_are_sorted() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "X", "Date,Close\n2024-01-03,3\n2024-01-01,1\n2024-01-02,2\n");
        let series = CsvAdapter::new(dir.path().to_path_buf()).load_series("X").unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn duplicate_dates_rejected_without_resampling() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "X", "Date,Close\n2024-01-01,1\n2024-01-01,2\n");
        let err = CsvAdapter::new(dir.path().to_path_buf())
            .load_series("X")
            .unwrap_err();
        assert!(matches!(err, StratbenchError::InvalidSeries { .. }));
    }

    #[test]
    fn daily_resampling_aggregates_intraday_bars() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "X",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-01 09:00:00,10,12,9,11,100\n\
             2024-01-01 15:00:00,11,14,10,13,50\n\
             2024-01-02 09:00:00,13,13,8,9,20\n",
        );
        let series = CsvAdapter::new(dir.path().to_path_buf())
            .with_resample(Resample::Daily)
            .load_series("X")
            .unwrap();

        assert_eq!(series.len(), 2);
        let first = &series.bars()[0];
        assert_eq!(first.timestamp, day(2024, 1, 1));
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 14.0);
        assert_eq!(first.low, 9.0);
        assert_eq!(first.close, 13.0);
        assert_eq!(first.volume, 150.0);
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-02"), Some(day(2024, 1, 2)));
        assert_eq!(
            parse_timestamp("2024-01-02 03:04:05"),
            day(2024, 1, 2).checked_add_signed(chrono::Duration::seconds(3 * 3600 + 4 * 60 + 5))
        );
        assert_eq!(
            parse_timestamp("2024-01-02 01:00:00+02:00"),
            Some(day(2024, 1, 1) + chrono::Duration::hours(23))
        );
        assert_eq!(parse_timestamp("02/01/2024"), None);
    }

    #[test]
    fn resample_parse() {
        assert_eq!(Resample::parse("daily").unwrap(), Resample::Daily);
        assert_eq!(Resample::parse("none").unwrap(), Resample::None);
        assert!(Resample::parse("weekly").is_err());
    }
}
