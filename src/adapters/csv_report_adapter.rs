//! CSV report adapter.
//!
//! Writes two files into the output directory:
//! - `metrics.csv`: one row per strategy, degenerate flags joined by `;`
//! - `equity.csv`: the anchor-aligned equity curves, one column per strategy

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StratbenchError;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub const METRICS_FILE: &str = "metrics.csv";
pub const EQUITY_FILE: &str = "equity.csv";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn write_metrics(&self, result: &BacktestResult, path: &Path) -> Result<(), StratbenchError> {
        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
        wtr.write_record([
            "strategy",
            "total_return",
            "annualized_return",
            "annualized_volatility",
            "max_drawdown",
            "sharpe_ratio",
            "flags",
        ])
        .map_err(csv_error)?;

        for (name, m) in result.report.iter() {
            let flags = m
                .flags
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(";");
            wtr.write_record([
                name.to_string(),
                m.total_return.to_string(),
                m.annualized_return.to_string(),
                m.annualized_volatility.to_string(),
                m.max_drawdown.to_string(),
                m.sharpe_ratio.to_string(),
                flags,
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_equity(&self, result: &BacktestResult, path: &Path) -> Result<(), StratbenchError> {
        let run = &result.run;
        let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;

        let mut header = vec!["timestamp".to_string()];
        header.extend(run.curves.iter().map(|c| c.name.clone()));
        wtr.write_record(&header).map_err(csv_error)?;

        for (t, ts) in run.timestamps.iter().enumerate() {
            let mut record = vec![ts.format(TIMESTAMP_FORMAT).to_string()];
            record.extend(run.curves.iter().map(|c| c.equity[t].to_string()));
            wtr.write_record(&record).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output: &Path) -> Result<(), StratbenchError> {
        fs::create_dir_all(output)?;
        self.write_metrics(result, &output.join(METRICS_FILE))?;
        self.write_equity(result, &output.join(EQUITY_FILE))?;
        tracing::info!(output = %output.display(), "report written");
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> StratbenchError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => StratbenchError::Io(io),
        other => StratbenchError::Data {
            reason: format!("CSV write error: {:?}", other),
        },
    }
}
