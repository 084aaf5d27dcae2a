//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. The same numeric
//! checks guard [`BacktestConfig`] values built in code.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StratbenchError;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

/// Section names accepted in `[strategies] enabled`.
pub const KNOWN_STRATEGIES: [&str; 6] = [
    "trend_following",
    "mean_reversion",
    "buy_and_hold",
    "momentum",
    "rsi_reversion",
    "classifier",
];

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    let defaults = BacktestConfig::default();
    let values = BacktestConfig {
        initial_capital: config
            .get_number("backtest", "initial_capital")?
            .unwrap_or(defaults.initial_capital),
        fee: config.get_number("backtest", "fee")?.unwrap_or(defaults.fee),
        periods_per_year: config
            .get_number("backtest", "periods_per_year")?
            .unwrap_or(defaults.periods_per_year),
        parallel: config
            .get_flag("backtest", "parallel")?
            .unwrap_or(defaults.parallel),
    };
    validate_run_config(&values)
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    for key in ["dir", "ticker"] {
        match config.get_string("data", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(StratbenchError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                })
            }
        }
    }

    match config.get_string("data", "resample").as_deref().map(str::trim) {
        None | Some("daily") | Some("none") => Ok(()),
        Some(other) => Err(StratbenchError::config_invalid(
            "data",
            "resample",
            format!("expected 'daily' or 'none', got '{}'", other),
        )),
    }
}

/// Validate `[strategies] enabled` and return the enabled names in order.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<Vec<String>, StratbenchError> {
    let enabled = match config.get_string("strategies", "enabled") {
        Some(s) if !s.trim().is_empty() => parse_enabled(&s),
        _ => {
            return Err(StratbenchError::ConfigMissing {
                section: "strategies".to_string(),
                key: "enabled".to_string(),
            })
        }
    };

    let mut seen = HashSet::new();
    for name in &enabled {
        if !KNOWN_STRATEGIES.contains(&name.as_str()) {
            return Err(StratbenchError::config_invalid(
                "strategies",
                "enabled",
                format!("unknown strategy '{}'", name),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(StratbenchError::DuplicateStrategy { name: name.clone() });
        }
    }
    Ok(enabled)
}

/// Split a comma-separated strategy list, dropping blanks.
pub fn parse_enabled(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn validate_run_config(config: &BacktestConfig) -> Result<(), StratbenchError> {
    if !(config.initial_capital > 0.0 && config.initial_capital.is_finite()) {
        return Err(StratbenchError::config_invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    if !(config.fee >= 0.0 && config.fee.is_finite()) {
        return Err(StratbenchError::config_invalid(
            "backtest",
            "fee",
            "fee must be non-negative",
        ));
    }
    if !(config.periods_per_year > 0.0 && config.periods_per_year.is_finite()) {
        return Err(StratbenchError::config_invalid(
            "backtest",
            "periods_per_year",
            "periods_per_year must be positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_backtest_config_passes() {
        let config = make_config(
            r#"
[backtest]
initial_capital = 10000.0
fee = 0.001
periods_per_year = 252
parallel = false
"#,
        );
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn empty_backtest_section_uses_defaults() {
        let config = make_config("[backtest]\n");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn initial_capital_must_be_positive() {
        let config = make_config("[backtest]\ninitial_capital = -100\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn initial_capital_zero_fails() {
        let config = make_config("[backtest]\ninitial_capital = 0\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn negative_fee_fails() {
        let config = make_config("[backtest]\nfee = -0.01\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "fee"));
    }

    #[test]
    fn zero_fee_passes() {
        let config = make_config("[backtest]\nfee = 0\n");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn periods_per_year_must_be_positive() {
        let config = make_config("[backtest]\nperiods_per_year = 0\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "periods_per_year")
        );
    }

    #[test]
    fn non_numeric_value_fails() {
        let config = make_config("[backtest]\nfee = cheap\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "fee"));
    }

    #[test]
    fn non_boolean_parallel_fails() {
        let config = make_config("[backtest]\nparallel = sometimes\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "parallel"));
    }

    #[test]
    fn valid_data_config_passes() {
        let config = make_config("[data]\ndir = data\nticker = BTC\nresample = daily\n");
        assert!(validate_data_config(&config).is_ok());
    }

    #[test]
    fn missing_ticker_fails() {
        let config = make_config("[data]\ndir = data\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigMissing { key, .. } if key == "ticker"));
    }

    #[test]
    fn unknown_resample_fails() {
        let config = make_config("[data]\ndir = data\nticker = BTC\nresample = hourly\n");
        let err = validate_data_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigInvalid { key, .. } if key == "resample"));
    }

    #[test]
    fn enabled_strategies_in_order() {
        let config =
            make_config("[strategies]\nenabled = momentum, Buy_And_Hold ,, trend_following\n");
        assert_eq!(
            validate_strategy_config(&config).unwrap(),
            vec!["momentum", "buy_and_hold", "trend_following"]
        );
    }

    #[test]
    fn missing_enabled_fails() {
        let config = make_config("[strategies]\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigMissing { key, .. } if key == "enabled"));
    }

    #[test]
    fn unknown_strategy_fails() {
        let config = make_config("[strategies]\nenabled = momentum, martingale\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(err.to_string().contains("martingale"));
    }

    #[test]
    fn duplicate_strategy_fails() {
        let config = make_config("[strategies]\nenabled = momentum, momentum\n");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, StratbenchError::DuplicateStrategy { name } if name == "momentum"));
    }

    #[test]
    fn run_config_rejects_nan() {
        let config = BacktestConfig {
            initial_capital: f64::NAN,
            ..BacktestConfig::default()
        };
        assert!(validate_run_config(&config).is_err());
    }
}
