//! Domain error types.

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("missing required input column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("strategy '{name}' is configured more than once")]
    DuplicateStrategy { name: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("invalid window {window} for {kernel}")]
    InvalidWindow { kernel: &'static str, window: usize },

    #[error("kernel backend unavailable: {reason}")]
    KernelBackend { reason: String },

    #[error("strategy '{strategy}' needs feature {feature} which was not generated")]
    MissingFeature { strategy: String, feature: String },

    #[error("feature {feature} of '{strategy}' has {len} rows, expected {expected}")]
    FeatureLength {
        strategy: String,
        feature: String,
        len: usize,
        expected: usize,
    },

    #[error("insufficient data for '{strategy}': {reason}")]
    InsufficientData { strategy: String, reason: String },

    #[error("strategy '{name}' never activates: no position and no defined equity")]
    UnusableStrategy { name: String },

    #[error("no strategy produced an activation point; nothing to compare")]
    NoUsableStrategies,

    #[error("signals of '{strategy}' are misaligned with the price series: {reason}")]
    Alignment { strategy: String, reason: String },

    #[error("backtest has not been run; call run() first")]
    NotRun,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratbenchError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        StratbenchError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        let code: u8 = match err {
            StratbenchError::Io(_) => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. }
            | StratbenchError::MissingColumn { .. }
            | StratbenchError::DuplicateStrategy { .. } => 2,
            StratbenchError::Data { .. } | StratbenchError::InvalidSeries { .. } => 3,
            StratbenchError::MissingFeature { .. }
            | StratbenchError::FeatureLength { .. }
            | StratbenchError::InsufficientData { .. }
            | StratbenchError::UnusableStrategy { .. }
            | StratbenchError::NoUsableStrategies
            | StratbenchError::Alignment { .. }
            | StratbenchError::NotRun => 4,
            StratbenchError::InvalidWindow { .. } | StratbenchError::KernelBackend { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
