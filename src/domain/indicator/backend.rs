//! Process-wide kernel backend handle.
//!
//! The backend is chosen once, on first use, from the
//! `STRATBENCH_KERNEL_BACKEND` environment variable:
//!
//! - unset, empty or `streaming`: O(n) running-sum kernels (default)
//! - `reference`: window-by-window recomputation, for cross-checking
//!
//! Any other value is a load failure. The failure is logged once and every
//! later call to [`KernelBackend::global`] returns the same error; there is no
//! partially initialized state.

use super::{drawdown, ema, rsi, sma, stddev};
use crate::domain::error::StratbenchError;
use std::sync::OnceLock;

pub const BACKEND_ENV: &str = "STRATBENCH_KERNEL_BACKEND";

type Slot = OnceLock<Result<KernelBackend, String>>;

static GLOBAL: Slot = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Streaming,
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelBackend {
    kind: BackendKind,
}

impl KernelBackend {
    pub const fn new(kind: BackendKind) -> Self {
        Self { kind }
    }

    /// The shared handle, loading it on first call.
    pub fn global() -> Result<&'static KernelBackend, StratbenchError> {
        Self::cached(&GLOBAL, || {
            Self::load(std::env::var(BACKEND_ENV).ok().as_deref())
        })
    }

    /// Run `init` at most once per `slot` and hand out its outcome, success
    /// or failure, on every call.
    fn cached(
        slot: &Slot,
        init: impl FnOnce() -> Result<KernelBackend, String>,
    ) -> Result<&KernelBackend, StratbenchError> {
        slot.get_or_init(|| {
            let loaded = init();
            match &loaded {
                Ok(backend) => tracing::debug!(kind = ?backend.kind, "kernel backend loaded"),
                Err(reason) => tracing::error!(%reason, "kernel backend failed to load"),
            }
            loaded
        })
        .as_ref()
        .map_err(|reason| StratbenchError::KernelBackend {
            reason: reason.clone(),
        })
    }

    /// Resolve a backend by name; `None` selects the default.
    pub fn load(name: Option<&str>) -> Result<KernelBackend, String> {
        match name.map(str::trim) {
            None | Some("") | Some("streaming") => Ok(Self::new(BackendKind::Streaming)),
            Some("reference") => Ok(Self::new(BackendKind::Reference)),
            Some(other) => Err(format!(
                "unknown kernel backend '{}' in {} (expected 'streaming' or 'reference')",
                other, BACKEND_ENV
            )),
        }
    }

    pub fn sma(&self, data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
        match self.kind {
            BackendKind::Streaming => sma::sma(data, window),
            BackendKind::Reference => sma::sma_reference(data, window),
        }
    }

    pub fn ema(&self, data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
        ema::ema(data, window)
    }

    pub fn rsi(&self, data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
        rsi::rsi(data, window)
    }

    pub fn stddev(&self, data: &[f64], window: usize) -> Result<Vec<f64>, StratbenchError> {
        match self.kind {
            BackendKind::Streaming => stddev::stddev(data, window),
            BackendKind::Reference => stddev::stddev_reference(data, window),
        }
    }

    pub fn max_drawdown(&self, data: &[f64]) -> Vec<f64> {
        drawdown::max_drawdown(data)
    }
}
