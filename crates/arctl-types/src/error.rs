// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for the controller kernel.
///
/// Only configuration problems surface as errors. Metric anomalies and
/// clock skew are absorbed inside `step`, and FALLBACK is a state, not
/// an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArctlError {
    /// A configuration parameter is out of range or inconsistent.
    #[error("invalid parameter `{name}`: {detail}")]
    InvalidParameter { name: &'static str, detail: String },

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl ArctlError {
    pub(crate) fn invalid(name: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            detail: detail.into(),
        }
    }
}

pub type ArctlResult<T> = Result<T, ArctlError>;
