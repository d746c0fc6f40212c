//! Error type shared by the library, the CLI and the Python bindings

use thiserror::Error;

/// Everything that can go wrong between reading a config and producing a prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Input rejected at the validation boundary before any math runs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The blended damage per hit is zero or negative, so no number of hits kills.
    #[error("damage per hit must be positive, got {0:.4}")]
    NonPositiveDamage(f64),

    /// The success recurrence left [0, 1] or stopped being finite.
    #[error("success recurrence is unstable for multiplier {multiplier} starting at {start}: reached {value}")]
    NumericInstability {
        multiplier: f64,
        start: f64,
        value: f64,
    },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl PredictError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        PredictError::InvalidInput(msg.into())
    }

    /// True for errors caused by the caller's numbers rather than I/O or parsing.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PredictError::InvalidInput(_) | PredictError::NonPositiveDamage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PredictError>;
