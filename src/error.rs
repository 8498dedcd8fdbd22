use thiserror::Error;

/// Errors surfaced across the detection/merge/score core.
///
/// Only the per-call fatal kinds are ever returned from a public function;
/// detector-level failures are recovered and recorded on `DetectionResult`
/// instead (see `crate::orchestrator`).
#[derive(Debug, Error)]
pub enum OpenRiskError {
    #[error("input size ({size} chars) exceeds configured maximum ({max} chars)")]
    InputTooLarge { size: usize, max: usize },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("malformed label set: {reason}")]
    MalformedLabelSet { reason: String },
}

pub type Result<T> = std::result::Result<T, OpenRiskError>;
