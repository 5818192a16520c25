use thiserror::Error;

/// Failure kinds surfaced by the prediction pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A feed could not be read. Callers substitute an empty/default value.
    #[error("{source_name} unavailable: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// The team has no qualifying offensive plays, so there is no latest rolling value.
    #[error("insufficient data: no qualifying pass/rush plays with EPA for {team}")]
    InsufficientData { team: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub fn unavailable(source_name: &str, reason: impl std::fmt::Display) -> Self {
        Self::DataUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
