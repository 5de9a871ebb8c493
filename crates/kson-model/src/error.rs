use thiserror::Error;

/// Validation failure for a KSON document. Validation stops at the first violation.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{path}: missing required field")]
    MissingField { path: String },

    #[error("{path}: expected {expected}")]
    Mismatch { path: String, expected: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Rendered location of the offending field (`beat.bpm[0][1]`), if the error has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path } | Self::Mismatch { path, .. } => Some(path),
            Self::Json(_) => None,
        }
    }
}
