use kson_model::SchemaError;
use thiserror::Error;

/// Fatal conversion failure. Line numbers are 1-indexed and point at the
/// bar line that opens the offending measure.
#[derive(Debug, Error)]
pub enum KshError {
    #[error("Invalid time signature \"{value}\" in header")]
    HeaderTimeSignature { value: String },

    #[error("Invalid time signature \"{value}\" for measure on line {line}")]
    TimeSignature { line: usize, value: String },

    /// The time signature does not split a whole note into whole pulses
    #[error("Invalid time signature for measure on line {line}")]
    MeasureLength { line: usize },

    /// The measure's chart lines do not split it into whole pulses
    #[error("Invalid measure length for measure on line {line}")]
    LineSpacing { line: usize, lines: usize },

    #[error("Converted chart failed validation: {0}")]
    Schema(#[from] SchemaError),
}

impl KshError {
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TimeSignature { line, .. }
            | Self::MeasureLength { line }
            | Self::LineSpacing { line, .. } => Some(*line),
            Self::HeaderTimeSignature { .. } | Self::Schema(_) => None,
        }
    }
}
