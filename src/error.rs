//! Error types for the transcription pipeline

use std::fmt;

/// Errors that can occur during transcription
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Onset/pitch arrays or grid-time lengths disagree
    InputShapeMismatch(String),

    /// No tempo or beat could be derived, so no grid can be built
    TempoDetectionFailure(String),

    /// No positive affinity survived thresholding.
    ///
    /// The pipeline recovers from this by running without motifs.
    DegenerateMotifInput(String),

    /// A required separation output (stem file) is missing
    EmptySeparationOutput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// Numerical error (overflow, underflow, etc.)
    NumericalError(String),
}

impl AnalysisError {
    /// Whether the pipeline must abort on this error.
    ///
    /// Only degenerate motif input is recovered locally.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AnalysisError::DegenerateMotifInput(_))
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::InputShapeMismatch(msg) => write!(f, "Input shape mismatch: {}", msg),
            AnalysisError::TempoDetectionFailure(msg) => {
                write!(f, "Tempo detection failure: {}", msg)
            }
            AnalysisError::DegenerateMotifInput(msg) => {
                write!(f, "Degenerate motif input: {}", msg)
            }
            AnalysisError::EmptySeparationOutput(msg) => {
                write!(f, "Empty separation output: {}", msg)
            }
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_degenerate_motif_is_recoverable() {
        assert!(!AnalysisError::DegenerateMotifInput("no links".into()).is_fatal());
        assert!(AnalysisError::TempoDetectionFailure("none".into()).is_fatal());
        assert!(AnalysisError::InputShapeMismatch("2 vs 3".into()).is_fatal());
    }

    #[test]
    fn test_display_prefix() {
        let err = AnalysisError::EmptySeparationOutput("vocals".into());
        assert_eq!(err.to_string(), "Empty separation output: vocals");
    }
}
