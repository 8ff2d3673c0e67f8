//! Error types for the matching pipeline.
//!
//! Every failure a caller may want to react to differently has its own
//! variant: a degenerate corpus can be retried with looser frequency
//! cutoffs, a capacity error needs different bounds, and a solver status
//! means no assignment exists for this run.

use thiserror::Error;

use crate::lp::SolveStatus;
use crate::models::Violation;
use crate::validation::ValidationError;

/// Convenience alias used across the crate.
pub type MatchResult<T> = Result<T, MatchError>;

/// Reasons a corpus cannot produce a meaningful affinity matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    /// A side has fewer than two entities.
    TooFewEntities { side: &'static str, count: usize },
    /// Frequency filtering removed every term.
    EmptyVocabulary { documents: usize },
}

impl std::fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewEntities { side, count } => {
                write!(f, "{side} side has {count} entities, need at least 2")
            }
            Self::EmptyVocabulary { documents } => write!(
                f,
                "vocabulary is empty after frequency filtering over {documents} documents"
            ),
        }
    }
}

/// Errors raised by the matching pipeline.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Insufficient data: {0}")]
    InsufficientData(InsufficientData),

    #[error("Capacity configuration error: {0}")]
    Capacity(String),

    #[error("Solver did not reach an optimal solution: {0}")]
    Solver(SolveStatus),

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Unknown seniority value: <{0}>")]
    UnknownSeniority(String),

    #[error("Unknown timezone: <{0}>")]
    InvalidTimezone(String),

    #[error("Invalid input: {}", format_validation(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("Assignment violates {} constraint(s)", .0.len())]
    BoundsViolated(Vec<Violation>),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<InsufficientData> for MatchError {
    fn from(reason: InsufficientData) -> Self {
        Self::InsufficientData(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err: MatchError = InsufficientData::TooFewEntities {
            side: "left",
            count: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient data: left side has 1 entities, need at least 2"
        );
    }

    #[test]
    fn test_unknown_seniority_names_value() {
        let err = MatchError::UnknownSeniority("Wizard".into());
        assert!(err.to_string().contains("<Wizard>"));
    }
}
