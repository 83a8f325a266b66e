//! Error types for grade beam analysis
//!
//! Parsing errors are scoped to the input field they came from. Solve errors
//! are scoped to one subgrade modulus, so a sweep can keep the rows that
//! succeeded.

use fea_solver::error::FEAError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for grade beam operations
pub type GradeBeamResult<T> = Result<T, GradeBeamError>;

/// Structured error type for grade beam operations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GradeBeamError {
    /// A comma-separated numeric list contains a token that is not a finite number
    #[error("Malformed list for '{field}': token {position} ({token:?}) is not a number")]
    MalformedNumericList {
        field: String,
        /// 1-based token position
        position: usize,
        token: String,
    },

    /// Load magnitudes and locations do not pair up
    #[error(
        "'{magnitudes_field}' has {magnitudes} value(s) but '{locations_field}' has {locations}"
    )]
    InsufficientLoadPairing {
        magnitudes_field: String,
        locations_field: String,
        magnitudes: usize,
        locations: usize,
    },

    /// A parsed value is out of range or incomplete
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// The stiffness system is singular or the model cannot be built
    #[error("Ill-posed model: {0}")]
    IllPosedModel(String),

    /// Any other solver failure
    #[error("Solver failure: {0}")]
    SolverFailure(String),
}

impl GradeBeamError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<FEAError> for GradeBeamError {
    fn from(err: FEAError) -> Self {
        if err.is_instability() {
            Self::IllPosedModel(err.to_string())
        } else {
            Self::SolverFailure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_errors_are_classified() {
        let singular = FEAError::SingularMatrix {
            node: "node3".to_string(),
            dof: "DY".to_string(),
        };
        assert!(matches!(GradeBeamError::from(singular), GradeBeamError::IllPosedModel(_)));

        let bad_section = FEAError::InvalidInput("section 'GB' must have a positive Iz".to_string());
        assert!(matches!(GradeBeamError::from(bad_section), GradeBeamError::SolverFailure(_)));
    }

    #[test]
    fn test_error_serializes_with_tag() {
        let err = GradeBeamError::MalformedNumericList {
            field: "subgrade_moduli".to_string(),
            position: 2,
            token: "abc".to_string(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "MalformedNumericList");
        assert_eq!(json["details"]["position"], 2);
    }
}
