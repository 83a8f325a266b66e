//! Error types for FEA Solver

use thiserror::Error;

/// Main error type for FEA operations
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Member '{0}' not found in model")]
    MemberNotFound(String),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Load combination '{0}' not found in model")]
    LoadCombinationNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Model is unstable: {0}")]
    Unstable(String),

    #[error("Singular stiffness matrix at node '{node}' ({dof}) - model may be unstable or have insufficient supports")]
    SingularMatrix { node: String, dof: String },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Model not analyzed - run analyze() first")]
    NotAnalyzed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FEAError {
    /// True when the failure comes from the stiffness system itself
    /// (missing supports, rigid-body modes) rather than from bad input.
    pub fn is_instability(&self) -> bool {
        matches!(self, Self::Unstable(_) | Self::SingularMatrix { .. })
    }
}

/// Result type for FEA operations
pub type FEAResult<T> = Result<T, FEAError>;
