//! Analysis options

use serde::{Deserialize, Serialize};

/// Options for linear static analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Check for unsupported DOFs before solving
    pub check_stability: bool,
    /// Check static equilibrium after analysis
    pub check_statics: bool,
    /// Use the skyline sparse solver instead of a dense factorization
    pub sparse: bool,
    /// Smallest accepted Cholesky pivot, relative to the DOF's own diagonal term
    pub pivot_tolerance: f64,
    /// Relative tolerance used by the statics check
    pub statics_tolerance: f64,
    /// Load combination tags to analyze (None = all)
    pub combo_tags: Option<Vec<String>>,
    /// Enable logging/progress output
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            check_stability: true,
            check_statics: false,
            sparse: true,
            pivot_tolerance: 1e-10,
            statics_tolerance: 1e-6,
            combo_tags: None,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Create options for linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Solve with a dense Cholesky factorization
    pub fn dense(mut self) -> Self {
        self.sparse = false;
        self
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Enable the post-solve statics check
    pub fn with_statics_check(mut self) -> Self {
        self.check_statics = true;
        self
    }

    /// Set the relative pivot tolerance used to flag singular systems
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Filter by combo tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.combo_tags = Some(tags);
        self
    }
}
