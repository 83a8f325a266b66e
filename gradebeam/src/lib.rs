//! Grade Beam - spring reactions of a grade beam on an elastic foundation
//!
//! The subgrade is lumped into equally spaced vertical springs under a single
//! frame member. For each subgrade modulus in a sweep the model is rebuilt,
//! solved with `fea_solver`, and the spring reactions are collected:
//! - Comma-separated list parsing with field-scoped errors
//! - Spring discretization (k = k_s * w * L / n)
//! - Model building and linear static solve per modulus
//! - Sequential or parallel sweeps with partial results
//!
//! ## Example
//! ```rust
//! use gradebeam::prelude::*;
//!
//! let beam = BeamProperties::default();
//! let loads = LoadSet::new().with_point_load(10000.0, 5000.0);
//!
//! let table = run_sweep(&beam, &[0.5, 1.0, 5.0], 11, &loads);
//! for row in table.successes() {
//!     let reactions = row.reactions().unwrap();
//!     assert!((reactions.total() - 10000.0).abs() < 1.0);
//! }
//! ```

pub mod beam;
pub mod builder;
pub mod error;
pub mod foundation;
pub mod input;
pub mod loads;
pub mod request;
pub mod sweep;

// Re-export common types
pub mod prelude {
    pub use crate::beam::BeamProperties;
    pub use crate::builder::{build_and_solve, build_model, solve, SpringReactions};
    pub use crate::error::{GradeBeamError, GradeBeamResult};
    pub use crate::foundation::{DiscretizedModel, FoundationSpec};
    pub use crate::input::{format_numeric_list, parse_numeric_list, parse_optional_list};
    pub use crate::loads::{DistributedLoad, LoadSet, PointLoad, PointMoment};
    pub use crate::request::{SweepInput, SweepRequest};
    pub use crate::sweep::{
        run_sweep, run_sweep_with, ReactionTable, RowOutcome, SweepOptions, SweepRow,
    };
}
