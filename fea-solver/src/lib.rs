//! FEA Solver - A native Rust 3D frame analysis library
//!
//! This library provides a 3D structural analysis framework inspired by PyNite,
//! focused on frames supported by rigid restraints and elastic springs:
//! - Physical frame members, automatically split at intermediate nodes
//! - Nodal supports with optional linear elastic springs per DOF
//! - Member point loads, point moments and linearly varying distributed loads
//! - Linear static analysis (dense or skyline sparse Cholesky)
//! - Reactions, member end forces and a global statics check
//!
//! ## Example
//! ```rust
//! use fea_solver::prelude::*;
//!
//! let mut model = FEModel::new();
//!
//! // Add material and section
//! model.add_material("Steel", Material::new(200e9, 77e9, 0.3, 7850.0)).unwrap();
//! model.add_section("W12x26", Section::new(7.65e-3, 204e-6, 17.3e-6, 0.3e-6)).unwrap();
//!
//! // Add nodes
//! model.add_node("N1", Node::new(0.0, 0.0, 0.0)).unwrap();
//! model.add_node("N2", Node::new(10.0, 0.0, 0.0)).unwrap();
//!
//! // Add member
//! model.add_member("M1", Member::new("N1", "N2", "Steel", "W12x26")).unwrap();
//!
//! // Add supports
//! model.add_support("N1", Support::fixed()).unwrap();
//!
//! // Add loads
//! model.add_node_load("N2", NodeLoad::force(0.0, -10000.0, 0.0, "Case 1")).unwrap();
//!
//! // Analyze
//! model.analyze_linear().unwrap();
//!
//! // Get results
//! let displacement = model.node_displacement("N2", "Combo 1").unwrap();
//! assert!(displacement.dy < 0.0);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::elements::{Dof, Material, Member, Node, Section, Support};
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::{
        DistributedLoad, LoadCombination, LoadDirection, NodeLoad, PointLoad,
    };
    pub use crate::model::FEModel;
    pub use crate::results::{
        MemberForces, NodeDisplacement, Reactions, StaticsCheck,
    };
}
