//! Grade beam model builder
//!
//! Turns a beam, a spring discretization and a load set into a frame model:
//! one member from the first node to the last, every node restrained in
//! DX, DZ and RX and carried by a vertical spring. The solver splits the
//! member at each intermediate node.

use fea_solver::loads as fea_loads;
use fea_solver::prelude::{
    AnalysisOptions, Dof, FEModel, LoadCombination, LoadDirection, Material, Member, Node,
    Section, Support,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::beam::BeamProperties;
use crate::error::GradeBeamResult;
use crate::foundation::{DiscretizedModel, FoundationSpec};
use crate::loads::LoadSet;

/// Load case and combination name used for every grade beam model
pub const LOAD_COMBO: &str = "LC";
/// Name of the beam member
pub const MEMBER: &str = "M1";
const SECTION: &str = "GradeBeam";
/// Relative force imbalance reported as a warning
const STATICS_TOLERANCE: f64 = 1e-6;

/// Spring reactions of one solved model, ordered by increasing x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringReactions {
    /// Node names
    pub nodes: Vec<String>,
    /// Node x positions
    pub positions: Vec<f64>,
    /// Vertical spring force on the beam, positive up, rounded to one decimal
    pub reactions: Vec<f64>,
    /// Vertical nodal displacement, positive up
    pub settlements: Vec<f64>,
    /// Spring stiffness at each node
    pub spring_stiffness: Vec<f64>,
}

impl SpringReactions {
    /// Sum of the reported reactions
    pub fn total(&self) -> f64 {
        self.reactions.iter().sum()
    }

    /// Index and value of the largest reaction by magnitude
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.reactions
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }
}

/// Build the frame model for one discretization
pub fn build_model(
    beam: &BeamProperties,
    springs: &DiscretizedModel,
    loads: &LoadSet,
) -> GradeBeamResult<FEModel> {
    loads.validate(beam.length)?;

    let mut model = FEModel::new();
    model.add_material(
        &beam.material,
        Material::new(beam.e, beam.shear_modulus(), beam.nu, beam.rho),
    )?;
    model.add_section(SECTION, Section::new(beam.area, beam.iy, beam.iz, beam.j))?;

    for ((name, &x), &k) in springs.nodes.iter().zip(&springs.positions).zip(&springs.stiffnesses) {
        model.add_node(name, Node::new(x, 0.0, 0.0))?;
        model.add_support(
            name,
            Support::with_restraints(true, false, true, true, false, false).with_spring(Dof::DY, k),
        )?;
    }

    model.add_member(
        MEMBER,
        Member::new(springs.first_node(), springs.last_node(), &beam.material, SECTION),
    )?;
    model.add_load_combo(LoadCombination::single(LOAD_COMBO, LOAD_COMBO))?;

    // "+down" loads act along negative local y
    for p in &loads.point_loads {
        model.add_member_point_load(
            MEMBER,
            fea_loads::PointLoad::new(-p.magnitude, p.location, LoadDirection::Fy, LOAD_COMBO),
        )?;
    }
    for m in &loads.point_moments {
        model.add_member_point_load(
            MEMBER,
            fea_loads::PointLoad::moment_z(m.magnitude, m.location, LOAD_COMBO),
        )?;
    }
    for w in &loads.distributed_loads {
        model.add_member_dist_load(
            MEMBER,
            fea_loads::DistributedLoad::new(-w.w1, -w.w2, w.x1, w.x2, LoadDirection::Fy, LOAD_COMBO),
        )?;
    }

    Ok(model)
}

/// Solve a discretized grade beam and read the spring reactions
pub fn solve(
    beam: &BeamProperties,
    springs: &DiscretizedModel,
    loads: &LoadSet,
) -> GradeBeamResult<SpringReactions> {
    let mut model = build_model(beam, springs, loads)?;
    model.analyze(AnalysisOptions::linear())?;

    let statics = model.statics_check(LOAD_COMBO)?;
    if !statics.is_balanced(STATICS_TOLERANCE) {
        warn!(
            "Spring reactions miss the applied load by {:?} on {} springs",
            statics.residual(),
            springs.len()
        );
    }

    let mut reactions = Vec::with_capacity(springs.len());
    let mut settlements = Vec::with_capacity(springs.len());
    for name in &springs.nodes {
        reactions.push(round_to_tenth(model.node_reactions(name, LOAD_COMBO)?.fy));
        settlements.push(model.node_displacement(name, LOAD_COMBO)?.dy);
    }
    debug!("Solved {} springs, reactions {:?}", springs.len(), reactions);

    Ok(SpringReactions {
        nodes: springs.nodes.clone(),
        positions: springs.positions.clone(),
        reactions,
        settlements,
        spring_stiffness: springs.stiffnesses.clone(),
    })
}

/// Build and solve a grade beam on `n_springs` equal springs for one modulus
pub fn build_and_solve(
    beam: &BeamProperties,
    subgrade_modulus: f64,
    n_springs: usize,
    loads: &LoadSet,
) -> GradeBeamResult<SpringReactions> {
    let foundation = FoundationSpec::new(subgrade_modulus, n_springs);
    let springs = DiscretizedModel::uniform(beam, &foundation)?;
    solve(beam, &springs, loads)
}

/// Round to one decimal; -0.0 comes out as 0.0
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeBeamError;

    #[test]
    fn test_model_layout() {
        let beam = BeamProperties::default();
        let springs = DiscretizedModel::uniform(&beam, &FoundationSpec::new(1.0, 5)).unwrap();
        let loads = LoadSet::new().with_point_load(1000.0, 2500.0);
        let model = build_model(&beam, &springs, &loads).unwrap();

        assert_eq!(model.node_names(), ["node1", "node2", "node3", "node4", "node5"]);
        assert_eq!(model.members[MEMBER].j_node, "node5");
        let support = model.supports["node3"];
        assert!(support.dx && support.dz && support.rx);
        assert!(!support.dy && !support.ry && !support.rz);
        assert_eq!(support.spring(Dof::DY), Some(400000.0));
        assert_eq!(model.member_point_loads[MEMBER][0].magnitude, -1000.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_tenth(1234.56), 1234.6);
        assert_eq!(round_to_tenth(-0.04), 0.0);
        assert!(round_to_tenth(-0.04).is_sign_positive());
        assert_eq!(round_to_tenth(-1234.56), -1234.6);
        assert_eq!(format!("{}", round_to_tenth(-1e-9)), "0");
    }

    #[test]
    fn test_out_of_range_load_is_invalid_input() {
        let beam = BeamProperties::default();
        let loads = LoadSet::new().with_point_load(1.0, 10001.0);
        let err = build_and_solve(&beam, 1.0, 10, &loads).unwrap_err();
        assert!(matches!(err, GradeBeamError::InvalidInput { .. }));
    }

    #[test]
    fn test_bad_section_is_solver_failure() {
        let beam = BeamProperties::default().with_inertia(0.0, 1.0);
        let loads = LoadSet::new().with_point_load(1.0, 5000.0);
        let err = build_and_solve(&beam, 1.0, 10, &loads).unwrap_err();
        assert!(matches!(err, GradeBeamError::SolverFailure(_)), "got {err}");
    }
}
