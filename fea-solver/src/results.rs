//! Result types read back from a solved model
//!
//! Displacements and reactions are in global axes. Member end forces are in
//! the member's local axes with a beam sign convention.

use serde::{Deserialize, Serialize};

/// Translations and rotations of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl From<[f64; 6]> for NodeDisplacement {
    fn from([dx, dy, dz, rx, ry, rz]: [f64; 6]) -> Self {
        Self { dx, dy, dz, rx, ry, rz }
    }
}

impl NodeDisplacement {
    pub fn translation(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// Forces and moments a support exerts on its node
///
/// On a spring DOF this is the spring force, -k * d.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl From<[f64; 6]> for Reactions {
    fn from([fx, fy, fz, mx, my, mz]: [f64; 6]) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }
}

impl Reactions {
    pub fn force(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }
}

/// Internal forces at one end of a member
///
/// Axial is positive in tension. At the i-end the local end forces are
/// negated so both ends read with the same sign for the same internal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    pub axial: f64,
    pub shear_y: f64,
    pub shear_z: f64,
    pub torsion: f64,
    pub moment_y: f64,
    pub moment_z: f64,
}

impl MemberForces {
    /// From the first six entries of a local end-force vector
    pub fn at_i_end(forces: &[f64; 12]) -> Self {
        Self {
            axial: -forces[0],
            shear_y: forces[1],
            shear_z: forces[2],
            torsion: -forces[3],
            moment_y: forces[4],
            moment_z: forces[5],
        }
    }

    /// From the last six entries of a local end-force vector
    pub fn at_j_end(forces: &[f64; 12]) -> Self {
        Self {
            axial: forces[6],
            shear_y: -forces[7],
            shear_z: -forces[8],
            torsion: forces[9],
            moment_y: forces[10],
            moment_z: forces[11],
        }
    }
}

/// Global force balance for one load combination
///
/// `applied` is the resultant of every nodal and member load, `reactions`
/// the resultant of every support and spring reaction, both as [FX, FY, FZ].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StaticsCheck {
    pub applied: [f64; 3],
    pub reactions: [f64; 3],
}

impl StaticsCheck {
    /// Residual force per global axis (zero when in equilibrium)
    pub fn residual(&self) -> [f64; 3] {
        [
            self.applied[0] + self.reactions[0],
            self.applied[1] + self.reactions[1],
            self.applied[2] + self.reactions[2],
        ]
    }

    /// True when every residual is within `tolerance` of the applied load scale
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        let scale = self
            .applied
            .iter()
            .chain(self.reactions.iter())
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));
        self.residual().iter().all(|r| r.abs() <= tolerance * scale)
    }
}

/// Extremes and model size for one load combination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub max_displacement: f64,
    pub max_disp_node: String,
    pub max_reaction: f64,
    pub max_reaction_node: String,
    /// Largest end bending moment over all sub-elements
    pub max_moment: f64,
    pub max_moment_member: String,
    pub num_nodes: usize,
    pub num_members: usize,
    /// Sub-elements after splitting members at on-axis nodes
    pub num_segments: usize,
    pub total_dofs: usize,
    pub free_dofs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statics_balance() {
        let check = StaticsCheck {
            applied: [0.0, -27600.0, 0.0],
            reactions: [0.0, 27600.0 + 1e-4, 0.0],
        };
        assert!(check.is_balanced(1e-6));
        assert!(!check.is_balanced(1e-12));
    }

    #[test]
    fn test_member_forces_sign_flip() {
        let mut forces = [0.0; 12];
        forces[1] = 5.0;
        forces[7] = -5.0;
        assert_eq!(MemberForces::at_i_end(&forces).shear_y, 5.0);
        assert_eq!(MemberForces::at_j_end(&forces).shear_y, 5.0);
    }

    #[test]
    fn test_reactions_from_array() {
        let r = Reactions::from([0.0, 3.0, 4.0, 0.0, 0.0, 1.0]);
        assert_eq!(r.fy, 3.0);
        assert_eq!(r.force(), 5.0);
    }
}
