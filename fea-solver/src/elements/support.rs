//! Support conditions and elastic springs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six nodal degrees of freedom, in global axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dof {
    DX,
    DY,
    DZ,
    RX,
    RY,
    RZ,
}

impl Dof {
    /// All DOFs in solver order
    pub const ALL: [Dof; 6] = [Dof::DX, Dof::DY, Dof::DZ, Dof::RX, Dof::RY, Dof::RZ];

    /// Offset of this DOF within a node's 6-DOF block
    pub fn index(self) -> usize {
        match self {
            Dof::DX => 0,
            Dof::DY => 1,
            Dof::DZ => 2,
            Dof::RX => 3,
            Dof::RY => 4,
            Dof::RZ => 5,
        }
    }
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dof::DX => "DX",
            Dof::DY => "DY",
            Dof::DZ => "DZ",
            Dof::RX => "RX",
            Dof::RY => "RY",
            Dof::RZ => "RZ",
        };
        f.write_str(label)
    }
}

/// Support conditions at a node
///
/// A DOF is either rigidly restrained, held by a linear elastic spring,
/// or free. Springs act in both directions; a spring on a restrained DOF
/// has no effect.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
    /// Spring stiffness per DOF [DX, DY, DZ, RX, RY, RZ]
    pub springs: [Option<f64>; 6],
}

impl Support {
    /// Create a new support with no restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self::with_restraints(true, true, true, true, true, true)
    }

    /// Create a pinned support (translations restrained, rotations free)
    pub fn pinned() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Create a support with specific restraints
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
            springs: [None; 6],
        }
    }

    /// Attach a linear elastic spring to a DOF
    pub fn with_spring(mut self, dof: Dof, stiffness: f64) -> Self {
        self.springs[dof.index()] = Some(stiffness);
        self
    }

    /// Restraint flags as [DX, DY, DZ, RX, RY, RZ]
    pub fn restraints(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Spring stiffness on a DOF, if any
    pub fn spring(&self, dof: Dof) -> Option<f64> {
        self.springs[dof.index()]
    }

    /// Get list of restrained DOF indices (0-5)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.restraints()
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| r.then_some(i))
            .collect()
    }

    /// DOF indices carrying a spring on an otherwise free DOF
    pub fn spring_dofs(&self) -> Vec<usize> {
        let restraints = self.restraints();
        (0..6)
            .filter(|&i| !restraints[i] && self.springs[i].is_some())
            .collect()
    }

    /// Check if any DOF is restrained or sprung
    pub fn is_supported(&self) -> bool {
        self.restraints().iter().any(|&r| r) || self.springs.iter().any(Option::is_some)
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.restrained_dofs().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let support = Support::fixed();
        assert_eq!(support.num_restrained(), 6);
        assert!(support.spring_dofs().is_empty());
    }

    #[test]
    fn test_pinned_support() {
        let support = Support::pinned();
        assert!(support.dx && support.dy && support.dz);
        assert!(!support.rx && !support.ry && !support.rz);
        assert_eq!(support.num_restrained(), 3);
    }

    #[test]
    fn test_spring_on_free_dof() {
        let support = Support::with_restraints(true, false, true, true, false, false)
            .with_spring(Dof::DY, 2.0e5);
        assert_eq!(support.spring(Dof::DY), Some(2.0e5));
        assert_eq!(support.spring_dofs(), vec![1]);
        assert!(support.is_supported());
    }

    #[test]
    fn test_spring_on_restrained_dof_is_ignored() {
        let support = Support::pinned().with_spring(Dof::DY, 10.0);
        assert!(support.spring_dofs().is_empty());
    }

    #[test]
    fn test_zero_stiffness_spring_still_counts_as_support() {
        let support = Support::new().with_spring(Dof::DY, 0.0);
        assert!(support.is_supported());
        assert_eq!(Dof::DY.to_string(), "DY");
    }
}
