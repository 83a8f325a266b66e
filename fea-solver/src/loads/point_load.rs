//! Point loads on members

use serde::{Deserialize, Serialize};

/// Direction of a member load
///
/// Lower-case variants are in member-local axes, upper-case in global axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum LoadDirection {
    /// Force in member's local x direction (axial)
    Fx,
    /// Force in member's local y direction
    Fy,
    /// Force in member's local z direction
    Fz,
    /// Moment about member's local x axis (torsion)
    Mx,
    /// Moment about member's local y axis
    My,
    /// Moment about member's local z axis
    Mz,
    /// Force in global X direction
    FX,
    /// Force in global Y direction
    FY,
    /// Force in global Z direction
    FZ,
    /// Moment about global X axis
    MX,
    /// Moment about global Y axis
    MY,
    /// Moment about global Z axis
    MZ,
}

impl LoadDirection {
    /// Check if this direction is in member-local coordinates
    pub fn is_local(self) -> bool {
        matches!(
            self,
            Self::Fx | Self::Fy | Self::Fz | Self::Mx | Self::My | Self::Mz
        )
    }

    /// Check if this direction is a moment rather than a force
    pub fn is_moment(self) -> bool {
        matches!(
            self,
            Self::Mx | Self::My | Self::Mz | Self::MX | Self::MY | Self::MZ
        )
    }

    /// Axis index (0 = x, 1 = y, 2 = z) in the direction's own coordinate system
    pub fn axis(self) -> usize {
        match self {
            Self::Fx | Self::Mx | Self::FX | Self::MX => 0,
            Self::Fy | Self::My | Self::FY | Self::MY => 1,
            Self::Fz | Self::Mz | Self::FZ | Self::MZ => 2,
        }
    }
}

/// A concentrated force or moment on a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLoad {
    /// Load magnitude
    pub magnitude: f64,
    /// Distance from i-node
    pub position: f64,
    /// Load direction
    pub direction: LoadDirection,
    /// Load case
    pub case: String,
}

impl PointLoad {
    /// Create a new point load
    pub fn new(magnitude: f64, position: f64, direction: LoadDirection, case: &str) -> Self {
        Self {
            magnitude,
            position,
            direction,
            case: case.to_string(),
        }
    }

    /// Create a downward (negative Y) point load in global coordinates
    pub fn downward(magnitude: f64, position: f64, case: &str) -> Self {
        Self::new(-magnitude.abs(), position, LoadDirection::FY, case)
    }

    /// Create a concentrated moment about the member's local z axis
    pub fn moment_z(magnitude: f64, position: f64, case: &str) -> Self {
        Self::new(magnitude, position, LoadDirection::Mz, case)
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            ..self.clone()
        }
    }
}
