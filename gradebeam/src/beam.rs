//! Beam geometry and material properties

use serde::{Deserialize, Serialize};

use crate::error::{GradeBeamError, GradeBeamResult};

/// Properties of the grade beam, in one consistent unit system (e.g. N, mm, MPa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamProperties {
    /// Material name registered with the solver
    pub material: String,
    /// Length L
    pub length: f64,
    /// Width w (also the foundation contact width)
    pub width: f64,
    /// Height h
    pub height: f64,
    /// Elastic modulus E
    pub e: f64,
    /// Cross-sectional area A
    pub area: f64,
    /// Moment of inertia about the local z axis (vertical bending)
    pub iz: f64,
    /// Moment of inertia about the local y axis
    pub iy: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Specific weight
    pub rho: f64,
    /// Polar moment of inertia (torsion constant)
    pub j: f64,
}

impl BeamProperties {
    /// Rectangular beam: A = w*h, Iz = w*h^3/12, Iy = h*w^3/12
    #[allow(clippy::too_many_arguments)]
    pub fn rectangular(
        material: &str,
        length: f64,
        width: f64,
        height: f64,
        e: f64,
        nu: f64,
        rho: f64,
        j: f64,
    ) -> Self {
        Self {
            material: material.to_string(),
            length,
            width,
            height,
            e,
            area: width * height,
            iz: width * height.powi(3) / 12.0,
            iy: height * width.powi(3) / 12.0,
            nu,
            rho,
            j,
        }
    }

    /// Override the moments of inertia
    pub fn with_inertia(mut self, iz: f64, iy: f64) -> Self {
        self.iz = iz;
        self.iy = iy;
        self
    }

    /// Shear modulus G = E / (2 (1 + nu))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Reject geometry the discretization cannot use
    ///
    /// Section and material stiffness are left to the solver, which reports
    /// them as a solver failure.
    pub fn validate(&self) -> GradeBeamResult<()> {
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(GradeBeamError::SolverFailure(format!(
                "beam length must be positive (got {})",
                self.length
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GradeBeamError::SolverFailure(format!(
                "beam width must be positive (got {})",
                self.width
            )));
        }
        Ok(())
    }
}

impl Default for BeamProperties {
    fn default() -> Self {
        Self::rectangular("Concrete", 10000.0, 200.0, 800.0, 24648.0, 0.2, 1e-3, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let beam = BeamProperties::default();
        assert_relative_eq!(beam.area, 160000.0);
        assert_relative_eq!(beam.iz, 200.0 * 800.0_f64.powi(3) / 12.0);
        assert_relative_eq!(beam.iy, 800.0 * 200.0_f64.powi(3) / 12.0);
        assert_relative_eq!(beam.shear_modulus(), 10270.0, max_relative = 1e-12);
    }

    #[test]
    fn test_non_positive_length_is_rejected() {
        let mut beam = BeamProperties::default();
        beam.length = 0.0;
        assert!(matches!(beam.validate(), Err(GradeBeamError::SolverFailure(_))));
    }
}
