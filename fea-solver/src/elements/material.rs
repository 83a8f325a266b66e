//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Material properties for structural analysis
///
/// Units are whatever the caller uses consistently (e.g. MPa with mm and N).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Specific weight / density
    pub rho: f64,
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self { e, g, nu, rho }
    }

    /// Create a new isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Create a standard steel material in SI units (Pa, kg/m³)
    pub fn steel() -> Self {
        Self::new(200e9, 77e9, 0.3, 7850.0)
    }

    /// Reject properties that would make the stiffness matrix meaningless
    pub fn validate(&self, name: &str) -> FEAResult<()> {
        if !(self.e > 0.0 && self.e.is_finite()) {
            return Err(FEAError::InvalidInput(format!(
                "material '{}' must have a positive elastic modulus (got {})",
                name, self.e
            )));
        }
        if !(self.g > 0.0 && self.g.is_finite()) {
            return Err(FEAError::InvalidInput(format!(
                "material '{}' must have a positive shear modulus (got {})",
                name, self.g
            )));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isotropic_material() {
        let mat = Material::isotropic(200e9, 0.3, 7850.0);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.g - expected_g).abs() < 1.0);
    }

    #[test]
    fn test_concrete_shear_modulus() {
        let mat = Material::isotropic(24648.0, 0.2, 1e-3);
        assert!((mat.g - 10270.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_zero_modulus() {
        let mat = Material::isotropic(0.0, 0.2, 1e-3);
        assert!(matches!(mat.validate("Bad"), Err(FEAError::InvalidInput(_))));
        assert!(Material::steel().validate("Steel").is_ok());
    }
}
