//! Section properties for frame elements

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area
    pub a: f64,
    /// Moment of inertia about the local y-axis (out-of-plane bending)
    pub iy: f64,
    /// Moment of inertia about the local z-axis (bending in the local x-y plane)
    pub iz: f64,
    /// Torsional constant
    pub j: f64,
}

impl Section {
    /// Create a new section with basic properties
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Create a rectangular section, `depth` measured along local y
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iz = width * depth.powi(3) / 12.0;
        let iy = depth * width.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let j = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self { a, iy, iz, j }
    }

    /// Reject non-positive properties
    pub fn validate(&self, name: &str) -> FEAResult<()> {
        for (label, value) in [("A", self.a), ("Iy", self.iy), ("Iz", self.iz), ("J", self.j)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(FEAError::InvalidInput(format!(
                    "section '{}' must have a positive {} (got {})",
                    name, label, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Section {
    fn default() -> Self {
        // Default to a 200mm x 200mm rectangular section
        Self::rectangular(0.2, 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(200.0, 800.0);

        assert!((section.a - 160_000.0).abs() < 1e-6);
        assert!((section.iz - 200.0 * 800.0_f64.powi(3) / 12.0).abs() < 1e-3);
        assert!((section.iy - 800.0 * 200.0_f64.powi(3) / 12.0).abs() < 1e-3);
        assert!(section.iz > section.iy);
    }

    #[test]
    fn test_validate_names_offending_property() {
        let section = Section::new(1.0, 1.0, 1.0, 0.0);
        let err = section.validate("GB").unwrap_err();
        assert!(err.to_string().contains("positive J"));
    }
}
