//! Discretization of the elastic foundation into vertical springs
//!
//! The continuous subgrade is lumped into `n` springs at equally spaced
//! nodes. Each spring carries a tributary length of L / n, the end nodes
//! included, so the springs sum to k_s * w * L.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::beam::BeamProperties;
use crate::error::{GradeBeamError, GradeBeamResult};

/// Subgrade modulus (force per unit volume) and spring count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationSpec {
    pub subgrade_modulus: f64,
    pub n_springs: usize,
}

impl FoundationSpec {
    pub fn new(subgrade_modulus: f64, n_springs: usize) -> Self {
        Self {
            subgrade_modulus,
            n_springs,
        }
    }

    /// Tributary length per spring, dx = L / n
    pub fn tributary_length(&self, beam: &BeamProperties) -> f64 {
        beam.length / self.n_springs as f64
    }

    /// Lumped spring stiffness, k_s * w * dx
    pub fn spring_stiffness(&self, beam: &BeamProperties) -> f64 {
        self.subgrade_modulus * beam.width * self.tributary_length(beam)
    }
}

/// Node positions and vertical spring stiffness at each node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscretizedModel {
    /// Node names, `node1..nodeN` in increasing x
    pub nodes: Vec<String>,
    /// Node x positions
    pub positions: Vec<f64>,
    /// Vertical spring stiffness at each node
    pub stiffnesses: Vec<f64>,
}

impl DiscretizedModel {
    /// Equal springs of stiffness k_s * w * L / n at linspace(0, L, n)
    pub fn uniform(beam: &BeamProperties, foundation: &FoundationSpec) -> GradeBeamResult<Self> {
        check_spring_count(foundation.n_springs)?;
        let k = foundation.spring_stiffness(beam);
        debug!("spring_stiffness = {:.2}", k);
        Self::with_stiffnesses(beam, vec![k; foundation.n_springs])
    }

    /// One spring per entry of `stiffnesses`, at equally spaced nodes
    pub fn with_stiffnesses(beam: &BeamProperties, stiffnesses: Vec<f64>) -> GradeBeamResult<Self> {
        check_spring_count(stiffnesses.len())?;
        beam.validate()?;
        let n = stiffnesses.len();
        Ok(Self {
            nodes: (1..=n).map(|i| format!("node{}", i)).collect(),
            positions: linspace(0.0, beam.length, n),
            stiffnesses,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first_node(&self) -> &str {
        self.nodes.first().map(String::as_str).unwrap_or_default()
    }

    pub fn last_node(&self) -> &str {
        self.nodes.last().map(String::as_str).unwrap_or_default()
    }
}

fn check_spring_count(n: usize) -> GradeBeamResult<()> {
    if n < 2 {
        return Err(GradeBeamError::IllPosedModel(format!(
            "at least 2 springs are needed to support the beam (got {})",
            n
        )));
    }
    Ok(())
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_includes_both_ends() {
        let x = linspace(0.0, 10000.0, 10);
        assert_eq!(x.len(), 10);
        assert_eq!(x[0], 0.0);
        assert_eq!(x[9], 10000.0);
        assert_relative_eq!(x[1], 10000.0 / 9.0);
    }

    #[test]
    fn test_uniform_spring_stiffness() {
        let beam = BeamProperties::default();
        let model = DiscretizedModel::uniform(&beam, &FoundationSpec::new(1.0, 10)).unwrap();
        // 1 * 200 * (10000 / 10)
        assert!(model.stiffnesses.iter().all(|&k| k == 200000.0));
        assert_eq!(model.first_node(), "node1");
        assert_eq!(model.last_node(), "node10");
    }

    #[test]
    fn test_zero_modulus_is_not_clamped() {
        let beam = BeamProperties::default();
        let model = DiscretizedModel::uniform(&beam, &FoundationSpec::new(0.0, 4)).unwrap();
        assert!(model.stiffnesses.iter().all(|&k| k == 0.0));
    }

    #[test]
    fn test_single_spring_is_ill_posed() {
        let beam = BeamProperties::default();
        let err = DiscretizedModel::uniform(&beam, &FoundationSpec::new(1.0, 1)).unwrap_err();
        assert!(matches!(err, GradeBeamError::IllPosedModel(_)));
    }
}
