//! Member element - 3D physical frame member (beam/column)
//!
//! A physical member runs between two end nodes. Any other model node lying
//! on its axis splits it into sub-elements ([`Segment`]) at analysis time, so
//! that intermediate supports and springs are connected to the member.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sub-element of a physical member, between two consecutive on-axis nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start node name
    pub i_node: String,
    /// End node name
    pub j_node: String,
    /// Distance of the start node from the member's i-node
    pub start: f64,
    /// Segment length
    pub length: f64,

    /// Local end forces by load combination
    /// [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, Fy_j, Fz_j, Mx_j, My_j, Mz_j]
    #[serde(skip)]
    pub(crate) local_forces: HashMap<String, [f64; 12]>,
}

impl Segment {
    pub(crate) fn new(i_node: &str, j_node: &str, start: f64, length: f64) -> Self {
        Self {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            start,
            length,
            local_forces: HashMap::new(),
        }
    }

    /// Distance of the end node from the member's i-node
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// Local end forces for a load combination
    pub fn local_force(&self, combo_name: &str) -> Option<[f64; 12]> {
        self.local_forces.get(combo_name).copied()
    }
}

/// A 3D physical frame member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Name of the i-node (start)
    pub i_node: String,
    /// Name of the j-node (end)
    pub j_node: String,
    /// Name of the material
    pub material: String,
    /// Name of the section
    pub section: String,
    /// Rotation about longitudinal axis (radians)
    pub rotation: f64,

    /// Calculated length
    #[serde(skip)]
    pub(crate) length: Option<f64>,

    /// Sub-elements, ordered from the i-node
    #[serde(skip)]
    pub(crate) segments: Vec<Segment>,
}

impl Member {
    /// Create a new member
    pub fn new(i_node: &str, j_node: &str, material: &str, section: &str) -> Self {
        Self {
            i_node: i_node.to_string(),
            j_node: j_node.to_string(),
            material: material.to_string(),
            section: section.to_string(),
            rotation: 0.0,
            length: None,
            segments: Vec::new(),
        }
    }

    /// Get the member length
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    /// Sub-elements produced by the last analysis
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the segment that carries a load applied at distance `x`
    ///
    /// A position exactly on an interior node goes to the segment ending there.
    pub(crate) fn segment_index_at(&self, x: f64) -> Option<usize> {
        let last = self.segments.len().checked_sub(1)?;
        Some(
            self.segments
                .iter()
                .position(|s| x <= s.end())
                .unwrap_or(last),
        )
    }

    /// Local forces at the member's i-end for a load combination
    pub fn i_end_forces(&self, combo_name: &str) -> Option<[f64; 12]> {
        self.segments.first()?.local_force(combo_name)
    }

    /// Local forces at the member's j-end for a load combination
    pub fn j_end_forces(&self, combo_name: &str) -> Option<[f64; 12]> {
        self.segments.last()?.local_force(combo_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_creation() {
        let member = Member::new("N1", "N2", "Concrete", "GB");
        assert_eq!(member.i_node, "N1");
        assert_eq!(member.j_node, "N2");
        assert_eq!(member.rotation, 0.0);
        assert!(member.segments().is_empty());
    }

    #[test]
    fn test_segment_lookup() {
        let mut member = Member::new("N1", "N3", "Concrete", "GB");
        member.segments = vec![
            Segment::new("N1", "N2", 0.0, 5.0),
            Segment::new("N2", "N3", 5.0, 5.0),
        ];
        assert_eq!(member.segment_index_at(0.0), Some(0));
        assert_eq!(member.segment_index_at(5.0), Some(0));
        assert_eq!(member.segment_index_at(7.5), Some(1));
        assert_eq!(member.segment_index_at(10.0 + 1e-12), Some(1));
    }
}
