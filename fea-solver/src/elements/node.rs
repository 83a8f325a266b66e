//! Node element - a point where members meet and supports attach

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// A 3D node in the finite element model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// [DX, DY, DZ, RX, RY, RZ] per load combination
    #[serde(skip)]
    pub(crate) displacements: HashMap<String, [f64; 6]>,

    /// [FX, FY, FZ, MX, MY, MZ] per load combination, supported nodes only
    #[serde(skip)]
    pub(crate) reactions: HashMap<String, [f64; 6]>,
}

impl Node {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.position() - self.position()).norm()
    }

    /// Distance along a unit `axis` from `origin`, and distance off that axis
    pub fn station_on(&self, origin: &Vec3, axis: &Vec3) -> (f64, f64) {
        let v = self.position() - origin;
        let t = v.dot(axis);
        (t, (v - axis * t).norm())
    }

    pub fn displacement(&self, combo_name: &str) -> Option<[f64; 6]> {
        self.displacements.get(combo_name).copied()
    }

    pub fn reaction(&self, combo_name: &str) -> Option<[f64; 6]> {
        self.reactions.get(combo_name).copied()
    }

    /// Drop results of earlier analyses
    pub(crate) fn clear_results(&mut self) {
        self.displacements.clear();
        self.reactions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let n1 = Node::new(0.0, 0.0, 0.0);
        let n2 = Node::new(3.0, 4.0, 0.0);
        assert_relative_eq!(n1.distance_to(&n2), 5.0);
        assert!(n2.displacement("Combo 1").is_none());
    }

    #[test]
    fn test_station_on_axis() {
        let node = Node::new(2500.0, 1e-9, 0.0);
        let (t, off) = node.station_on(&Vec3::zeros(), &Vec3::x());
        assert_relative_eq!(t, 2500.0);
        assert!(off < 1e-6);

        let (_, off) = Node::new(2500.0, 40.0, 30.0).station_on(&Vec3::zeros(), &Vec3::x());
        assert_relative_eq!(off, 50.0);
    }
}
