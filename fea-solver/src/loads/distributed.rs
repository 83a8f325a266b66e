//! Distributed loads on members

use serde::{Deserialize, Serialize};
use super::point_load::LoadDirection;

/// A linearly varying distributed (line) load on part of a member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Start magnitude (at start position)
    pub w1: f64,
    /// End magnitude (at end position)
    pub w2: f64,
    /// Start position (distance from i-node)
    pub x1: f64,
    /// End position (distance from i-node); `f64::INFINITY` means the member end
    pub x2: f64,
    /// Load direction (forces only)
    pub direction: LoadDirection,
    /// Load case
    pub case: String,
}

impl DistributedLoad {
    /// Create a new distributed load
    pub fn new(w1: f64, w2: f64, x1: f64, x2: f64, direction: LoadDirection, case: &str) -> Self {
        Self {
            w1,
            w2,
            x1,
            x2,
            direction,
            case: case.to_string(),
        }
    }

    /// Create a uniform distributed load over the full member length
    pub fn uniform(w: f64, direction: LoadDirection, case: &str) -> Self {
        Self::new(w, w, 0.0, f64::INFINITY, direction, case)
    }

    /// Create a uniform downward load (negative global Y)
    pub fn uniform_downward(w: f64, case: &str) -> Self {
        Self::uniform(-w.abs(), LoadDirection::FY, case)
    }

    /// Resolve an open-ended load against the member length
    pub(crate) fn resolved(&self, member_length: f64) -> (f64, f64) {
        (self.x1, self.x2.min(member_length))
    }

    /// Load intensity at position `x`, linear between (x1, w1) and (x2, w2)
    pub fn intensity_at(&self, x: f64, member_length: f64) -> f64 {
        let (x1, x2) = self.resolved(member_length);
        let span = x2 - x1;
        if span.abs() < f64::EPSILON {
            return self.w1;
        }
        self.w1 + (self.w2 - self.w1) * (x - x1) / span
    }

    /// Check if the load is uniform (constant magnitude)
    pub fn is_uniform(&self) -> bool {
        (self.w1 - self.w2).abs() < 1e-10
    }

    /// Get the total force from this load
    pub fn total_force(&self, member_length: f64) -> f64 {
        let (x1, x2) = self.resolved(member_length);
        (self.w1 + self.w2) / 2.0 * (x2 - x1)
    }
}
