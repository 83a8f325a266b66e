//! Loads on the grade beam
//!
//! Forces are positive downward. Moments follow the right-hand rule about
//! the beam's local z axis (counter-clockwise positive with x to the right
//! and y up). Locations are distances from the first node.

use serde::{Deserialize, Serialize};

use crate::error::{GradeBeamError, GradeBeamResult};

/// Concentrated force, positive downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    pub magnitude: f64,
    pub location: f64,
}

impl PointLoad {
    pub fn new(magnitude: f64, location: f64) -> Self {
        Self { magnitude, location }
    }
}

/// Concentrated moment about the local z axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMoment {
    pub magnitude: f64,
    pub location: f64,
}

impl PointMoment {
    pub fn new(magnitude: f64, location: f64) -> Self {
        Self { magnitude, location }
    }
}

/// Linearly varying line load from (x1, w1) to (x2, w2), positive downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    pub w1: f64,
    pub w2: f64,
    pub x1: f64,
    pub x2: f64,
}

impl DistributedLoad {
    pub fn new(w1: f64, w2: f64, x1: f64, x2: f64) -> Self {
        Self { w1, w2, x1, x2 }
    }

    /// Uniform load over [x1, x2]
    pub fn uniform(w: f64, x1: f64, x2: f64) -> Self {
        Self::new(w, w, x1, x2)
    }

    /// Resultant force (positive downward)
    pub fn resultant(&self) -> f64 {
        (self.w1 + self.w2) / 2.0 * (self.x2 - self.x1)
    }
}

/// Everything applied to the beam in one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadSet {
    #[serde(default)]
    pub point_loads: Vec<PointLoad>,
    #[serde(default)]
    pub point_moments: Vec<PointMoment>,
    #[serde(default)]
    pub distributed_loads: Vec<DistributedLoad>,
}

impl LoadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_point_load(mut self, magnitude: f64, location: f64) -> Self {
        self.point_loads.push(PointLoad::new(magnitude, location));
        self
    }

    pub fn with_point_moment(mut self, magnitude: f64, location: f64) -> Self {
        self.point_moments.push(PointMoment::new(magnitude, location));
        self
    }

    pub fn with_distributed_load(mut self, load: DistributedLoad) -> Self {
        self.distributed_loads.push(load);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.point_loads.is_empty() && self.point_moments.is_empty() && self.distributed_loads.is_empty()
    }

    /// Net downward force: point loads plus distributed resultants
    pub fn total_downward_load(&self) -> f64 {
        let points: f64 = self.point_loads.iter().map(|p| p.magnitude).sum();
        let lines: f64 = self.distributed_loads.iter().map(DistributedLoad::resultant).sum();
        points + lines
    }

    /// Check every location lies on a beam of the given length
    pub fn validate(&self, length: f64) -> GradeBeamResult<()> {
        let on_beam = |x: f64| x.is_finite() && (0.0..=length).contains(&x);

        for (i, load) in self.point_loads.iter().enumerate() {
            if !on_beam(load.location) {
                return Err(GradeBeamError::invalid(
                    "point_locations",
                    format!("load {} at {} is outside [0, {}]", i + 1, load.location, length),
                ));
            }
        }
        for (i, moment) in self.point_moments.iter().enumerate() {
            if !on_beam(moment.location) {
                return Err(GradeBeamError::invalid(
                    "moment_locations",
                    format!("moment {} at {} is outside [0, {}]", i + 1, moment.location, length),
                ));
            }
        }
        for (i, load) in self.distributed_loads.iter().enumerate() {
            if !on_beam(load.x1) || !on_beam(load.x2) {
                return Err(GradeBeamError::invalid(
                    "distributed_loads",
                    format!(
                        "load {} spans [{}, {}], outside [0, {}]",
                        i + 1,
                        load.x1,
                        load.x2,
                        length
                    ),
                ));
            }
            if load.x2 < load.x1 {
                return Err(GradeBeamError::invalid(
                    "distributed_loads",
                    format!("load {} ends at {} before it starts at {}", i + 1, load.x2, load.x1),
                ));
            }
        }
        Ok(())
    }
}
