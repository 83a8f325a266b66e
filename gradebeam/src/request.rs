//! Sweep request as submitted by a form or an HTTP client
//!
//! Beam scalars arrive as numbers. Load and modulus lists arrive as raw
//! comma-separated text and are only parsed by [`SweepRequest::validate`].

use serde::{Deserialize, Serialize};

use crate::beam::BeamProperties;
use crate::error::GradeBeamError;
use crate::input::{
    group_distributed_loads, pair_point_loads, pair_point_moments, parse_numeric_list,
    parse_optional_list,
};
use crate::loads::LoadSet;

/// Largest spring count a request may ask for
pub const MAX_SPRINGS: usize = 5000;
/// Largest number of subgrade moduli in one request
pub const MAX_MODULI: usize = 100;

/// Raw sweep input; every field has the form default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepRequest {
    pub material: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub e: f64,
    pub nu: f64,
    pub rho: f64,
    pub j: f64,
    /// Overrides w*h^3/12 when set
    pub iz: Option<f64>,
    /// Overrides h*w^3/12 when set
    pub iy: Option<f64>,
    pub n_springs: usize,
    pub subgrade_moduli: String,
    pub point_loads: String,
    pub point_locations: String,
    pub moments: String,
    pub moment_locations: String,
    /// Flat list read in groups of (w1, w2, x1, x2)
    pub distributed_loads: String,
}

impl Default for SweepRequest {
    fn default() -> Self {
        Self {
            material: "Concrete".to_string(),
            length: 10000.0,
            width: 200.0,
            height: 800.0,
            e: 24648.0,
            nu: 0.2,
            rho: 1e-3,
            j: 1.0,
            iz: None,
            iy: None,
            n_springs: 10,
            subgrade_moduli: "1".to_string(),
            point_loads: "12100, -2200".to_string(),
            point_locations: "250, 2750".to_string(),
            moments: "8925000".to_string(),
            moment_locations: "250".to_string(),
            distributed_loads: "-12.5, -12.5, 0, 3000".to_string(),
        }
    }
}

/// Parsed and checked sweep input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepInput {
    pub beam: BeamProperties,
    pub moduli: Vec<f64>,
    pub n_springs: usize,
    pub loads: LoadSet,
}

impl SweepRequest {
    /// Beam properties described by the scalar fields
    pub fn beam(&self) -> BeamProperties {
        let beam = BeamProperties::rectangular(
            &self.material,
            self.length,
            self.width,
            self.height,
            self.e,
            self.nu,
            self.rho,
            self.j,
        );
        let (iz, iy) = (self.iz.unwrap_or(beam.iz), self.iy.unwrap_or(beam.iy));
        beam.with_inertia(iz, iy)
    }

    /// Parse every list field, reporting all field errors at once
    pub fn validate(&self) -> Result<SweepInput, Vec<GradeBeamError>> {
        let mut errors = Vec::new();
        let mut keep = |result: Result<Vec<f64>, GradeBeamError>| match result {
            Ok(values) => Some(values),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        let moduli = keep(parse_numeric_list("subgrade_moduli", &self.subgrade_moduli));
        let point_loads = keep(parse_optional_list("point_loads", &self.point_loads));
        let point_locations = keep(parse_optional_list("point_locations", &self.point_locations));
        let moments = keep(parse_optional_list("moments", &self.moments));
        let moment_locations = keep(parse_optional_list("moment_locations", &self.moment_locations));
        let distributed = keep(parse_optional_list("distributed_loads", &self.distributed_loads));

        let mut loads = LoadSet::new();
        if let (Some(p), Some(x)) = (&point_loads, &point_locations) {
            match pair_point_loads("point_loads", p, "point_locations", x) {
                Ok(pairs) => loads.point_loads = pairs,
                Err(err) => errors.push(err),
            }
        }
        if let (Some(m), Some(x)) = (&moments, &moment_locations) {
            match pair_point_moments("moments", m, "moment_locations", x) {
                Ok(pairs) => loads.point_moments = pairs,
                Err(err) => errors.push(err),
            }
        }
        if let Some(values) = &distributed {
            match group_distributed_loads("distributed_loads", values) {
                Ok(groups) => loads.distributed_loads = groups,
                Err(err) => errors.push(err),
            }
        }

        if self.n_springs > MAX_SPRINGS {
            errors.push(GradeBeamError::invalid(
                "n_springs",
                format!("at most {} springs are allowed (got {})", MAX_SPRINGS, self.n_springs),
            ));
        }
        if let Some(moduli) = &moduli {
            if moduli.len() > MAX_MODULI {
                errors.push(GradeBeamError::invalid(
                    "subgrade_moduli",
                    format!("at most {} moduli are allowed (got {})", MAX_MODULI, moduli.len()),
                ));
            }
        }

        let beam = self.beam();
        if errors.is_empty() {
            if let Err(err) = loads.validate(beam.length) {
                errors.push(err);
            }
        }

        match moduli {
            Some(moduli) if errors.is_empty() => Ok(SweepInput {
                beam,
                moduli,
                n_springs: self.n_springs,
                loads,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_request_is_the_concrete_scenario() {
        let input = SweepRequest::default().validate().unwrap();
        assert_eq!(input.moduli, vec![1.0]);
        assert_eq!(input.n_springs, 10);
        assert_eq!(input.loads.point_loads.len(), 2);
        assert_relative_eq!(input.loads.point_moments[0].magnitude, 11.9 * 0.75 * 1e6);
        assert_relative_eq!(input.loads.total_downward_load(), -27600.0);
    }

    #[test]
    fn test_all_field_errors_are_reported() {
        let request = SweepRequest {
            subgrade_moduli: "1, x".to_string(),
            point_locations: "250".to_string(),
            distributed_loads: "1, 2, 3".to_string(),
            ..SweepRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            &errors[0],
            GradeBeamError::MalformedNumericList { field, position: 2, .. } if field == "subgrade_moduli"
        ));
        assert!(matches!(errors[1], GradeBeamError::InsufficientLoadPairing { .. }));
        assert!(matches!(errors[2], GradeBeamError::InvalidInput { .. }));
    }

    #[test]
    fn test_blank_load_lists_mean_no_loads() {
        let request = SweepRequest {
            point_loads: String::new(),
            point_locations: " ".to_string(),
            moments: String::new(),
            moment_locations: String::new(),
            distributed_loads: String::new(),
            ..SweepRequest::default()
        };
        assert!(request.validate().unwrap().loads.is_empty());
    }

    #[test]
    fn test_blank_moduli_are_rejected() {
        let request = SweepRequest {
            subgrade_moduli: String::new(),
            ..SweepRequest::default()
        };
        assert_eq!(request.validate().unwrap_err().len(), 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let request: SweepRequest =
            serde_json::from_str(r#"{"subgrade_moduli": "0.5, 1, 5", "iz": 1.0e9}"#).unwrap();
        let input = request.validate().unwrap();
        assert_eq!(input.moduli, vec![0.5, 1.0, 5.0]);
        assert_eq!(input.beam.iz, 1.0e9);
        assert_eq!(input.beam.width, 200.0);
    }

    #[test]
    fn test_oversized_sweeps_are_rejected() {
        let request = SweepRequest {
            n_springs: MAX_SPRINGS + 1,
            subgrade_moduli: vec!["1"; MAX_MODULI + 1].join(", "),
            ..SweepRequest::default()
        };
        let errors = request.validate().unwrap_err();
        let fields: Vec<&str> = errors
            .iter()
            .filter_map(|e| match e {
                GradeBeamError::InvalidInput { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fields, ["n_springs", "subgrade_moduli"]);

        let at_limit = SweepRequest {
            n_springs: MAX_SPRINGS,
            subgrade_moduli: vec!["1"; MAX_MODULI].join(", "),
            ..SweepRequest::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_load_off_the_beam_is_reported() {
        let request = SweepRequest {
            point_locations: "250, 12000".to_string(),
            ..SweepRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(matches!(
            &errors[0],
            GradeBeamError::InvalidInput { field, .. } if field == "point_locations"
        ));
    }
}
