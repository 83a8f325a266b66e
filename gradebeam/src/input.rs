//! Input normalization for comma-separated numeric lists
//!
//! Every list field arrives as free text such as `"1, 5, 10"`. Parsing is
//! all-or-nothing: one bad token rejects the whole field.

use crate::error::{GradeBeamError, GradeBeamResult};
use crate::loads::{DistributedLoad, PointLoad, PointMoment};

/// Parse a comma-separated list of finite numbers
///
/// Tokens are trimmed. Empty tokens (including a trailing comma), non-numeric
/// text and non-finite values fail with [`GradeBeamError::MalformedNumericList`].
/// A blank string is an empty token, so it fails too.
pub fn parse_numeric_list(field: &str, raw: &str) -> GradeBeamResult<Vec<f64>> {
    raw.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GradeBeamError::MalformedNumericList {
                    field: field.to_string(),
                    position: i + 1,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Parse a list that may legitimately be empty
///
/// A blank (or whitespace-only) string gives an empty list.
pub fn parse_optional_list(field: &str, raw: &str) -> GradeBeamResult<Vec<f64>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_numeric_list(field, raw)
}

/// Render values in the same comma-separated form the parser accepts
pub fn format_numeric_list(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Zip magnitudes with locations into (magnitude, location) pairs
pub fn pair_values(
    magnitudes_field: &str,
    magnitudes: &[f64],
    locations_field: &str,
    locations: &[f64],
) -> GradeBeamResult<Vec<(f64, f64)>> {
    if magnitudes.len() != locations.len() {
        return Err(GradeBeamError::InsufficientLoadPairing {
            magnitudes_field: magnitudes_field.to_string(),
            locations_field: locations_field.to_string(),
            magnitudes: magnitudes.len(),
            locations: locations.len(),
        });
    }
    Ok(magnitudes.iter().copied().zip(locations.iter().copied()).collect())
}

/// Pair point load magnitudes ("+down") with their locations
pub fn pair_point_loads(
    magnitudes_field: &str,
    magnitudes: &[f64],
    locations_field: &str,
    locations: &[f64],
) -> GradeBeamResult<Vec<PointLoad>> {
    Ok(pair_values(magnitudes_field, magnitudes, locations_field, locations)?
        .into_iter()
        .map(|(magnitude, location)| PointLoad::new(magnitude, location))
        .collect())
}

/// Pair point moment magnitudes with their locations
pub fn pair_point_moments(
    magnitudes_field: &str,
    magnitudes: &[f64],
    locations_field: &str,
    locations: &[f64],
) -> GradeBeamResult<Vec<PointMoment>> {
    Ok(pair_values(magnitudes_field, magnitudes, locations_field, locations)?
        .into_iter()
        .map(|(magnitude, location)| PointMoment::new(magnitude, location))
        .collect())
}

/// Read a flat list as groups of (w1, w2, x1, x2)
pub fn group_distributed_loads(field: &str, values: &[f64]) -> GradeBeamResult<Vec<DistributedLoad>> {
    if values.len() % 4 != 0 {
        return Err(GradeBeamError::invalid(
            field,
            format!(
                "expected groups of four values (w1, w2, x1, x2), got {} value(s)",
                values.len()
            ),
        ));
    }
    Ok(values
        .chunks_exact(4)
        .map(|c| DistributedLoad::new(c[0], c[1], c[2], c[3]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let values = parse_numeric_list("k", " 1, 5 ,10,2.5e3").unwrap();
        assert_eq!(values, vec![1.0, 5.0, 10.0, 2500.0]);
    }

    #[test]
    fn test_trailing_comma_is_malformed() {
        let err = parse_numeric_list("k", "1, 2,").unwrap_err();
        assert_eq!(
            err,
            GradeBeamError::MalformedNumericList {
                field: "k".to_string(),
                position: 3,
                token: String::new(),
            }
        );
    }

    #[test]
    fn test_non_numeric_and_non_finite_are_malformed() {
        for raw in ["1, abc", "", "  ", "1,,2", "NaN", "1, inf"] {
            assert!(
                matches!(
                    parse_numeric_list("k", raw),
                    Err(GradeBeamError::MalformedNumericList { .. })
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_optional_list_accepts_blank() {
        assert!(parse_optional_list("moments", "   ").unwrap().is_empty());
        assert!(parse_optional_list("moments", "1,").is_err());
    }

    #[test]
    fn test_format_then_parse_round_trip() {
        let values = vec![0.1, -2200.0, 12100.0, 1e-7, 8925000.0];
        let parsed = parse_numeric_list("k", &format_numeric_list(&values)).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_pairing_requires_equal_lengths() {
        let err = pair_point_loads("point_loads", &[1.0, 2.0], "point_locations", &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            GradeBeamError::InsufficientLoadPairing {
                magnitudes: 2,
                locations: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_distributed_groups() {
        let loads = group_distributed_loads("dist", &[-12.5, -12.5, 0.0, 3000.0]).unwrap();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].x2, 3000.0);
        assert!(group_distributed_loads("dist", &[1.0, 2.0, 3.0]).is_err());
    }
}
