//! Mathematical utilities for FEA calculations

pub mod sparse;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

use crate::error::{FEAError, FEAResult};

// Re-export sparse utilities
pub use sparse::{sparse_matvec, SkylineCholesky, SparseMatrixBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// A factorization stopped at a pivot that is non-positive or negligible
/// compared with the original diagonal term of the same equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingularPivot {
    /// Equation index (in the factorized system) of the failing pivot
    pub index: usize,
}

/// Compute the 3x3 direction cosine matrix of a frame element
///
/// Rows are the local x, y, z axes expressed in global coordinates,
/// following the PyNite convention:
/// - horizontal members: local y = global Y (up), z = x cross y
/// - vertical members: local z = global Z
/// - inclined members: local z stays horizontal, y = z cross x
pub fn member_rotation_matrix(i_node: &Vec3, j_node: &Vec3, rotation: f64) -> FEAResult<Mat3> {
    let d = j_node - i_node;
    let length = d.norm();
    if length < 1e-10 {
        return Err(FEAError::InvalidGeometry(format!(
            "member from {:?} to {:?} has zero length",
            i_node.as_slice(),
            j_node.as_slice()
        )));
    }
    let x = d / length;

    let (y, z) = if x[0].abs() < 1e-10 && x[2].abs() < 1e-10 {
        // Vertical member
        let y = if x[1] > 0.0 { Vec3::new(-1.0, 0.0, 0.0) } else { Vec3::new(1.0, 0.0, 0.0) };
        (y, Vec3::new(0.0, 0.0, 1.0))
    } else if d[1].abs() < 1e-10 {
        // Horizontal member
        let y = Vec3::new(0.0, 1.0, 0.0);
        (y, x.cross(&y).normalize())
    } else {
        // Inclined member: keep z in the global XZ plane
        let proj = Vec3::new(d[0], 0.0, d[2]);
        let z = (if x[1] > 0.0 { proj.cross(&x) } else { x.cross(&proj) }).normalize();
        (z.cross(&x).normalize(), z)
    };

    // Member rotation about local x-axis
    let (y, z) = if rotation.abs() > 1e-10 {
        let (sin_r, cos_r) = rotation.sin_cos();
        (y * cos_r + z * sin_r, -y * sin_r + z * cos_r)
    } else {
        (y, z)
    };

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Compute the 12x12 transformation matrix (global to local) of a frame element
pub fn member_transformation_matrix(i_node: &Vec3, j_node: &Vec3, rotation: f64) -> FEAResult<Mat12> {
    let r = member_rotation_matrix(i_node, j_node, rotation)?;
    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(&r);
    }
    Ok(t)
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Element length
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Hermite shape functions [N1, N2, N3, N4] at distance `a` along an element
fn hermite(a: f64, l: f64) -> [f64; 4] {
    let s = a / l;
    let s2 = s * s;
    let s3 = s2 * s;
    [
        1.0 - 3.0 * s2 + 2.0 * s3,
        l * (s - 2.0 * s2 + s3),
        3.0 * s2 - 2.0 * s3,
        l * (s3 - s2),
    ]
}

/// Slopes of the Hermite shape functions at distance `a`
fn hermite_slope(a: f64, l: f64) -> [f64; 4] {
    let s = a / l;
    let s2 = s * s;
    [
        (6.0 * s2 - 6.0 * s) / l,
        1.0 - 4.0 * s + 3.0 * s2,
        (6.0 * s - 6.0 * s2) / l,
        3.0 * s2 - 2.0 * s,
    ]
}

/// Compute fixed end reactions for a concentrated force
///
/// # Arguments
/// * `p` - Load magnitude
/// * `a` - Distance from i-node to load
/// * `length` - Element length
/// * `direction` - Local axis index (0=x, 1=y, 2=z)
pub fn fer_point_load(p: f64, a: f64, length: f64, direction: usize) -> Vec12 {
    let mut fer = Vec12::zeros();

    match direction {
        0 => {
            let s = a / length;
            fer[0] = -p * (1.0 - s);
            fer[6] = -p * s;
        }
        1 => {
            let n = hermite(a, length);
            fer[1] = -p * n[0];
            fer[5] = -p * n[1];
            fer[7] = -p * n[2];
            fer[11] = -p * n[3];
        }
        2 => {
            let n = hermite(a, length);
            fer[2] = -p * n[0];
            fer[4] = p * n[1];
            fer[8] = -p * n[2];
            fer[10] = p * n[3];
        }
        _ => {}
    }

    fer
}

/// Compute fixed end reactions for a concentrated moment
///
/// # Arguments
/// * `m` - Moment magnitude (right-hand rule about the local axis)
/// * `a` - Distance from i-node to load
/// * `length` - Element length
/// * `direction` - Local axis index (0=x torsion, 1=y, 2=z)
pub fn fer_point_moment(m: f64, a: f64, length: f64, direction: usize) -> Vec12 {
    let mut fer = Vec12::zeros();

    match direction {
        0 => {
            let s = a / length;
            fer[3] = -m * (1.0 - s);
            fer[9] = -m * s;
        }
        1 => {
            // theta_y = -dw/dx
            let dn = hermite_slope(a, length);
            fer[2] = m * dn[0];
            fer[4] = -m * dn[1];
            fer[8] = m * dn[2];
            fer[10] = -m * dn[3];
        }
        2 => {
            // theta_z = dv/dx
            let dn = hermite_slope(a, length);
            fer[1] = -m * dn[0];
            fer[5] = -m * dn[1];
            fer[7] = -m * dn[2];
            fer[11] = -m * dn[3];
        }
        _ => {}
    }

    fer
}

/// Compute fixed end reactions for a linearly varying load on [x1, x2]
///
/// Integrated with 3-point Gauss-Legendre quadrature, which is exact for a
/// linear load against cubic shape functions.
pub fn fer_linear_load(
    w1: f64,
    w2: f64,
    x1: f64,
    x2: f64,
    length: f64,
    direction: usize,
) -> Vec12 {
    const POINTS: [(f64, f64); 3] = [
        (-0.774_596_669_241_483_4, 5.0 / 9.0),
        (0.0, 8.0 / 9.0),
        (0.774_596_669_241_483_4, 5.0 / 9.0),
    ];

    let span = x2 - x1;
    if span <= 0.0 {
        return Vec12::zeros();
    }
    let half = span / 2.0;
    let mid = (x1 + x2) / 2.0;

    POINTS.iter().fold(Vec12::zeros(), |acc, &(t, weight)| {
        let x = mid + half * t;
        let w = w1 + (w2 - w1) * (x - x1) / span;
        acc + fer_point_load(w * weight * half, x, length, direction)
    })
}

/// Solve a symmetric positive definite system with a dense Cholesky factorization
///
/// Pivots below `pivot_tolerance` times the original diagonal term are
/// reported as singular.
pub fn solve_cholesky(a: &Mat, b: &Vec, pivot_tolerance: f64) -> Result<Vec, Option<SingularPivot>> {
    let chol = a.clone().cholesky().ok_or(None)?;
    let l = chol.l_dirty();
    for i in 0..a.nrows() {
        let pivot = l[(i, i)] * l[(i, i)];
        if pivot <= pivot_tolerance * a[(i, i)].abs() {
            return Err(Some(SingularPivot { index: i }));
        }
    }
    Ok(chol.solve(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = member_transformation_matrix(&Vec3::zeros(), &Vec3::new(10.0, 0.0, 0.0), 0.0).unwrap();

        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(11, 11)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let t = member_transformation_matrix(&Vec3::zeros(), &Vec3::new(0.0, 10.0, 0.0), 0.0).unwrap();

        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_length_member_is_rejected() {
        let result = member_transformation_matrix(&Vec3::repeat(1.0), &Vec3::repeat(1.0), 0.0);
        assert!(matches!(result, Err(FEAError::InvalidGeometry(_))));
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = member_local_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0);
        for i in 0..12 {
            for j in 0..12 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_fer_point_load_at_midspan() {
        let (p, l) = (-100.0, 8.0);
        let fer = fer_point_load(p, l / 2.0, l, 1);

        assert_relative_eq!(fer[1], -p / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[7], -p / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5], -p * l / 8.0, epsilon = 1e-10);
        assert_relative_eq!(fer[11], p * l / 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fer_full_uniform_load_matches_closed_form() {
        let (w, l) = (3.0, 6.0);
        let fer = fer_linear_load(w, w, 0.0, l, l, 1);

        assert_relative_eq!(fer[1], -w * l / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5], -w * l * l / 12.0, epsilon = 1e-10);
        assert_relative_eq!(fer[7], -w * l / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[11], w * l * l / 12.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fer_triangular_load_resultant() {
        // Zero at i, w at j: resultant w*L/2 acting at 2L/3
        let (w, l) = (6.0, 9.0);
        let fer = fer_linear_load(0.0, w, 0.0, l, l, 1);

        assert_relative_eq!(fer[1] + fer[7], -w * l / 2.0, epsilon = 1e-10);
        assert_relative_eq!(fer[1], -3.0 * w * l / 20.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5], -w * l * l / 30.0, epsilon = 1e-10);
        assert_relative_eq!(fer[11], w * l * l / 20.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fer_point_moment_balances() {
        let (m, a, l) = (50.0, 2.0, 10.0);
        let fer = fer_point_moment(m, a, l, 2);

        // No net force, and the end moments plus the shear couple carry -m
        assert_relative_eq!(fer[1] + fer[7], 0.0, epsilon = 1e-10);
        assert_relative_eq!(fer[5] + fer[11] + fer[7] * l, -m, epsilon = 1e-10);
    }

    #[test]
    fn test_dense_cholesky_flags_singular_system() {
        let a = Mat::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]);
        let b = Vec::from_vec(vec![1.0, -1.0]);
        assert!(solve_cholesky(&a, &b, 1e-10).is_err());

        let a = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let b = Vec::from_vec(vec![1.0, 2.0]);
        let x = solve_cholesky(&a, &b, 1e-10).unwrap();
        assert_relative_eq!(4.0 * x[0] + x[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[0] + 3.0 * x[1], 2.0, epsilon = 1e-12);
    }
}
