//! Vector and matrix helpers on top of nalgebra
//!
//! Addition, subtraction, dot products and matrix-vector products use the
//! nalgebra operators directly (`a + b`, `a - b`, `a.dot(&b)`, `m * v`).
//! This module adds the pieces with pipeline-specific policy: a checked
//! normalize and the closed-form Euler rotation.

use crate::error::{RenderError, Result};
use nalgebra::{Matrix3, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Mat3 = Matrix3<f32>;

/// Normalize a vector to length 1, rejecting zero-length input
pub fn normalize(v: Vec3) -> Result<Vec3> {
    let len = v.norm();
    if len == 0.0 || !len.is_finite() {
        return Err(RenderError::DegenerateVector(v));
    }
    Ok(v / len)
}

/// Build a rotation matrix from angles about the x, y and z axes
///
/// Uses the x -> y -> z convention: the x rotation is applied first, then y,
/// then z, folded into the single matrix `Rz * Ry * Rx`.
pub fn rotation_from_euler(angles: Vec3) -> Mat3 {
    let (sx, cx) = angles.x.sin_cos();
    let (sy, cy) = angles.y.sin_cos();
    let (sz, cz) = angles.z.sin_cos();

    // Matrix3::new takes its arguments row by row
    Mat3::new(
        cy * cz,
        cz * sx * sy - cx * sz,
        cx * cz * sy + sx * sz,
        cy * sz,
        cx * cz + sx * sy * sz,
        -cz * sx + cx * sy * sz,
        -sy,
        cy * sx,
        cx * cy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    const EPS: f32 = 1e-5;

    fn sample_angles() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.06, 0.09, 0.04),
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(3.1, 0.7, -4.2),
            Vec3::new(60.0, 90.0, 40.0),
        ]
    }

    #[test]
    fn test_add_sub() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, -1.0, 4.0);
        assert_eq!(a + b, Vec3::new(1.5, 1.0, 7.0));
        assert_eq!(a - b, Vec3::new(0.5, 3.0, -1.0));
    }

    #[test]
    fn test_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, -5.0, 6.0);
        assert!((a.dot(&b) - 12.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_unit_length() {
        for v in [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(0.0, 20.0, -30.0),
            Vec3::new(1e-3, -2e-3, 5e-4),
            Vec3::new(-7.0, 0.1, 12.5),
        ] {
            let n = normalize(v).unwrap();
            assert!((n.norm() - 1.0).abs() < EPS, "{:?} -> {:?}", v, n);
        }
    }

    #[test]
    fn test_normalize_zero_vector() {
        let result = normalize(Vec3::zeros());
        assert!(matches!(result, Err(RenderError::DegenerateVector(_))));
    }

    #[test]
    fn test_rotation_identity() {
        let r = rotation_from_euler(Vec3::zeros());
        assert_eq!(r, Mat3::identity());
    }

    #[test]
    fn test_rotation_preserves_length() {
        let vectors = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(15.0, 0.0, 5.0),
            Vec3::new(-3.0, 7.5, 2.25),
        ];
        for angles in sample_angles() {
            let r = rotation_from_euler(angles);
            for v in vectors {
                let rotated = r * v;
                assert!((rotated.norm() - v.norm()).abs() < 1e-4 * v.norm().max(1.0));
            }
        }
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        for angles in sample_angles() {
            let r = rotation_from_euler(angles);
            let should_be_identity = r * r.transpose();
            assert!((should_be_identity - Mat3::identity()).abs().max() < EPS);
            assert!((r.determinant() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_rotation_matches_nalgebra_euler() {
        for angles in sample_angles() {
            let ours = rotation_from_euler(angles);
            let theirs = Rotation3::from_euler_angles(angles.x, angles.y, angles.z);
            assert!((ours - theirs.matrix()).abs().max() < 1e-4);
        }
    }

    #[test]
    fn test_rotation_about_z() {
        let r = rotation_from_euler(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        let v = r * Vec3::new(1.0, 0.0, 0.0);
        assert!((v - Vec3::new(0.0, 1.0, 0.0)).norm() < EPS);
    }
}
