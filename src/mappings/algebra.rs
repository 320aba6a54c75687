//! Quaternion and rotation matrix algebra.
//!
//! Products follow the Hamilton convention of `nalgebra::Quaternion`, so
//! `quat_product(p, q)` applies `q` first and `p` second, like the matrix product
//! `rotmat_composition(R_p, R_q)`.

use crate::batch::{Batch, RealScalar, RotmatBatch, UnitquatBatch};
use crate::config::MappingConfig;
use crate::error::{RotationError, RotationResult};
use crate::mappings::cst;
use nalgebra::{Quaternion, UnitQuaternion, Vector3, Vector4};
use tracing::debug;

/// Cosine of the angle between two quaternions above which slerp falls back to a
/// normalised linear interpolation
const SLERP_LINEAR_THRESHOLD: f64 = 1.0 - 1e-6;

/// Conjugate `(−x, −y, −z, w)` of every quaternion.
pub fn quat_conjugation<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> UnitquatBatch<T> {
    quaternions.map(config.execution, |q| Vector4::new(-q[0], -q[1], -q[2], q[3]))
}

/// Multiplicative inverse `q̄ / ‖q‖²` of every quaternion.
///
/// Equal to the conjugate for unit quaternions. A zero quaternion yields non-finite
/// values.
pub fn quat_inverse<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> UnitquatBatch<T> {
    quaternions.map(config.execution, |q| {
        Vector4::new(-q[0], -q[1], -q[2], q[3]) / q.norm_squared()
    })
}

/// Project every quaternion onto the unit sphere.
pub fn quat_normalize<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> UnitquatBatch<T> {
    quaternions.map(config.execution, |q| q.normalize())
}

/// Hamilton product `p ⊗ q` of paired quaternions.
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn quat_product<T: RealScalar>(
    p: &UnitquatBatch<T>,
    q: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<UnitquatBatch<T>> {
    debug!(batch_size = p.len(), execution = %config.execution, "quaternion product");
    p.zip_map(q, config.execution, |p, q| {
        (Quaternion::from_vector(*p) * Quaternion::from_vector(*q)).coords
    })
}

/// Rotate every vector by its paired unit quaternion.
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn quat_action<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    vectors: &Batch<Vector3<T>>,
    config: &MappingConfig,
) -> RotationResult<Batch<Vector3<T>>> {
    quaternions.zip_map(vectors, config.execution, |q, v| {
        UnitQuaternion::new_unchecked(Quaternion::from_vector(*q)) * v
    })
}

/// Spherical linear interpolation along the shortest arc.
///
/// `t = 0` returns `q0` and `t = 1` returns `q1` or `−q1`, whichever is closer to `q0`.
/// Nearly identical endpoints are interpolated linearly and renormalised.
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape, `InvalidInput` for a
/// non-finite `t`.
pub fn unitquat_slerp<T: RealScalar>(
    q0: &UnitquatBatch<T>,
    q1: &UnitquatBatch<T>,
    t: T,
    config: &MappingConfig,
) -> RotationResult<UnitquatBatch<T>> {
    if !t.is_finite() {
        return Err(RotationError::InvalidInput(
            "slerp parameter must be finite".to_string(),
        ));
    }
    q0.zip_map(q1, config.execution, |a, b| slerp_item(a, b, t))
}

fn slerp_item<T: RealScalar>(q0: &Vector4<T>, q1: &Vector4<T>, t: T) -> Vector4<T> {
    let mut dot = q0.dot(q1);
    let q1 = if dot < T::zero() {
        dot = -dot;
        -q1
    } else {
        *q1
    };

    if dot > cst::<T>(SLERP_LINEAR_THRESHOLD) {
        return (q0 + (q1 - q0) * t).normalize();
    }

    let angle = dot.min(T::one()).acos();
    let sin_angle = angle.sin();
    let w0 = ((T::one() - t) * angle).sin() / sin_angle;
    let w1 = (t * angle).sin() / sin_angle;
    q0 * w0 + q1 * w1
}

/// Inverse (transpose) of every rotation matrix.
pub fn rotmat_inverse<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotmatBatch<T> {
    matrices.map(config.execution, |m| m.transpose())
}

/// Composition `R₁ R₂` of paired rotation matrices.
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn rotmat_composition<T: RealScalar>(
    first: &RotmatBatch<T>,
    second: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<RotmatBatch<T>> {
    first.zip_map(second, config.execution, |a, b| a * b)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mappings::rotvec::{rotvec_to_rotmat, rotvec_to_unitquat};
    use crate::mappings::unitquat::unitquat_to_rotmat;
    use crate::random::random_unitquat;
    use nalgebra::Matrix3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_PI_2;

    fn sign_invariant_distance(a: &Vector4<f64>, b: &Vector4<f64>) -> f64 {
        (a - b).norm().min((a + b).norm())
    }

    #[test]
    fn test_conjugation_is_inverse_for_unit_quaternions() {
        let config = MappingConfig::default();
        let mut rng = StdRng::seed_from_u64(666);
        let q = random_unitquat::<f64, _>(20, &mut rng);
        let conj = quat_conjugation(&q, &config);
        let inv = quat_inverse(&q, &config);
        for (c, i) in conj.iter().zip(inv.iter()) {
            assert!((c - i).norm() < 1e-12);
        }

        let product = quat_product(&q, &conj, &config).unwrap();
        for p in product.iter() {
            assert!((p - Vector4::new(0.0, 0.0, 0.0, 1.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_inverse_of_scaled_quaternion() {
        let config = MappingConfig::default();
        let q = Batch::single(Vector4::new(0.0, 0.0, 0.0, 2.0));
        let inv = quat_inverse(&q, &config);
        assert!((inv.items()[0] - Vector4::new(0.0, 0.0, 0.0, 0.5)).norm() < 1e-15);
        let n = quat_normalize(&q, &config);
        assert_eq!(n.items()[0], Vector4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_product_matches_matrix_composition() {
        let config = MappingConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let p = random_unitquat::<f64, _>(20, &mut rng);
        let q = random_unitquat::<f64, _>(20, &mut rng);

        let pq = quat_product(&p, &q, &config).unwrap();
        let r_pq = unitquat_to_rotmat(&pq, &config);
        let r_composed = rotmat_composition(
            &unitquat_to_rotmat(&p, &config),
            &unitquat_to_rotmat(&q, &config),
            &config,
        )
        .unwrap();
        for (a, b) in r_pq.iter().zip(r_composed.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_action_matches_matrix_product() {
        let config = MappingConfig::default();
        let q = rotvec_to_unitquat(&Batch::single(Vector3::new(0.0, 0.0, FRAC_PI_2)), &config);
        let v = Batch::single(Vector3::new(1.0, 0.0, 0.0));
        let rotated = quat_action(&q, &v, &config).unwrap();
        assert!((rotated.items()[0] - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_rotmat_inverse() {
        let config = MappingConfig::default();
        let r = rotvec_to_rotmat(&Batch::from_items(vec![Vector3::new(0.1, -0.4, 2.0)]), &config);
        let r_inv = rotmat_inverse(&r, &config);
        let identity = rotmat_composition(&r, &r_inv, &config).unwrap();
        assert!((identity.items()[0] - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let config = MappingConfig::default();
        let q0 = Batch::single(Vector4::new(0.0, 0.0, 0.0, 1.0));
        let q1 = rotvec_to_unitquat(&Batch::single(Vector3::new(0.0, 0.0, FRAC_PI_2)), &config);

        let start = unitquat_slerp(&q0, &q1, 0.0, &config).unwrap();
        let end = unitquat_slerp(&q0, &q1, 1.0, &config).unwrap();
        assert!(sign_invariant_distance(&start.items()[0], &q0.items()[0]) < 1e-12);
        assert!(sign_invariant_distance(&end.items()[0], &q1.items()[0]) < 1e-12);

        let mid = unitquat_slerp(&q0, &q1, 0.5, &config).unwrap();
        let expected = rotvec_to_unitquat(
            &Batch::single(Vector3::new(0.0, 0.0, FRAC_PI_2 / 2.0)),
            &config,
        );
        assert!(sign_invariant_distance(&mid.items()[0], &expected.items()[0]) < 1e-12);
    }

    #[test]
    fn test_slerp_takes_shortest_arc() {
        let config = MappingConfig::default();
        let q0 = Batch::single(Vector4::new(0.0, 0.0, 0.0, 1.0));
        let q1 = rotvec_to_unitquat(&Batch::single(Vector3::new(0.0, 0.0, 0.2)), &config);
        let q1_neg = q1.map(config.execution, |q| -q);

        let a = unitquat_slerp(&q0, &q1, 0.3, &config).unwrap();
        let b = unitquat_slerp(&q0, &q1_neg, 0.3, &config).unwrap();
        assert!((a.items()[0] - b.items()[0]).norm() < 1e-12);
    }

    #[test]
    fn test_slerp_identical_endpoints() {
        let config = MappingConfig::default();
        let q = Batch::single(Vector4::new(0.0, 0.0, 0.0, 1.0));
        let s = unitquat_slerp(&q, &q, 0.7, &config).unwrap();
        assert!(s.items()[0].iter().all(|x: &f64| x.is_finite()));
        assert!((s.items()[0] - q.items()[0]).norm() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_and_bad_parameter() {
        let config = MappingConfig::default();
        let a = Batch::from_items(vec![Vector4::new(0.0, 0.0, 0.0, 1.0); 2]);
        let b = Batch::from_items(vec![Vector4::new(0.0, 0.0, 0.0, 1.0); 3]);
        assert!(matches!(
            quat_product(&a, &b, &config),
            Err(RotationError::BatchShapeMismatch { .. })
        ));
        assert!(matches!(
            unitquat_slerp(&a, &a, f64::NAN, &config),
            Err(RotationError::InvalidInput(_))
        ));
    }
}
