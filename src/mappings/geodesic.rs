//! Geodesic (angular) distances between paired rotations.
//!
//! All distances are the rotation angle of `R₁ᵀ R₂`, in radians within `[0, π]`.

use crate::batch::{Batch, RealScalar, RotmatBatch, RotvecBatch, UnitquatBatch};
use crate::config::MappingConfig;
use crate::error::RotationResult;
use crate::mappings::cst;
use crate::mappings::rotvec::rotvec_to_unitquat_item;
use nalgebra::{Matrix3, Vector4};
use std::f64::consts::SQRT_2;

/// Angle between paired rotation matrices.
///
/// # Notes
/// d = 2·asin(min(1, ‖R₁ − R₂‖_F / (2√2)))
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn rotmat_geodesic_distance<T: RealScalar>(
    first: &RotmatBatch<T>,
    second: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<Batch<T>> {
    first.zip_map(second, config.execution, rotmat_distance)
}

/// Angle between paired unit quaternions, invariant to the sign of either input.
///
/// # Notes
/// d = 4·asin(½·min(‖q₁ − q₂‖, ‖q₁ + q₂‖))
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn unitquat_geodesic_distance<T: RealScalar>(
    first: &UnitquatBatch<T>,
    second: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<Batch<T>> {
    first.zip_map(second, config.execution, unitquat_distance)
}

/// Angle between the rotations of paired rotation vectors.
///
/// # Errors
/// `BatchShapeMismatch` if the two batches differ in batch shape.
pub fn rotvec_geodesic_distance<T: RealScalar>(
    first: &RotvecBatch<T>,
    second: &RotvecBatch<T>,
    config: &MappingConfig,
) -> RotationResult<Batch<T>> {
    first.zip_map(second, config.execution, |a, b| {
        unitquat_distance(&rotvec_to_unitquat_item(a), &rotvec_to_unitquat_item(b))
    })
}

fn rotmat_distance<T: RealScalar>(a: &Matrix3<T>, b: &Matrix3<T>) -> T {
    let half_chord = (a - b).norm() / cst::<T>(2.0 * SQRT_2);
    cst::<T>(2.0) * half_chord.min(T::one()).asin()
}

fn unitquat_distance<T: RealScalar>(a: &Vector4<T>, b: &Vector4<T>) -> T {
    let chord = (a - b).norm().min((a + b).norm());
    cst::<T>(4.0) * (chord * cst::<T>(0.5)).min(T::one()).asin()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::RotationError;
    use crate::mappings::rotvec::{rotvec_to_rotmat, rotvec_to_unitquat};
    use nalgebra::Vector3;
    use std::f64::consts::PI;

    #[test]
    fn test_distances_agree_on_known_angles() {
        let config = MappingConfig::default();
        let angles = [0.0, 1e-4, 0.3, 1.0, 2.5, PI - 1e-3];
        let identity = Batch::from_items(vec![Vector3::<f64>::zeros(); angles.len()]);
        let rotvecs = Batch::from_items(
            angles
                .iter()
                .map(|&a| Vector3::new(1.0, 2.0, -2.0).normalize() * a)
                .collect(),
        );

        let by_rotvec = rotvec_geodesic_distance(&identity, &rotvecs, &config).unwrap();
        let by_quat = unitquat_geodesic_distance(
            &rotvec_to_unitquat(&identity, &config),
            &rotvec_to_unitquat(&rotvecs, &config),
            &config,
        )
        .unwrap();
        let by_rotmat = rotmat_geodesic_distance(
            &rotvec_to_rotmat(&identity, &config),
            &rotvec_to_rotmat(&rotvecs, &config),
            &config,
        )
        .unwrap();

        for (i, angle) in angles.iter().enumerate() {
            assert!((by_rotvec.items()[i] - angle).abs() < 1e-9);
            assert!((by_quat.items()[i] - angle).abs() < 1e-9);
            assert!((by_rotmat.items()[i] - angle).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quaternion_distance_ignores_sign() {
        let config = MappingConfig::default();
        let q = Batch::single(Vector4::new(0.0, 0.6, 0.0, 0.8));
        let q_neg = q.map(config.execution, |q| -q);
        let d = unitquat_geodesic_distance(&q, &q_neg, &config).unwrap();
        assert_eq!(d.items()[0], 0.0);
    }

    #[test]
    fn test_half_turn_distance_is_pi() {
        let config = MappingConfig::default();
        let a = Batch::single(Matrix3::<f64>::identity());
        let b = Batch::single(Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0)));
        let d = rotmat_geodesic_distance(&a, &b, &config).unwrap();
        assert!((d.items()[0] - PI).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let config = MappingConfig::default();
        let a = Batch::from_items(vec![Vector3::<f64>::zeros(); 2]);
        let b = Batch::single(Vector3::<f64>::zeros());
        assert!(matches!(
            rotvec_geodesic_distance(&a, &b, &config),
            Err(RotationError::BatchShapeMismatch { .. })
        ));
    }
}
