//! Rotation vector (axis × angle) conversions.
//!
//! The quaternion direction uses the exponential map of S³ and the reverse direction
//! its logarithm. Both switch to a Taylor expansion below [`SMALL_ANGLE`] so that the
//! zero rotation and angles close to machine precision stay exact.

use crate::batch::{RealScalar, RotmatBatch, RotvecBatch, UnitquatBatch};
use crate::config::MappingConfig;
use crate::mappings::cst;
use crate::mappings::unitquat::{rotmat_to_unitquat_item, unitquat_to_rotmat_item};
use nalgebra::{Vector3, Vector4};
use tracing::debug;

/// Angle below which the series expansions are used.
const SMALL_ANGLE: f64 = 1e-3;

/// Unit quaternion of every rotation vector.
///
/// # Notes
/// q = (sin(θ/2)/θ · v, cos(θ/2)), θ = ‖v‖
///
/// For θ ≤ 1e-3: sin(θ/2)/θ ≈ 1/2 − θ²/48 + θ⁴/3840
pub fn rotvec_to_unitquat<T: RealScalar>(
    rotvecs: &RotvecBatch<T>,
    config: &MappingConfig,
) -> UnitquatBatch<T> {
    debug!(
        batch_size = rotvecs.len(),
        execution = %config.execution,
        "rotvec to unitquat"
    );
    rotvecs.map(config.execution, rotvec_to_unitquat_item)
}

/// Rotation vector of every unit quaternion, with angle in `[0, π]`.
///
/// # Notes
/// θ = 2·atan2(‖q_vec‖, w), v = θ / sin(θ/2) · q_vec
///
/// The quaternion is first brought to the hemisphere `w ≥ 0`, so `q` and `−q` give
/// the same vector. For θ ≤ 1e-3: θ / sin(θ/2) ≈ 2 + θ²/12 + 7θ⁴/2880
pub fn unitquat_to_rotvec<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> RotvecBatch<T> {
    debug!(
        batch_size = quaternions.len(),
        execution = %config.execution,
        "unitquat to rotvec"
    );
    quaternions.map(config.execution, unitquat_to_rotvec_item)
}

/// Rotation matrix of every rotation vector, through the unit quaternion.
pub fn rotvec_to_rotmat<T: RealScalar>(
    rotvecs: &RotvecBatch<T>,
    config: &MappingConfig,
) -> RotmatBatch<T> {
    debug!(
        batch_size = rotvecs.len(),
        execution = %config.execution,
        "rotvec to rotmat"
    );
    rotvecs.map(config.execution, |v| {
        unitquat_to_rotmat_item(&rotvec_to_unitquat_item(v))
    })
}

/// Rotation vector of every rotation matrix, through the unit quaternion.
pub fn rotmat_to_rotvec<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotvecBatch<T> {
    debug!(
        batch_size = matrices.len(),
        execution = %config.execution,
        "rotmat to rotvec"
    );
    matrices.map(config.execution, |m| {
        unitquat_to_rotvec_item(&rotmat_to_unitquat_item(m))
    })
}

pub(crate) fn rotvec_to_unitquat_item<T: RealScalar>(v: &Vector3<T>) -> Vector4<T> {
    let theta = v.norm();
    let half_theta = theta * cst::<T>(0.5);

    let scale = if theta <= cst::<T>(SMALL_ANGLE) {
        let theta2 = theta * theta;
        cst::<T>(0.5) - theta2 / cst::<T>(48.0) + theta2 * theta2 / cst::<T>(3840.0)
    } else {
        half_theta.sin() / theta
    };

    Vector4::new(v.x * scale, v.y * scale, v.z * scale, half_theta.cos())
}

pub(crate) fn unitquat_to_rotvec_item<T: RealScalar>(q: &Vector4<T>) -> Vector3<T> {
    let q = if q[3] < T::zero() { -q } else { *q };
    let imaginary = q.xyz();
    let sin_half = imaginary.norm();
    let theta = cst::<T>(2.0) * sin_half.atan2(q[3]);

    let scale = if theta <= cst::<T>(SMALL_ANGLE) {
        let theta2 = theta * theta;
        cst::<T>(2.0)
            + theta2 / cst::<T>(12.0)
            + cst::<T>(7.0) * theta2 * theta2 / cst::<T>(2880.0)
    } else {
        theta / sin_half
    };

    imaginary * scale
}
