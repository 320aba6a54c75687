//! Conversions between unit quaternions and rotation matrices.
//!
//! Quaternions are stored as `Vector4` in (x, y, z, w) order, which is also the
//! coordinate order of `nalgebra::Quaternion::coords`.

use crate::batch::{RealScalar, RotmatBatch, UnitquatBatch};
use crate::config::MappingConfig;
use crate::mappings::cst;
use nalgebra::{Matrix3, Vector4};
use tracing::debug;

/// Rotation matrix of every unit quaternion.
///
/// # Notes
/// R = ⎡1 − 2(y² + z²)   2(xy − zw)      2(xz + yw)    ⎤
///     ⎢2(xy + zw)       1 − 2(x² + z²)  2(yz − xw)    ⎥
///     ⎣2(xz − yw)       2(yz + xw)      1 − 2(x² + y²)⎦
///
/// No branching; the input is assumed to have unit norm.
pub fn unitquat_to_rotmat<T: RealScalar>(
    quaternions: &UnitquatBatch<T>,
    config: &MappingConfig,
) -> RotmatBatch<T> {
    debug!(
        batch_size = quaternions.len(),
        execution = %config.execution,
        "unitquat to rotmat"
    );
    quaternions.map(config.execution, unitquat_to_rotmat_item)
}

/// Unit quaternion of every rotation matrix.
///
/// Selects the best conditioned of four closed-form extractions from the largest of
/// `(M₀₀, M₁₁, M₂₂, trace)`, then normalises. The sign of the result is not
/// canonicalised: `q` and `−q` are the same rotation.
pub fn rotmat_to_unitquat<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> UnitquatBatch<T> {
    debug!(
        batch_size = matrices.len(),
        execution = %config.execution,
        "rotmat to unitquat"
    );
    matrices.map(config.execution, rotmat_to_unitquat_item)
}

pub(crate) fn unitquat_to_rotmat_item<T: RealScalar>(q: &Vector4<T>) -> Matrix3<T> {
    let (x, y, z, w) = (q[0], q[1], q[2], q[3]);
    let two: T = cst(2.0);

    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (xw, yw, zw) = (x * w, y * w, z * w);

    Matrix3::new(
        T::one() - two * (yy + zz),
        two * (xy - zw),
        two * (xz + yw),
        two * (xy + zw),
        T::one() - two * (xx + zz),
        two * (yz - xw),
        two * (xz - yw),
        two * (yz + xw),
        T::one() - two * (xx + yy),
    )
}

pub(crate) fn rotmat_to_unitquat_item<T: RealScalar>(m: &Matrix3<T>) -> Vector4<T> {
    let trace = m.trace();
    let candidates = Vector4::new(m[(0, 0)], m[(1, 1)], m[(2, 2)], trace);
    let choice = candidates.imax();

    let two: T = cst(2.0);
    let q = if choice == 3 {
        Vector4::new(
            m[(2, 1)] - m[(1, 2)],
            m[(0, 2)] - m[(2, 0)],
            m[(1, 0)] - m[(0, 1)],
            T::one() + trace,
        )
    } else {
        // axis branch: i is the dominant diagonal entry, (j, k) follow cyclically
        let i = choice;
        let j = (i + 1) % 3;
        let k = (j + 1) % 3;
        let mut q = Vector4::zeros();
        q[i] = T::one() - trace + two * m[(i, i)];
        q[j] = m[(j, i)] + m[(i, j)];
        q[k] = m[(k, i)] + m[(i, k)];
        q[3] = m[(k, j)] - m[(j, k)];
        q
    };

    q.normalize()
}
