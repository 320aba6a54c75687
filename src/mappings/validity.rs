//! Validity predicates for batches of 3×3 matrices.

use crate::batch::{Batch, RealScalar, RotmatBatch};
use crate::config::MappingConfig;
use crate::mappings::cst;
use nalgebra::Matrix3;

/// Per-item check of `‖MᵀM − I‖_F < epsilon`.
///
/// The tolerance is [`MappingConfig::epsilon`]. Use [`Batch::all`] to collapse the
/// result into a single boolean.
pub fn is_orthonormal_matrix<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> Batch<bool> {
    let epsilon: T = cst(config.epsilon);
    matrices.map(config.execution, |m| is_orthonormal(m, epsilon))
}

/// Per-item check that a matrix is orthonormal and proper (`det M = +1`).
///
/// Orthonormal matrices have `det M = ±1`, so properness reduces to a positive
/// determinant once orthonormality holds.
pub fn is_rotation_matrix<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> Batch<bool> {
    let epsilon: T = cst(config.epsilon);
    matrices.map(config.execution, |m| is_rotation(m, epsilon))
}

pub(crate) fn is_orthonormal<T: RealScalar>(m: &Matrix3<T>, epsilon: T) -> bool {
    (m.transpose() * m - Matrix3::identity()).norm() < epsilon
}

pub(crate) fn is_rotation<T: RealScalar>(m: &Matrix3<T>, epsilon: T) -> bool {
    is_orthonormal(m, epsilon) && m.determinant() > T::zero()
}
