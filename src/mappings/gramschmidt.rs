//! Special Gram-Schmidt construction of rotation matrices from two generator columns.

use crate::batch::{Batch, RealScalar, RotmatBatch};
use crate::config::MappingConfig;
use crate::mappings::cst;
use nalgebra::{Matrix3, Matrix3x2};
use tracing::{debug, warn};

/// Relative residual norm below which the two generators are reported as near-parallel
const PARALLEL_THRESHOLD: f64 = 1e-6;

/// Build a proper rotation matrix from every `[a | b]` input.
///
/// # Notes
/// e₁ = a / ‖a‖
/// e₂ = (b − (e₁·b) e₁) / ‖b − (e₁·b) e₁‖
/// e₃ = e₁ × e₂
/// R = [e₁ | e₂ | e₃]
///
/// The result is a valid rotation whenever `a ≠ 0` and `b` is not parallel to `a`.
/// Near-parallel generators are not guarded: the output is ill-conditioned and a
/// warning is logged.
pub fn special_gramschmidt<T: RealScalar>(
    generators: &Batch<Matrix3x2<T>>,
    config: &MappingConfig,
) -> RotmatBatch<T> {
    debug!(
        batch_size = generators.len(),
        execution = %config.execution,
        "special Gram-Schmidt"
    );
    generators.map(config.execution, special_gramschmidt_item)
}

pub(crate) fn special_gramschmidt_item<T: RealScalar>(m: &Matrix3x2<T>) -> Matrix3<T> {
    let a = m.column(0).into_owned();
    let b = m.column(1).into_owned();

    let e1 = a.normalize();
    let residual = b - e1 * e1.dot(&b);
    let residual_norm = residual.norm();
    if residual_norm <= b.norm() * cst::<T>(PARALLEL_THRESHOLD) {
        warn!("Gram-Schmidt generators are nearly parallel, rotation is ill-conditioned");
    }
    let e2 = residual / residual_norm;
    let e3 = e1.cross(&e2);

    Matrix3::from_columns(&[e1, e2, e3])
}
