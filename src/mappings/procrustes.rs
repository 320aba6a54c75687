//! Orthogonal Procrustes projections of arbitrary 3×3 matrices.
//!
//! Given a matrix `M = U S Vᵀ`, the orthonormal matrix closest to `M` in Frobenius norm
//! is `U Vᵀ`. The closest *proper* rotation flips the singular direction with the
//! smallest singular value whenever `det(U Vᵀ) < 0`, which yields
//! `U diag(1, 1, −1) Vᵀ` for singular values sorted in decreasing order.
//!
//! Both projections are idempotent on their output set and accept singular or
//! rank-deficient inputs, for which the nearest point is well defined but not unique.

use crate::batch::{Batch, RealScalar, RotmatBatch};
use crate::config::MappingConfig;
use crate::error::{RotationError, RotationResult};
use crate::mappings::cst;
use nalgebra::{Matrix3, Vector3};
use tracing::debug;

/// Options of [`procrustes_with`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcrustesOptions {
    /// Restrict the output to proper rotations (`det = +1`)
    pub force_rotation: bool,
    /// Weight `λ ≥ 0` of a penalty `λ‖R − I‖²_F`, applied as `M + λI`
    pub regularization: f64,
}

impl ProcrustesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_force_rotation(mut self, force_rotation: bool) -> Self {
        self.force_rotation = force_rotation;
        self
    }

    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    fn validate(&self) -> RotationResult<()> {
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(RotationError::InvalidInput(format!(
                "regularization must be finite and non-negative, got {}",
                self.regularization
            )));
        }
        Ok(())
    }
}

/// Projected matrices together with the singular values of the (regularized) input.
///
/// When a reflection was corrected, the singular value of the flipped direction is
/// reported with a negative sign.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcrustesOutput<T: RealScalar> {
    pub rotations: RotmatBatch<T>,
    pub singular_values: Batch<Vector3<T>>,
}

/// Nearest orthonormal matrix of every item (`det` may be −1).
pub fn procrustes<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<RotmatBatch<T>> {
    Ok(procrustes_with(matrices, &ProcrustesOptions::new(), config)?.rotations)
}

/// Nearest proper rotation matrix of every item.
pub fn special_procrustes<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    config: &MappingConfig,
) -> RotationResult<RotmatBatch<T>> {
    let options = ProcrustesOptions::new().with_force_rotation(true);
    Ok(procrustes_with(matrices, &options, config)?.rotations)
}

/// Procrustes projection with explicit options.
///
/// # Arguments
/// * `matrices` - Arbitrary 3×3 matrices
/// * `options` - Properness constraint and identity regularization
/// * `config` - Execution mode
///
/// # Errors
/// `InvalidInput` for a negative or non-finite regularization weight or tolerance, and
/// `Decomposition` if the SVD does not return both singular-vector factors.
pub fn procrustes_with<T: RealScalar>(
    matrices: &RotmatBatch<T>,
    options: &ProcrustesOptions,
    config: &MappingConfig,
) -> RotationResult<ProcrustesOutput<T>> {
    options.validate()?;
    config.validate()?;
    debug!(
        batch_size = matrices.len(),
        execution = %config.execution,
        force_rotation = options.force_rotation,
        "procrustes projection"
    );

    let regularization: T = cst(options.regularization);
    let projected = matrices.try_map(config.execution, |m| {
        project(m, regularization, options.force_rotation)
    })?;

    let batch_shape = projected.batch_shape().to_vec();
    let (rotations, singular_values): (Vec<_>, Vec<_>) =
        projected.into_items().into_iter().unzip();

    Ok(ProcrustesOutput {
        rotations: Batch::new(&batch_shape, rotations)?,
        singular_values: Batch::new(&batch_shape, singular_values)?,
    })
}

fn project<T: RealScalar>(
    m: &Matrix3<T>,
    regularization: T,
    force_rotation: bool,
) -> RotationResult<(Matrix3<T>, Vector3<T>)> {
    let target = if regularization > T::zero() {
        m + Matrix3::identity() * regularization
    } else {
        *m
    };

    let svd = target.svd(true, true);
    let mut u = svd
        .u
        .ok_or_else(|| RotationError::Decomposition("SVD did not return U".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| RotationError::Decomposition("SVD did not return Vᵀ".to_string()))?;
    let mut singular_values = svd.singular_values;

    if force_rotation && (u * v_t).determinant() < T::zero() {
        let smallest = singular_values.imin();
        debug!(column = smallest, "correcting reflection");
        u.column_mut(smallest).neg_mut();
        singular_values[smallest] = -singular_values[smallest];
    }

    Ok((u * v_t, singular_values))
}
