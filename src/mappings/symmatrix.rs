//! Unit quaternions from symmetric 4×4 matrices.
//!
//! A symmatrixvec holds the ten upper-triangular entries of a symmetric matrix `A`,
//! read row by row: `(0,0) (0,1) (0,2) (0,3) (1,1) (1,2) (1,3) (2,2) (2,3) (3,3)`.
//! The quaternion is the unit eigenvector of the largest eigenvalue of `A`, defined
//! up to sign.
//!
//! These mappings are only offered for `f64`: the iterative symmetric
//! eigendecomposition is not accurate enough in single precision.

use crate::batch::{Batch, Symmatrixvec, UnitquatBatch};
use crate::config::MappingConfig;
use crate::error::{RotationError, RotationResult};
use nalgebra::{Matrix4, SymmetricEigen, Vector4};
use tracing::debug;

/// Upper-triangle positions stored in a symmatrixvec
const TRIU_INDICES: [(usize, usize); 10] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 1),
    (1, 2),
    (1, 3),
    (2, 2),
    (2, 3),
    (3, 3),
];

/// Rebuild the symmetric 4×4 matrix of every symmatrixvec.
pub fn symmatrixvec_to_symmatrix(
    vectors: &Batch<Symmatrixvec<f64>>,
    config: &MappingConfig,
) -> Batch<Matrix4<f64>> {
    vectors.map(config.execution, symmatrixvec_to_symmatrix_item)
}

/// Unit quaternion of every symmatrixvec.
///
/// # Errors
/// `Decomposition` if an entry is not finite or the eigendecomposition does not
/// converge within [`MappingConfig::max_iterations`].
pub fn symmatrixvec_to_unitquat(
    vectors: &Batch<Symmatrixvec<f64>>,
    config: &MappingConfig,
) -> RotationResult<UnitquatBatch<f64>> {
    debug!(
        batch_size = vectors.len(),
        execution = %config.execution,
        max_iterations = config.max_iterations,
        "symmatrixvec to unitquat"
    );
    let max_iterations = config.max_iterations;
    vectors.try_map(config.execution, |x| {
        dominant_eigenvector(symmatrixvec_to_symmatrix_item(x), max_iterations)
    })
}

/// Unit quaternion of every symmetric 4×4 matrix.
///
/// # Errors
/// `InvalidInput` for an unusable tolerance or if a matrix is not symmetric within
/// [`MappingConfig::epsilon`] relative to its largest entry. `Decomposition` if the
/// eigendecomposition does not converge within [`MappingConfig::max_iterations`].
pub fn symmatrix_to_unitquat(
    matrices: &Batch<Matrix4<f64>>,
    config: &MappingConfig,
) -> RotationResult<UnitquatBatch<f64>> {
    debug!(
        batch_size = matrices.len(),
        execution = %config.execution,
        "symmatrix to unitquat"
    );
    config.validate()?;
    let epsilon = config.epsilon;
    let max_iterations = config.max_iterations;
    matrices.try_map(config.execution, |a| {
        let asymmetry = (a - a.transpose()).amax();
        if asymmetry > epsilon * a.amax().max(1.0) {
            return Err(RotationError::InvalidInput(format!(
                "matrix is not symmetric (max asymmetry {asymmetry:e})"
            )));
        }
        dominant_eigenvector(*a, max_iterations)
    })
}

fn symmatrixvec_to_symmatrix_item(x: &Symmatrixvec<f64>) -> Matrix4<f64> {
    let mut a = Matrix4::zeros();
    for (value, &(i, j)) in x.iter().zip(TRIU_INDICES.iter()) {
        a[(i, j)] = *value;
        a[(j, i)] = *value;
    }
    a
}

fn dominant_eigenvector(a: Matrix4<f64>, max_iterations: usize) -> RotationResult<Vector4<f64>> {
    // a NaN never satisfies the convergence test, and `imax` would pick column 0
    if !a.iter().all(|value| value.is_finite()) {
        return Err(RotationError::Decomposition(
            "symmetric matrix has non-finite entries".to_string(),
        ));
    }
    let eigen = SymmetricEigen::try_new(a, f64::EPSILON, max_iterations).ok_or_else(|| {
        RotationError::Decomposition(format!(
            "symmetric eigendecomposition did not converge within {max_iterations} iterations"
        ))
    })?;
    if !eigen.eigenvalues.iter().all(|value| value.is_finite()) {
        return Err(RotationError::Decomposition(
            "symmetric eigendecomposition produced non-finite eigenvalues".to_string(),
        ));
    }
    let largest = eigen.eigenvalues.imax();
    Ok(eigen.eigenvectors.column(largest).normalize())
}
