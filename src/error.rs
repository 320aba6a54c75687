//! Error types for the apex-rotations library
//!
//! This module provides the main error and result types used throughout the library.
//! All errors use the `thiserror` crate for automatic trait implementations.
//!
//! Only precondition violations and failures of the underlying decomposition
//! primitives are reported as errors. Numerically degenerate inputs (zero angles,
//! near-parallel Gram-Schmidt columns) produce a finite result instead.

use thiserror::Error;

/// Main result type used throughout the apex-rotations library
pub type RotationResult<T> = Result<T, RotationError>;

/// Main error type for the apex-rotations library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotationError {
    /// Trailing dimensions of a flat input do not match the item shape
    #[error("Invalid shape for {name}: expected trailing dimensions {expected:?}, got {actual:?}")]
    InvalidShape {
        name: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Number of values does not match the requested shape
    #[error("Element count mismatch: shape {shape:?} holds {expected} values, got {actual}")]
    ElementCount {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Two operands of a binary operation have different batch shapes
    #[error("Batch shape mismatch: {left:?} vs {right:?}")]
    BatchShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// SVD or eigendecomposition did not produce a result
    #[error("Decomposition error: {0}")]
    Decomposition(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
