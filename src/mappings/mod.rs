//! Batched mappings between 3D rotation representations.
//!
//! This module provides conversions and projections between:
//! - **Rotation matrices** (`Matrix3<T>`, proper orthonormal)
//! - **Unit quaternions** (`Vector4<T>` ordered as x, y, z, w)
//! - **Rotation vectors** (`Vector3<T>`, axis scaled by angle)
//! - **Special Gram-Schmidt inputs** (`Matrix3x2<T>`, two generator columns)
//! - **Symmatrixvecs** (`SVector<f64, 10>`, upper triangle of a symmetric 4×4)
//!
//! Representation | Item shape | Constraint         | Ambiguity
//! -------------- | ---------- | ------------------ | -----------------------------------
//! Rotation matrix| (3, 3)     | RᵀR = I, det R = 1 | none
//! Unit quaternion| (4,)       | ‖q‖ = 1            | q ≡ −q (double cover)
//! Rotation vector| (3,)       | none               | 2π periodic, axis undefined at θ = 0
//! Gram-Schmidt   | (3, 2)     | independent columns| many inputs per rotation
//! Symmatrixvec   | (10,)      | none               | eigenvector sign, scale
//!
//! Every mapping is a pure per-item function applied over a [`Batch`](crate::Batch)
//! according to [`MappingConfig::execution`](crate::MappingConfig). Inputs are never
//! mutated; batch shapes are preserved.
//!
//! # Example
//!
//! ```
//! use apex_rotations::{mappings, Batch, MappingConfig};
//! use nalgebra::Vector3;
//!
//! let config = MappingConfig::default();
//! let rotvecs = Batch::from_items(vec![Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2)]);
//! let rotmats = mappings::rotvec_to_rotmat(&rotvecs, &config);
//! assert!(mappings::is_rotation_matrix(&rotmats, &config).all());
//! ```

use crate::batch::RealScalar;

pub mod algebra;
pub mod geodesic;
pub mod gramschmidt;
pub mod procrustes;
pub mod rotvec;
pub mod symmatrix;
pub mod unitquat;
pub mod validity;

pub use algebra::{
    quat_action, quat_conjugation, quat_inverse, quat_normalize, quat_product,
    rotmat_composition, rotmat_inverse, unitquat_slerp,
};
pub use geodesic::{rotmat_geodesic_distance, rotvec_geodesic_distance, unitquat_geodesic_distance};
pub use gramschmidt::special_gramschmidt;
pub use procrustes::{
    procrustes, procrustes_with, special_procrustes, ProcrustesOptions, ProcrustesOutput,
};
pub use rotvec::{rotmat_to_rotvec, rotvec_to_rotmat, rotvec_to_unitquat, unitquat_to_rotvec};
pub use symmatrix::{symmatrix_to_unitquat, symmatrixvec_to_symmatrix, symmatrixvec_to_unitquat};
pub use unitquat::{rotmat_to_unitquat, unitquat_to_rotmat};
pub use validity::{is_orthonormal_matrix, is_rotation_matrix};

/// Convert an `f64` constant into the working scalar type.
#[inline]
pub(crate) fn cst<T: RealScalar>(value: f64) -> T {
    nalgebra::convert(value)
}
