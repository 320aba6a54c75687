//! Batched conversions and projections between 3D rotation representations.
//!
//! Rotation matrices, unit quaternions, rotation vectors, special Gram-Schmidt
//! generators and symmatrixvecs are stored as [`Batch`]es of fixed-size nalgebra items.
//! Every mapping in [`mappings`] is a pure per-item function applied over the batch,
//! sequentially or on rayon's thread pool as selected by [`MappingConfig`].
//!
//! ```
//! use apex_rotations::{mappings, random_unitquat, MappingConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let config = MappingConfig::default();
//! let mut rng = StdRng::seed_from_u64(0);
//! let q = random_unitquat::<f64, _>(16, &mut rng);
//! let r = mappings::unitquat_to_rotmat(&q, &config);
//! let q_back = mappings::rotmat_to_unitquat(&r, &config);
//! assert_eq!(q_back.batch_shape(), &[16]);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod logger;
pub mod mappings;
pub mod random;

pub use batch::{
    Batch, BatchItem, RealScalar, RotmatBatch, RotvecBatch, Symmatrixvec, UnitquatBatch,
};
pub use config::{Execution, MappingConfig};
pub use error::{RotationError, RotationResult};
pub use logger::{init_logger, init_logger_with_level};
pub use mappings::*;
pub use random::{
    identity_quat, random_rotmat, random_rotvec, random_unitquat, random_unitquat_thread_rng,
};
