//! Random rotations for sampling and testing.
//!
//! Unit quaternions drawn from a normalised 4D standard normal are uniformly
//! distributed over the rotation group. All generators draw from a caller-owned
//! [`rand::Rng`] on the calling thread, so a seeded RNG gives reproducible batches.

use crate::batch::{Batch, RealScalar, RotmatBatch, RotvecBatch, UnitquatBatch};
use crate::mappings::cst;
use crate::mappings::rotvec::unitquat_to_rotvec_item;
use crate::mappings::unitquat::unitquat_to_rotmat_item;
use nalgebra::Vector4;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Samples whose norm falls below this value are redrawn before normalisation
const MIN_SAMPLE_NORM: f64 = 1e-8;

/// Draw `n` uniformly distributed unit quaternions, shape `(n)`.
///
/// # Example
/// ```
/// use apex_rotations::random_unitquat;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let q = random_unitquat::<f64, _>(8, &mut rng);
/// assert_eq!(q.shape(), vec![8, 4]);
/// ```
pub fn random_unitquat<T: RealScalar, R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> UnitquatBatch<T> {
    Batch::from_items((0..n).map(|_| sample_unitquat(&mut *rng)).collect())
}

/// [`random_unitquat`] using the thread-local RNG.
pub fn random_unitquat_thread_rng<T: RealScalar>(n: usize) -> UnitquatBatch<T> {
    random_unitquat(n, &mut rand::thread_rng())
}

/// Draw `n` uniformly distributed rotation matrices.
pub fn random_rotmat<T: RealScalar, R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> RotmatBatch<T> {
    Batch::from_items(
        (0..n)
            .map(|_| unitquat_to_rotmat_item(&sample_unitquat::<T, R>(&mut *rng)))
            .collect(),
    )
}

/// Draw `n` rotation vectors of uniformly distributed rotations (angles in `[0, π]`).
pub fn random_rotvec<T: RealScalar, R: Rng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> RotvecBatch<T> {
    Batch::from_items(
        (0..n)
            .map(|_| unitquat_to_rotvec_item(&sample_unitquat::<T, R>(&mut *rng)))
            .collect(),
    )
}

/// Identity quaternions `(0, 0, 0, 1)` with the given batch shape.
pub fn identity_quat<T: RealScalar>(batch_shape: &[usize]) -> UnitquatBatch<T> {
    Batch::from_elem(
        batch_shape,
        Vector4::new(T::zero(), T::zero(), T::zero(), T::one()),
    )
}

fn sample_unitquat<T: RealScalar, R: Rng + ?Sized>(rng: &mut R) -> Vector4<T> {
    loop {
        let sample: Vector4<f64> = Vector4::from_fn(|_, _| StandardNormal.sample(&mut *rng));
        let norm = sample.norm();
        if norm > MIN_SAMPLE_NORM {
            return (sample / norm).map(cst::<T>);
        }
    }
}
