//! Batched storage for rotation representations.
//!
//! A [`Batch`] is a leading batch shape of arbitrary rank followed by one fixed-size
//! nalgebra item per entry. A rank-0 batch shape (`[]`) holds exactly one item.
//! Items are stored flat in row-major order of the batch shape, so a batch of shape
//! `[2, 5]` stores item `(i, j)` at position `5 * i + j`.
//!
//! All mappings in this crate are expressed as a pure per-item function applied
//! with [`Batch::map`], [`Batch::try_map`] or [`Batch::zip_map`]; the
//! [`Execution`] mode decides whether the items are processed on the calling
//! thread or spread over rayon's thread pool.
//!
//! # Flat import and export
//!
//! [`Batch::from_slice`] and [`Batch::to_vec`] exchange data with a flat
//! row-major buffer whose full shape is `batch_shape ++ item_shape`:
//!
//! | Item type      | Item shape | Representation             |
//! |----------------|------------|----------------------------|
//! | `Matrix3<T>`   | `[3, 3]`   | rotation matrix            |
//! | `Matrix3x2<T>` | `[3, 2]`   | special Gram-Schmidt input |
//! | `Matrix4<T>`   | `[4, 4]`   | symmetric 4×4 matrix       |
//! | `Vector3<T>`   | `[3]`      | rotation vector            |
//! | `Vector4<T>`   | `[4]`      | unit quaternion (x, y, z, w) |
//! | `SVector<T, 10>` | `[10]`   | symmatrixvec               |

use crate::config::Execution;
use crate::error::{RotationError, RotationResult};
use nalgebra::{Matrix3, Matrix3x2, Matrix4, RealField, SVector, Vector3, Vector4};
use rayon::prelude::*;

/// Floating point scalar accepted by the mappings (`f32` or `f64`).
pub trait RealScalar: RealField + Copy + Send + Sync {}

impl<T: RealField + Copy + Send + Sync> RealScalar for T {}

/// The 10 independent entries of a symmetric 4×4 matrix.
pub type Symmatrixvec<T> = SVector<T, 10>;

/// Batch of rotation matrices.
pub type RotmatBatch<T> = Batch<Matrix3<T>>;

/// Batch of unit quaternions stored as (x, y, z, w).
pub type UnitquatBatch<T> = Batch<Vector4<T>>;

/// Batch of rotation vectors.
pub type RotvecBatch<T> = Batch<Vector3<T>>;

/// Fixed-size item that can be stored in a [`Batch`] and exchanged as flat data.
pub trait BatchItem: Copy + Send + Sync {
    /// Scalar type of the item entries
    type Scalar: RealScalar;

    /// Human readable name used in shape errors
    const NAME: &'static str;

    /// Trailing dimensions of a flat buffer holding this item
    const ITEM_SHAPE: &'static [usize];

    /// Number of scalars in one item
    fn item_len() -> usize {
        Self::ITEM_SHAPE.iter().product()
    }

    /// Build an item from `item_len()` row-major values.
    fn from_row_major(values: &[Self::Scalar]) -> Self;

    /// Append the row-major values of this item to `out`.
    fn extend_row_major(&self, out: &mut Vec<Self::Scalar>);
}

macro_rules! impl_matrix_item {
    ($ty:ty, $name:expr, $rows:expr, $cols:expr) => {
        impl<T: RealScalar> BatchItem for $ty {
            type Scalar = T;
            const NAME: &'static str = $name;
            const ITEM_SHAPE: &'static [usize] = &[$rows, $cols];

            fn from_row_major(values: &[T]) -> Self {
                <$ty>::from_row_slice(values)
            }

            fn extend_row_major(&self, out: &mut Vec<T>) {
                for i in 0..$rows {
                    for j in 0..$cols {
                        out.push(self[(i, j)]);
                    }
                }
            }
        }
    };
}

macro_rules! impl_vector_item {
    ($ty:ty, $name:expr, $len:expr) => {
        impl<T: RealScalar> BatchItem for $ty {
            type Scalar = T;
            const NAME: &'static str = $name;
            const ITEM_SHAPE: &'static [usize] = &[$len];

            fn from_row_major(values: &[T]) -> Self {
                <$ty>::from_row_slice(values)
            }

            fn extend_row_major(&self, out: &mut Vec<T>) {
                out.extend(self.iter().copied());
            }
        }
    };
}

impl_matrix_item!(Matrix3<T>, "rotation matrix", 3, 3);
impl_matrix_item!(Matrix3x2<T>, "special Gram-Schmidt input", 3, 2);
impl_matrix_item!(Matrix4<T>, "symmetric matrix", 4, 4);
impl_vector_item!(Vector3<T>, "rotation vector", 3);
impl_vector_item!(Vector4<T>, "unit quaternion", 4);
impl_vector_item!(Symmatrixvec<T>, "symmatrixvec", 10);

/// A batch of items with an arbitrary leading batch shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<E> {
    batch_shape: Vec<usize>,
    items: Vec<E>,
}

impl<E> Batch<E> {
    /// Create a batch from its batch shape and items in row-major order.
    ///
    /// Fails if the number of items differs from the product of `batch_shape`.
    pub fn new(batch_shape: &[usize], items: Vec<E>) -> RotationResult<Self> {
        let expected: usize = batch_shape.iter().product();
        if expected != items.len() {
            return Err(RotationError::ElementCount {
                shape: batch_shape.to_vec(),
                expected,
                actual: items.len(),
            });
        }
        Ok(Self {
            batch_shape: batch_shape.to_vec(),
            items,
        })
    }

    /// Create a rank-1 batch.
    pub fn from_items(items: Vec<E>) -> Self {
        Self {
            batch_shape: vec![items.len()],
            items,
        }
    }

    /// Create a rank-0 batch holding a single item.
    pub fn single(item: E) -> Self {
        Self {
            batch_shape: Vec::new(),
            items: vec![item],
        }
    }

    /// Create a batch holding copies of `item` at every position of `batch_shape`.
    pub fn from_elem(batch_shape: &[usize], item: E) -> Self
    where
        E: Clone,
    {
        Self {
            batch_shape: batch_shape.to_vec(),
            items: vec![item; batch_shape.iter().product()],
        }
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.batch_shape
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    /// Reinterpret the batch shape, keeping item order.
    pub fn reshape(self, batch_shape: &[usize]) -> RotationResult<Self> {
        Self::new(batch_shape, self.items)
    }

    /// Collapse the batch shape to a single dimension.
    pub fn flatten(self) -> Self {
        Self::from_items(self.items)
    }

    /// Apply `f` to every item, keeping the batch shape.
    pub fn map<U, F>(&self, execution: Execution, f: F) -> Batch<U>
    where
        E: Sync,
        U: Send,
        F: Fn(&E) -> U + Sync + Send,
    {
        let items = match execution {
            Execution::Sequential => self.items.iter().map(f).collect(),
            Execution::Parallel => self.items.par_iter().map(f).collect(),
        };
        Batch {
            batch_shape: self.batch_shape.clone(),
            items,
        }
    }

    /// Apply a fallible `f` to every item; the first error aborts the mapping.
    pub fn try_map<U, F>(&self, execution: Execution, f: F) -> RotationResult<Batch<U>>
    where
        E: Sync,
        U: Send,
        F: Fn(&E) -> RotationResult<U> + Sync + Send,
    {
        let items = match execution {
            Execution::Sequential => self.items.iter().map(f).collect::<RotationResult<Vec<U>>>(),
            Execution::Parallel => self
                .items
                .par_iter()
                .map(f)
                .collect::<RotationResult<Vec<U>>>(),
        }?;
        Ok(Batch {
            batch_shape: self.batch_shape.clone(),
            items,
        })
    }

    /// Apply `f` to pairs of items from two batches of identical batch shape.
    pub fn zip_map<E2, U, F>(
        &self,
        other: &Batch<E2>,
        execution: Execution,
        f: F,
    ) -> RotationResult<Batch<U>>
    where
        E: Sync,
        E2: Sync,
        U: Send,
        F: Fn(&E, &E2) -> U + Sync + Send,
    {
        if self.batch_shape != other.batch_shape {
            return Err(RotationError::BatchShapeMismatch {
                left: self.batch_shape.clone(),
                right: other.batch_shape.clone(),
            });
        }
        let items = match execution {
            Execution::Sequential => self
                .items
                .iter()
                .zip(other.items.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
            Execution::Parallel => self
                .items
                .par_iter()
                .zip(other.items.par_iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        };
        Ok(Batch {
            batch_shape: self.batch_shape.clone(),
            items,
        })
    }
}

impl<E: BatchItem> Batch<E> {
    /// Build a batch from flat row-major values and their full shape.
    ///
    /// The trailing dimensions of `shape` must equal the item shape and
    /// `values.len()` must equal the product of `shape`.
    ///
    /// # Example
    /// ```
    /// use apex_rotations::Batch;
    /// use nalgebra::Vector3;
    ///
    /// let rotvecs = Batch::<Vector3<f64>>::from_slice(&[0.0; 12], &[2, 2, 3]).unwrap();
    /// assert_eq!(rotvecs.batch_shape(), &[2, 2]);
    /// ```
    pub fn from_slice(values: &[E::Scalar], shape: &[usize]) -> RotationResult<Self> {
        let item_shape = E::ITEM_SHAPE;
        if shape.len() < item_shape.len() || &shape[shape.len() - item_shape.len()..] != item_shape
        {
            return Err(RotationError::InvalidShape {
                name: E::NAME,
                expected: item_shape.to_vec(),
                actual: shape.to_vec(),
            });
        }

        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(RotationError::ElementCount {
                shape: shape.to_vec(),
                expected,
                actual: values.len(),
            });
        }

        let batch_shape = &shape[..shape.len() - item_shape.len()];
        let items = values
            .chunks_exact(E::item_len())
            .map(E::from_row_major)
            .collect();
        Self::new(batch_shape, items)
    }

    /// Full shape `batch_shape ++ item_shape`.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.batch_shape.clone();
        shape.extend_from_slice(E::ITEM_SHAPE);
        shape
    }

    /// Flat row-major values matching [`Batch::shape`].
    pub fn to_vec(&self) -> Vec<E::Scalar> {
        let mut out = Vec::with_capacity(self.items.len() * E::item_len());
        for item in &self.items {
            item.extend_row_major(&mut out);
        }
        out
    }
}

impl Batch<bool> {
    /// Logical AND over all items (true for an empty batch).
    pub fn all(&self) -> bool {
        self.items.iter().all(|&flag| flag)
    }

    /// Logical OR over all items.
    pub fn any(&self) -> bool {
        self.items.iter().any(|&flag| flag)
    }
}

impl<'a, E> IntoIterator for &'a Batch<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
