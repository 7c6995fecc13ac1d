//! Core Tensor type

use super::{Shape, Storage, TensorId};
use crate::dispatch_dtype;
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// N-dimensional array of a runtime-selected element type
///
/// `Tensor` consists of:
/// - **Storage**: reference-counted, immutable element buffer
/// - **Shape**: dimensions (row-major, always contiguous)
/// - **Id**: unique identifier used by the autograd graph
///
/// Cloning shares the buffer and allocates a fresh id.
///
/// # Example
///
/// ```
/// use matfree::tensor::Tensor;
///
/// let b = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
/// assert_eq!(b.shape(), &[2]);
/// assert_eq!(b.to_vec::<f64>(), vec![1.0, 2.0]);
/// ```
pub struct Tensor {
    id: TensorId,
    storage: Storage,
    shape: Shape,
}

impl Tensor {
    /// Create a tensor from storage and shape
    ///
    /// Returns `ShapeMismatch` if the storage length disagrees with the shape.
    pub fn from_parts(storage: Storage, shape: &[usize]) -> Result<Self> {
        let shape = Shape::from(shape);
        if storage.len() != shape.numel() {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![storage.len()],
            });
        }
        Ok(Self {
            id: TensorId::new(),
            storage,
            shape,
        })
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize]) -> Self {
        Self::try_from_slice(data, shape).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    pub fn try_from_slice<T: Element>(data: &[T], shape: &[usize]) -> Result<Self> {
        Self::from_parts(T::into_storage(Arc::from(data)), shape)
    }

    /// Create a tensor taking ownership of a buffer
    pub fn from_vec<T: Element>(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Self::from_parts(T::into_storage(Arc::from(data)), shape)
    }

    /// Create a tensor with every element set to `value`
    ///
    /// For complex dtypes the imaginary part is zero.
    pub fn full_scalar(shape: &[usize], dtype: DType, value: f64) -> Self {
        let numel: usize = shape.iter().product();
        let storage = dispatch_dtype!(dtype, T => {
            T::into_storage(Arc::from(vec![T::from_f64(value); numel]))
        });
        Self {
            id: TensorId::new(),
            storage,
            shape: Shape::from(shape),
        }
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        Self::full_scalar(shape, dtype, 0.0)
    }

    /// Create a tensor filled with ones
    pub fn ones(shape: &[usize], dtype: DType) -> Self {
        Self::full_scalar(shape, dtype, 1.0)
    }

    /// Zeros with the shape and dtype of `other`
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::zeros(other.shape(), other.dtype())
    }

    /// Ones with the shape and dtype of `other`
    pub fn ones_like(other: &Tensor) -> Self {
        Self::ones(other.shape(), other.dtype())
    }

    /// Get the tensor ID
    #[inline]
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Get the backing storage
    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    /// Total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Element dtype
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Borrow the elements as a typed slice
    ///
    /// Returns `DTypeMismatch` if `T` is not this tensor's element type.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::from_storage(&self.storage).ok_or(Error::DTypeMismatch {
            lhs: T::DTYPE,
            rhs: self.dtype(),
        })
    }

    /// Copy the elements out into a `Vec`
    ///
    /// # Panics
    ///
    /// Panics if `T` is not this tensor's element type. Use [`Self::as_slice`]
    /// for a fallible alternative.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        match self.as_slice::<T>() {
            Ok(data) => data.to_vec(),
            Err(e) => panic!("Tensor::to_vec failed: {e}"),
        }
    }

    /// Extract the single element of a one-element tensor
    pub fn item<T: Element>(&self) -> Result<T> {
        if self.numel() != 1 {
            return Err(Error::shape_mismatch(&[1], self.shape()));
        }
        Ok(self.as_slice::<T>()?[0])
    }
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Self {
            id: TensorId::new(),
            storage: self.storage.clone(),
            shape: self.shape.clone(),
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("dtype", &self.dtype())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch_dtype!(self.dtype(), T => {
            match self.as_slice::<T>() {
                Ok(data) => write!(f, "Tensor({:?}, shape={:?})", data, self.shape()),
                Err(_) => write!(f, "Tensor(<invalid>, shape={:?})", self.shape()),
            }
        })
    }
}
