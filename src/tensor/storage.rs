//! Reference-counted, immutable element storage

use crate::dtype::{Complex64, Complex128, DType};
use std::sync::Arc;

/// Typed backing buffer of a [`super::Tensor`]
///
/// Buffers are shared between clones and never mutated after construction, so
/// a tensor can be handed to several concurrent solves without copying.
#[derive(Clone, Debug)]
pub enum Storage {
    /// f64 elements
    F64(Arc<[f64]>),
    /// f32 elements
    F32(Arc<[f32]>),
    /// Complex64 elements
    Complex64(Arc<[Complex64]>),
    /// Complex128 elements
    Complex128(Arc<[Complex128]>),
}

impl Storage {
    /// Element dtype of this buffer
    pub fn dtype(&self) -> DType {
        match self {
            Self::F64(_) => DType::F64,
            Self::F32(_) => DType::F32,
            Self::Complex64(_) => DType::Complex64,
            Self::Complex128(_) => DType::Complex128,
        }
    }

    /// Number of elements in the buffer
    pub fn len(&self) -> usize {
        match self {
            Self::F64(d) => d.len(),
            Self::F32(d) => d.len(),
            Self::Complex64(d) => d.len(),
            Self::Complex128(d) => d.len(),
        }
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
