//! Tensor types
//!
//! A [`Tensor`] is a dtype-tagged, reference-counted buffer plus a shape. It is
//! the vector (and, for dense operators, matrix) type every solver and autograd
//! operation in this crate works with.

mod core;
mod id;
mod shape;
mod storage;

pub use core::Tensor;
pub use id::TensorId;
pub use shape::Shape;
pub use storage::Storage;
