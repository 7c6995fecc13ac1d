//! Backward implementations for differentiable operations
//!
//! Each operation has a corresponding backward struct that implements
//! `GradFn` to compute gradients during the backward pass.

mod arithmetic;
mod linalg;
mod primitive;
mod reduce;

pub use arithmetic::{AddBackward, MulBackward, MulScalarBackward, NegBackward, SubBackward};
pub use linalg::MatvecBackward;
pub use primitive::PrimitiveBackward;
pub use reduce::{DotBackward, SumBackward};
