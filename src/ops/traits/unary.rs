//! Unary operations trait.

use crate::error::Result;
use crate::tensor::Tensor;

/// Element-wise unary operations on tensors.
pub trait UnaryOps {
    /// Element-wise negation: -a
    fn neg(&self, a: &Tensor) -> Result<Tensor>;
}
