//! Variable: tensor with gradient tracking

use super::GradFn;
use crate::tensor::{Tensor, TensorId};
use std::sync::Arc;

/// A tensor that tracks gradients for automatic differentiation
///
/// `Var` wraps a `Tensor` and optionally records how it was created
/// (via `grad_fn`), enabling reverse-mode autodiff.
///
/// Cloning a `Var` yields the same graph node: the clone keeps the id, so
/// gradients computed through either handle are found under [`Var::id`].
pub struct Var {
    /// The underlying tensor data
    tensor: Tensor,

    /// Unique identifier for graph tracking
    id: TensorId,

    /// Whether this variable requires gradient computation
    requires_grad: bool,

    /// Function to compute gradients (None for leaf tensors)
    grad_fn: Option<Arc<dyn GradFn>>,
}

impl Var {
    /// Create a leaf variable (no gradient function)
    pub fn new(tensor: Tensor, requires_grad: bool) -> Self {
        Self {
            id: tensor.id(),
            tensor,
            requires_grad,
            grad_fn: None,
        }
    }

    /// Create from an operation result with a gradient function
    pub fn from_op(tensor: Tensor, grad_fn: Arc<dyn GradFn>) -> Self {
        Self {
            id: TensorId::new(),
            tensor,
            requires_grad: true,
            grad_fn: Some(grad_fn),
        }
    }

    /// Get the variable ID
    #[inline]
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Access the underlying tensor
    #[inline]
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// Consume the variable, returning its tensor
    #[inline]
    pub fn into_tensor(self) -> Tensor {
        self.tensor
    }

    /// Check if this variable requires gradients
    #[inline]
    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    /// Get the gradient function (if any)
    #[inline]
    pub fn grad_fn(&self) -> Option<&Arc<dyn GradFn>> {
        self.grad_fn.as_ref()
    }

    /// Whether this is a leaf of the graph (not produced by a tracked op)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.grad_fn.is_none()
    }

    /// Detach from the computation graph
    ///
    /// Returns a new variable that doesn't track gradients.
    pub fn detach(&self) -> Self {
        Self {
            tensor: self.tensor.clone(),
            id: TensorId::new(),
            requires_grad: false,
            grad_fn: None,
        }
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    /// Get the number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.tensor.numel()
    }

    /// Get the number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.tensor.ndim()
    }
}

impl Clone for Var {
    fn clone(&self) -> Self {
        Self {
            tensor: self.tensor.clone(),
            id: self.id,
            requires_grad: self.requires_grad,
            grad_fn: self.grad_fn.clone(),
        }
    }
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var")
            .field("id", &self.id)
            .field("shape", &self.tensor.shape())
            .field("requires_grad", &self.requires_grad)
            .field("grad_fn", &self.grad_fn.as_ref().map(|g| g.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn test_clone_keeps_identity() {
        let v = Var::new(Tensor::ones(&[2], DType::F64), true);
        let c = v.clone();
        assert_eq!(v.id(), c.id());
        assert!(c.requires_grad());
        assert!(c.is_leaf());
    }

    #[test]
    fn test_detach() {
        let v = Var::new(Tensor::ones(&[2], DType::F64), true);
        let d = v.detach();
        assert_ne!(v.id(), d.id());
        assert!(!d.requires_grad());
    }
}
