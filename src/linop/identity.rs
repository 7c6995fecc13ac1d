use super::LinearOperator;
use crate::error::Result;
use crate::tensor::Tensor;

/// Identity operator, the default (no-op) preconditioner.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IdentityOperator {
    /// Dimension of the operator, if fixed.
    pub dim: Option<usize>,
}

impl IdentityOperator {
    /// Identity of unspecified dimension
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of dimension `dim`
    pub fn with_dim(dim: usize) -> Self {
        Self { dim: Some(dim) }
    }
}

impl LinearOperator for IdentityOperator {
    #[inline]
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        Ok(x.clone())
    }

    fn dim(&self) -> Option<usize> {
        self.dim
    }

    #[inline]
    fn is_identity(&self) -> bool {
        true
    }
}
