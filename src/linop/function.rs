use super::LinearOperator;
use crate::error::Result;
use crate::tensor::Tensor;
use std::fmt;

/// Operator defined by a closure `x ↦ A x`
///
/// # Example
///
/// ```
/// use matfree::prelude::*;
///
/// let client = CpuClient::new();
/// let double = FnOperator::new(move |x: &Tensor| client.mul_scalar(x, 2.0));
/// let y = double.apply(&Tensor::from_slice(&[1.0f64, 3.0], &[2]))?;
/// assert_eq!(y.to_vec::<f64>(), vec![2.0, 6.0]);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub struct FnOperator<F> {
    f: F,
    dim: Option<usize>,
}

impl<F> FnOperator<F>
where
    F: Fn(&Tensor) -> Result<Tensor> + Send + Sync,
{
    /// Wrap a closure
    pub fn new(f: F) -> Self {
        Self { f, dim: None }
    }

    /// Wrap a closure acting on vectors of length `dim`
    pub fn with_dim(dim: usize, f: F) -> Self {
        Self { f, dim: Some(dim) }
    }
}

impl<F> LinearOperator for FnOperator<F>
where
    F: Fn(&Tensor) -> Result<Tensor> + Send + Sync,
{
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        (self.f)(x)
    }

    fn dim(&self) -> Option<usize> {
        self.dim
    }
}

impl<F> fmt::Debug for FnOperator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").field("dim", &self.dim).finish()
    }
}
