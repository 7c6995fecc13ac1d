//! Dense matrix-vector operations trait.

use crate::error::Result;
use crate::tensor::Tensor;

/// Dense matrix-vector products
///
/// Used by [`crate::linop::DenseOperator`] and by the autograd `var_matvec`
/// op; the solvers themselves only see operators.
pub trait LinalgOps {
    /// y = A x for A of shape `[m, n]` and x of shape `[n]`
    fn matvec(&self, a: &Tensor, x: &Tensor) -> Result<Tensor>;

    /// Transpose of a 2-D tensor
    fn transpose(&self, a: &Tensor) -> Result<Tensor>;

    /// Outer product u vᵀ for 1-D u (length m) and v (length n), shape `[m, n]`
    fn outer(&self, u: &Tensor, v: &Tensor) -> Result<Tensor>;
}
