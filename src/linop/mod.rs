//! Matrix-free linear operators
//!
//! A [`LinearOperator`] is only ever observed through its action on a vector.
//! Solvers never materialise a matrix: they call [`LinearOperator::apply`] once
//! or twice per iteration and treat the operator as an opaque, deterministic
//! map from length-N vectors to length-N vectors.
//!
//! Preconditioners are linear operators too. [`IdentityOperator`] is the no-op
//! preconditioner and the only operator that reports
//! [`LinearOperator::is_identity`].

mod dense;
mod diagonal;
mod function;
mod identity;

pub use dense::DenseOperator;
pub use diagonal::DiagonalOperator;
pub use function::FnOperator;
pub use identity::IdentityOperator;

use crate::error::Result;
use crate::tensor::Tensor;
use std::sync::Arc;

/// A linear map exposed only through matrix-vector products
///
/// Implementations must be deterministic and free of side effects that
/// influence their output. For use with conjugate gradient the operator must be
/// symmetric (Hermitian) positive-definite; this is not checked.
pub trait LinearOperator: Send + Sync {
    /// Compute `A x`
    fn apply(&self, x: &Tensor) -> Result<Tensor>;

    /// Dimension N of the square operator, when known up front
    fn dim(&self) -> Option<usize> {
        None
    }

    /// Whether this operator is the identity map
    ///
    /// Conjugate gradient uses the cheaper preconditioned inner product as its
    /// stopping metric only when the preconditioner is the identity.
    fn is_identity(&self) -> bool {
        false
    }
}

impl<O: LinearOperator + ?Sized> LinearOperator for &O {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        (**self).apply(x)
    }

    fn dim(&self) -> Option<usize> {
        (**self).dim()
    }

    fn is_identity(&self) -> bool {
        (**self).is_identity()
    }
}

impl<O: LinearOperator + ?Sized> LinearOperator for Arc<O> {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        (**self).apply(x)
    }

    fn dim(&self) -> Option<usize> {
        (**self).dim()
    }

    fn is_identity(&self) -> bool {
        (**self).is_identity()
    }
}

impl<O: LinearOperator + ?Sized> LinearOperator for Box<O> {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        (**self).apply(x)
    }

    fn dim(&self) -> Option<usize> {
        (**self).dim()
    }

    fn is_identity(&self) -> bool {
        (**self).is_identity()
    }
}
