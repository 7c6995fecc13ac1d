//! Scalar operations trait for tensor-scalar operations.

use crate::dtype::Element;
use crate::error::Result;
use crate::tensor::Tensor;

/// Scalar operations trait for tensor-scalar operations
///
/// The typed variants (`scale`, `axpy`) take the scalar in the tensor's own
/// element type so complex step lengths are representable. They return
/// `DTypeMismatch` when `T` does not match the tensor dtype.
pub trait ScalarOps {
    /// Multiply tensor by a real scalar: a * scalar
    fn mul_scalar(&self, a: &Tensor, scalar: f64) -> Result<Tensor>;

    /// Multiply tensor by a typed scalar: alpha * x
    fn scale<T: Element>(&self, alpha: T, x: &Tensor) -> Result<Tensor>;

    /// Fused update: alpha * x + y
    fn axpy<T: Element>(&self, alpha: T, x: &Tensor, y: &Tensor) -> Result<Tensor>;
}
