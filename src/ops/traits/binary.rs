//! Binary operations trait.
//!
//! Element-wise binary operations on tensors of identical shape and dtype.

use crate::error::Result;
use crate::tensor::Tensor;

/// Element-wise binary operations on tensors.
///
/// Solver vectors never broadcast: both operands must have the same shape and
/// dtype, otherwise `ShapeMismatch` / `DTypeMismatch` is returned.
///
/// # Example
///
/// ```
/// use matfree::prelude::*;
///
/// let client = CpuClient::new();
/// let a = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
/// let b = Tensor::from_slice(&[3.0f64, 4.0], &[2]);
///
/// let c = client.add(&a, &b)?;
/// assert_eq!(c.to_vec::<f64>(), vec![4.0, 6.0]);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub trait BinaryOps {
    /// Element-wise addition: a + b
    fn add(&self, a: &Tensor, b: &Tensor) -> Result<Tensor>;

    /// Element-wise subtraction: a - b
    fn sub(&self, a: &Tensor, b: &Tensor) -> Result<Tensor>;

    /// Element-wise multiplication: a * b
    fn mul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor>;
}
