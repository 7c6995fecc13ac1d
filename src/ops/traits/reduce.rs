//! Reduction operations trait.

use crate::dtype::{AccumulationPrecision, Element};
use crate::error::Result;
use crate::tensor::Tensor;

/// Full reductions and inner products
///
/// All reductions run sequentially in index order regardless of the `rayon`
/// feature, so a given input always produces the same bits.
pub trait ReduceOps {
    /// Sum of all elements, returned as a tensor of shape `[1]`
    fn sum(&self, a: &Tensor) -> Result<Tensor>;

    /// Conjugate inner product: Σ conj(aᵢ)·bᵢ
    ///
    /// `a` and `b` must be 1-D with equal length and dtype `T`.
    fn dot<T: Element>(
        &self,
        a: &Tensor,
        b: &Tensor,
        precision: AccumulationPrecision,
    ) -> Result<T>;

    /// Squared Euclidean norm ‖a‖² as f64
    fn norm_sq(&self, a: &Tensor, precision: AccumulationPrecision) -> Result<f64>;
}
