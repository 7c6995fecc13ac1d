//! Reductions on variables

use super::ensure_real;
use super::macros::*;
use crate::autograd::Var;
use crate::autograd::ops::{DotBackward, SumBackward};
use crate::dispatch_real_dtype;
use crate::dtype::AccumulationPrecision;
use crate::error::{Error, Result};
use crate::ops::ReduceOps;
use crate::runtime::CpuClient;
use crate::tensor::Tensor;
use std::sync::Arc;

/// Sum all elements: z = Σ aᵢ, shape `[1]`
pub fn var_sum(a: &Var, client: &CpuClient) -> Result<Var> {
    ensure_real(a.tensor().dtype(), "var_sum")?;
    let output = client.sum(a.tensor())?;

    if a.requires_grad() {
        let grad_fn = SumBackward::new(
            a.id(),
            a.shape(),
            a.tensor().dtype(),
            a.grad_fn().cloned(),
        );
        Ok(Var::from_op(output, Arc::new(grad_fn)))
    } else {
        Ok(Var::new(output, false))
    }
}

/// Inner product of two real vectors, shape `[1]`
///
/// Always accumulates with compensated summation; graph reductions have no
/// precision knob of their own.
fn dot_forward(client: &CpuClient, a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Error::check_dtypes(a.dtype(), b.dtype())?;
    dispatch_real_dtype!(a.dtype(), T => {
        let value = client.dot::<T>(a, b, AccumulationPrecision::Highest)?;
        Tensor::from_vec(vec![value], &[1])
    }, "var_dot")
}

impl_var_binary_op_tensors!(
    /// Inner product of two vectors: z = ⟨a, b⟩, shape `[1]`
    var_dot, dot_forward, DotBackward
);
