//! Backward implementations for reductions

use crate::autograd::GradFn;
use crate::dispatch_real_dtype;
use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::ops::ScalarOps;
use crate::runtime::CpuClient;
use crate::tensor::{Tensor, TensorId};
use std::sync::Arc;

/// Read the single value of a `[1]` gradient as f64
fn scalar_grad(grad_output: &Tensor) -> Result<f64> {
    let value = dispatch_real_dtype!(grad_output.dtype(), T => {
        grad_output.item::<T>()?.to_f64()
    }, "backward");
    Ok(value)
}

// ============================================================================
// SumBackward
// ============================================================================

/// Backward for full sum: z = Σ aᵢ
///
/// Gradient: dL/da = dL/dz broadcast to the shape of a
pub struct SumBackward {
    input_id: [TensorId; 1],
    input_shape: Vec<usize>,
    dtype: DType,
    input_grad_fn: Option<Arc<dyn GradFn>>,
}

impl SumBackward {
    /// Create a new SumBackward
    pub fn new(
        a_id: TensorId,
        input_shape: &[usize],
        dtype: DType,
        a_grad_fn: Option<Arc<dyn GradFn>>,
    ) -> Self {
        Self {
            input_id: [a_id],
            input_shape: input_shape.to_vec(),
            dtype,
            input_grad_fn: a_grad_fn,
        }
    }
}

impl GradFn for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let g = scalar_grad(grad_output)?;
        Ok(vec![Some(Tensor::full_scalar(&self.input_shape, self.dtype, g))])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_id
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        vec![self.input_grad_fn.clone()]
    }

    fn name(&self) -> &'static str {
        "SumBackward"
    }
}

// ============================================================================
// DotBackward
// ============================================================================

/// Backward for the inner product of real vectors: z = ⟨a, b⟩
///
/// Gradients:
/// - dL/da = dL/dz · b
/// - dL/db = dL/dz · a
pub struct DotBackward {
    input_ids: [TensorId; 2],
    saved_tensors: [Tensor; 2],
    input_grad_fns: [Option<Arc<dyn GradFn>>; 2],
    client: CpuClient,
}

impl DotBackward {
    /// Create a new DotBackward
    pub fn new(
        a_id: TensorId,
        b_id: TensorId,
        a: Tensor,
        b: Tensor,
        a_grad_fn: Option<Arc<dyn GradFn>>,
        b_grad_fn: Option<Arc<dyn GradFn>>,
        client: &CpuClient,
    ) -> Self {
        Self {
            input_ids: [a_id, b_id],
            saved_tensors: [a, b],
            input_grad_fns: [a_grad_fn, b_grad_fn],
            client: client.clone(),
        }
    }
}

impl GradFn for DotBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let g = scalar_grad(grad_output)?;
        let [a, b] = &self.saved_tensors;
        let grad_a = self.client.mul_scalar(b, g)?;
        let grad_b = self.client.mul_scalar(a, g)?;
        Ok(vec![Some(grad_a), Some(grad_b)])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_ids
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        self.input_grad_fns.to_vec()
    }

    fn saved_tensors(&self) -> &[Tensor] {
        &self.saved_tensors
    }

    fn name(&self) -> &'static str {
        "DotBackward"
    }
}
