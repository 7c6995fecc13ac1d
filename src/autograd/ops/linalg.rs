//! Backward implementation for matrix-vector products

use crate::autograd::GradFn;
use crate::error::Result;
use crate::ops::LinalgOps;
use crate::runtime::CpuClient;
use crate::tensor::{Tensor, TensorId};
use std::sync::Arc;

/// Backward for y = A x with A of shape `[m, n]`
///
/// Gradients:
/// - dL/dA = g xᵀ
/// - dL/dx = Aᵀ g
pub struct MatvecBackward {
    input_ids: [TensorId; 2],
    saved_tensors: [Tensor; 2],
    input_grad_fns: [Option<Arc<dyn GradFn>>; 2],
    client: CpuClient,
}

impl MatvecBackward {
    /// Create a new MatvecBackward
    pub fn new(
        a_id: TensorId,
        x_id: TensorId,
        a: Tensor,
        x: Tensor,
        a_grad_fn: Option<Arc<dyn GradFn>>,
        x_grad_fn: Option<Arc<dyn GradFn>>,
        client: &CpuClient,
    ) -> Self {
        Self {
            input_ids: [a_id, x_id],
            saved_tensors: [a, x],
            input_grad_fns: [a_grad_fn, x_grad_fn],
            client: client.clone(),
        }
    }
}

impl GradFn for MatvecBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let [a, x] = &self.saved_tensors;
        let grad_a = self.client.outer(grad_output, x)?;
        let a_t = self.client.transpose(a)?;
        let grad_x = self.client.matvec(&a_t, grad_output)?;
        Ok(vec![Some(grad_a), Some(grad_x)])
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
        "MatvecBackward"
    }
}
