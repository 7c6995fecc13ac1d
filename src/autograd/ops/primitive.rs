//! Backward node for registered primitives

use crate::autograd::GradFn;
use crate::autograd::registry::{Primitive, PrimitiveParams};
use crate::error::{Error, Result};
use crate::tensor::{Tensor, TensorId};
use std::sync::Arc;

/// Backward for an operation evaluated through the primitive registry
///
/// The node saves the primitive's inputs, its output and its opaque parameters;
/// the backward pass hands them to [`Primitive::vjp`] instead of
/// differentiating whatever the forward rule did internally.
pub struct PrimitiveBackward {
    primitive: Arc<dyn Primitive>,
    params: PrimitiveParams,
    input_ids: Vec<TensorId>,
    inputs: Vec<Tensor>,
    output: Tensor,
    input_grad_fns: Vec<Option<Arc<dyn GradFn>>>,
}

impl PrimitiveBackward {
    /// Create a new PrimitiveBackward
    pub fn new(
        primitive: Arc<dyn Primitive>,
        params: PrimitiveParams,
        input_ids: Vec<TensorId>,
        inputs: Vec<Tensor>,
        output: Tensor,
        input_grad_fns: Vec<Option<Arc<dyn GradFn>>>,
    ) -> Self {
        Self {
            primitive,
            params,
            input_ids,
            inputs,
            output,
            input_grad_fns,
        }
    }
}

impl GradFn for PrimitiveBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let grads = self
            .primitive
            .vjp(&self.inputs, &self.output, &self.params, grad_output)?;
        if grads.len() != self.inputs.len() {
            return Err(Error::Internal(format!(
                "primitive '{}' returned {} gradients for {} inputs",
                self.primitive.name(),
                grads.len(),
                self.inputs.len()
            )));
        }
        Ok(grads)
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_ids
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        self.input_grad_fns.clone()
    }

    fn saved_tensors(&self) -> &[Tensor] {
        &self.inputs
    }

    fn name(&self) -> &'static str {
        "PrimitiveBackward"
    }
}
