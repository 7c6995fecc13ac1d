//! Backward implementations for arithmetic operations
//!
//! All operands share one shape: solver vectors never broadcast, so no
//! gradient needs reducing back to a smaller shape.

use crate::autograd::GradFn;
use crate::error::Result;
use crate::ops::{BinaryOps, ScalarOps, UnaryOps};
use crate::runtime::CpuClient;
use crate::tensor::{Tensor, TensorId};
use std::sync::Arc;

// ============================================================================
// AddBackward
// ============================================================================

/// Backward for element-wise addition: z = a + b
///
/// Gradients:
/// - dL/da = dL/dz
/// - dL/db = dL/dz
pub struct AddBackward {
    input_ids: [TensorId; 2],
    input_grad_fns: [Option<Arc<dyn GradFn>>; 2],
}

impl AddBackward {
    /// Create a new AddBackward
    pub fn new(
        a_id: TensorId,
        b_id: TensorId,
        a_grad_fn: Option<Arc<dyn GradFn>>,
        b_grad_fn: Option<Arc<dyn GradFn>>,
    ) -> Self {
        Self {
            input_ids: [a_id, b_id],
            input_grad_fns: [a_grad_fn, b_grad_fn],
        }
    }
}

impl GradFn for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        Ok(vec![Some(grad_output.clone()), Some(grad_output.clone())])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_ids
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        self.input_grad_fns.to_vec()
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }
}

// ============================================================================
// SubBackward
// ============================================================================

/// Backward for element-wise subtraction: z = a - b
///
/// Gradients:
/// - dL/da = dL/dz
/// - dL/db = -dL/dz
pub struct SubBackward {
    input_ids: [TensorId; 2],
    input_grad_fns: [Option<Arc<dyn GradFn>>; 2],
    client: CpuClient,
}

impl SubBackward {
    /// Create a new SubBackward
    pub fn new(
        a_id: TensorId,
        b_id: TensorId,
        a_grad_fn: Option<Arc<dyn GradFn>>,
        b_grad_fn: Option<Arc<dyn GradFn>>,
        client: &CpuClient,
    ) -> Self {
        Self {
            input_ids: [a_id, b_id],
            input_grad_fns: [a_grad_fn, b_grad_fn],
            client: client.clone(),
        }
    }
}

impl GradFn for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let neg_grad = self.client.neg(grad_output)?;
        Ok(vec![Some(grad_output.clone()), Some(neg_grad)])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_ids
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        self.input_grad_fns.to_vec()
    }

    fn name(&self) -> &'static str {
        "SubBackward"
    }
}

// ============================================================================
// MulBackward
// ============================================================================

/// Backward for element-wise multiplication: z = a * b
///
/// Gradients:
/// - dL/da = dL/dz * b
/// - dL/db = dL/dz * a
pub struct MulBackward {
    input_ids: [TensorId; 2],
    saved_tensors: [Tensor; 2],
    input_grad_fns: [Option<Arc<dyn GradFn>>; 2],
    client: CpuClient,
}

impl MulBackward {
    /// Create a new MulBackward
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

impl GradFn for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        let [a, b] = &self.saved_tensors;
        let grad_a = self.client.mul(grad_output, b)?;
        let grad_b = self.client.mul(grad_output, a)?;
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
        "MulBackward"
    }
}

// ============================================================================
// NegBackward
// ============================================================================

/// Backward for negation: z = -a
///
/// Gradient: dL/da = -dL/dz
pub struct NegBackward {
    input_id: [TensorId; 1],
    input_grad_fn: Option<Arc<dyn GradFn>>,
    client: CpuClient,
}

impl NegBackward {
    /// Create a new NegBackward
    pub fn new(a_id: TensorId, a_grad_fn: Option<Arc<dyn GradFn>>, client: &CpuClient) -> Self {
        Self {
            input_id: [a_id],
            input_grad_fn: a_grad_fn,
            client: client.clone(),
        }
    }
}

impl GradFn for NegBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        Ok(vec![Some(self.client.neg(grad_output)?)])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_id
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        vec![self.input_grad_fn.clone()]
    }

    fn name(&self) -> &'static str {
        "NegBackward"
    }
}

// ============================================================================
// MulScalarBackward
// ============================================================================

/// Backward for scaling by a constant: z = a * s
///
/// Gradient: dL/da = dL/dz * s
pub struct MulScalarBackward {
    input_id: [TensorId; 1],
    scalar: f64,
    input_grad_fn: Option<Arc<dyn GradFn>>,
    client: CpuClient,
}

impl MulScalarBackward {
    /// Create a new MulScalarBackward
    pub fn new(
        a_id: TensorId,
        scalar: f64,
        a_grad_fn: Option<Arc<dyn GradFn>>,
        client: &CpuClient,
    ) -> Self {
        Self {
            input_id: [a_id],
            scalar,
            input_grad_fn: a_grad_fn,
            client: client.clone(),
        }
    }
}

impl GradFn for MulScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Result<Vec<Option<Tensor>>> {
        Ok(vec![Some(self.client.mul_scalar(grad_output, self.scalar)?)])
    }

    fn inputs(&self) -> &[TensorId] {
        &self.input_id
    }

    fn input_grad_fns(&self) -> Vec<Option<Arc<dyn GradFn>>> {
        vec![self.input_grad_fn.clone()]
    }

    fn name(&self) -> &'static str {
        "MulScalarBackward"
    }
}
