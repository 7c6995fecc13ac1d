//! Element-wise arithmetic on variables

use super::ensure_real;
use super::macros::*;
use crate::autograd::Var;
use crate::autograd::ops::{AddBackward, MulBackward, MulScalarBackward, NegBackward, SubBackward};
use crate::error::Result;
use crate::ops::{BinaryOps, ScalarOps, UnaryOps};
use crate::runtime::CpuClient;
use crate::tensor::Tensor;
use std::sync::Arc;

impl_var_binary_op_ids!(
    /// Add two variables: z = a + b
    var_add, add, AddBackward
);

impl_var_binary_op_ids!(
    /// Subtract two variables: z = a - b
    var_sub, sub, SubBackward, with_client
);

impl_var_binary_op_tensors!(
    /// Multiply two variables element-wise: z = a * b
    var_mul,
    |c: &CpuClient, a: &Tensor, b: &Tensor| c.mul(a, b),
    MulBackward
);

/// Negate a variable: z = -a
pub fn var_neg(a: &Var, client: &CpuClient) -> Result<Var> {
    ensure_real(a.tensor().dtype(), "var_neg")?;
    let output = client.neg(a.tensor())?;

    if a.requires_grad() {
        let grad_fn = NegBackward::new(a.id(), a.grad_fn().cloned(), client);
        Ok(Var::from_op(output, Arc::new(grad_fn)))
    } else {
        Ok(Var::new(output, false))
    }
}

/// Scale a variable by a constant: z = a * s
pub fn var_mul_scalar(a: &Var, scalar: f64, client: &CpuClient) -> Result<Var> {
    ensure_real(a.tensor().dtype(), "var_mul_scalar")?;
    let output = client.mul_scalar(a.tensor(), scalar)?;

    if a.requires_grad() {
        let grad_fn = MulScalarBackward::new(a.id(), scalar, a.grad_fn().cloned(), client);
        Ok(Var::from_op(output, Arc::new(grad_fn)))
    } else {
        Ok(Var::new(output, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use crate::autograd::var_ops::var_sum;
    use crate::dtype::{Complex128, DType};
    use crate::error::Error;

    #[test]
    fn test_var_mul_backward() {
        let client = CpuClient::new();
        let x = Var::new(Tensor::from_slice(&[2.0f32], &[1]), true);
        let y = Var::new(Tensor::from_slice(&[3.0f32], &[1]), true);

        let z = var_mul(&x, &y, &client).unwrap();
        let grads = backward(&z, &client).unwrap();

        assert_eq!(grads.get(x.id()).unwrap().to_vec::<f32>(), vec![3.0]);
        assert_eq!(grads.get(y.id()).unwrap().to_vec::<f32>(), vec![2.0]);
    }

    #[test]
    fn test_reused_variable_accumulates() {
        // L = sum(x*x + (x - 2x)) => dL/dx = 2x - 1
        let client = CpuClient::new();
        let x = Var::new(Tensor::from_slice(&[1.0f64, -3.0], &[2]), true);

        let sq = var_mul(&x, &x, &client).unwrap();
        let twice = var_mul_scalar(&x, 2.0, &client).unwrap();
        let diff = var_sub(&x, &twice, &client).unwrap();
        let total = var_add(&sq, &diff, &client).unwrap();
        let loss = var_sum(&total, &client).unwrap();

        let grads = backward(&loss, &client).unwrap();
        assert_eq!(grads.get(x.id()).unwrap().to_vec::<f64>(), vec![1.0, -7.0]);
    }

    #[test]
    fn test_var_neg_backward() {
        let client = CpuClient::new();
        let x = Var::new(Tensor::ones(&[3], DType::F64), true);
        let loss = var_sum(&var_neg(&x, &client).unwrap(), &client).unwrap();
        let grads = backward(&loss, &client).unwrap();
        assert_eq!(grads.get(x.id()).unwrap().to_vec::<f64>(), vec![-1.0; 3]);
    }

    #[test]
    fn test_complex_vars_rejected() {
        let client = CpuClient::new();
        let z = Var::new(Tensor::from_slice(&[Complex128::new(0.0, 1.0)], &[1]), true);
        assert!(matches!(
            var_add(&z, &z, &client),
            Err(Error::UnsupportedDType { .. })
        ));
    }

    #[test]
    fn test_no_grad_builds_no_graph() {
        let client = CpuClient::new();
        let x = Var::new(Tensor::ones(&[2], DType::F64), false);
        let y = var_add(&x, &x, &client).unwrap();
        assert!(y.is_leaf());
    }
}
