//! Matrix-vector products on variables

use super::ensure_real;
use super::macros::*;
use crate::autograd::Var;
use crate::autograd::ops::MatvecBackward;
use crate::error::Result;
use crate::ops::LinalgOps;
use crate::runtime::CpuClient;
use crate::tensor::Tensor;

impl_var_binary_op_tensors!(
    /// Matrix-vector product y = A x, A of shape `[m, n]`, x of shape `[n]`
    ///
    /// Creates MatvecBackward, which produces gradients for both the matrix
    /// and the vector.
    var_matvec,
    |c: &CpuClient, a: &Tensor, x: &Tensor| c.matvec(a, x),
    MatvecBackward
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::backward;
    use crate::autograd::var_ops::var_sum;

    #[test]
    fn test_var_matvec_backward() {
        let client = CpuClient::new();
        // A = [[1, 2], [3, 4]], x = [1, -1]
        let a = Var::new(Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]), true);
        let x = Var::new(Tensor::from_slice(&[1.0f64, -1.0], &[2]), true);

        let y = var_matvec(&a, &x, &client).unwrap();
        assert_eq!(y.tensor().to_vec::<f64>(), vec![-1.0, -1.0]);

        let loss = var_sum(&y, &client).unwrap();
        let grads = backward(&loss, &client).unwrap();

        // dL/dA = 1 xᵀ, dL/dx = Aᵀ 1
        assert_eq!(
            grads.get(a.id()).unwrap().to_vec::<f64>(),
            vec![1.0, -1.0, 1.0, -1.0]
        );
        assert_eq!(grads.get(x.id()).unwrap().to_vec::<f64>(), vec![4.0, 6.0]);
    }
}
