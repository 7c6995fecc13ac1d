//! Operations on Var that build the computation graph
//!
//! These functions perform forward computation and create the appropriate
//! backward functions for gradient tracking. Only real dtypes (F32, F64) are
//! differentiable; complex inputs are rejected with `UnsupportedDType`.
//!
//! # Example
//!
//! ```
//! # use matfree::prelude::*;
//! # use matfree::autograd::{Var, var_mul, var_sum, backward};
//! # let client = CpuClient::new();
//! let x = Var::new(Tensor::from_slice(&[2.0f64, 5.0], &[2]), true);
//! let y = Var::new(Tensor::from_slice(&[3.0f64, 1.0], &[2]), true);
//!
//! // L = sum(x * y)
//! let loss = var_sum(&var_mul(&x, &y, &client)?, &client)?;
//! let grads = backward(&loss, &client)?;
//! assert_eq!(grads.get(x.id()).unwrap().to_vec::<f64>(), vec![3.0, 1.0]);
//! # Ok::<(), matfree::error::Error>(())
//! ```

mod macros;

mod arithmetic;
mod linalg;
mod reduce;
pub(crate) mod solve;

pub use arithmetic::{var_add, var_mul, var_mul_scalar, var_neg, var_sub};
pub use linalg::var_matvec;
pub use reduce::{var_dot, var_sum};
pub use solve::{
    DifferentiableOperator, LINEAR_SOLVE, LinearSolveOptions, SolveFn, TracedOperator,
    custom_linear_solve, var_cg,
};

use crate::dtype::DType;
use crate::error::{Error, Result};

/// Reject dtypes the autograd engine cannot differentiate
pub(crate) fn ensure_real(dtype: DType, op: &'static str) -> Result<()> {
    if dtype.is_float() {
        Ok(())
    } else {
        Err(Error::unsupported_dtype(dtype, op))
    }
}
