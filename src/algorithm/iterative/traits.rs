//! Iterative solver trait
//!
//! Defines the contract for matrix-free iterative linear solvers.

use crate::error::{Error, Result};
use crate::linop::LinearOperator;
use crate::runtime::CpuClient;
use crate::tensor::Tensor;

use super::types::CgOptions;

/// Matrix-free iterative solvers for linear systems
///
/// Operators are passed as [`LinearOperator`] trait objects; the solvers
/// only ever apply them to vectors.
pub trait IterativeSolvers {
    /// CG (Conjugate Gradient) solver
    ///
    /// Solves Ax = b where A is symmetric (Hermitian) positive definite.
    /// Returns `(x, info)` with `info == 0`.
    fn cg(
        &self,
        operator: &dyn LinearOperator,
        b: &Tensor,
        x0: Option<&Tensor>,
        precond: Option<&dyn LinearOperator>,
        options: CgOptions,
    ) -> Result<(Tensor, i32)>;

    /// CG over several independent right-hand sides
    fn cg_batch(
        &self,
        operator: &dyn LinearOperator,
        bs: &[Tensor],
        precond: Option<&dyn LinearOperator>,
        options: CgOptions,
    ) -> Result<Vec<(Tensor, i32)>>;
}

impl IterativeSolvers for CpuClient {
    fn cg(
        &self,
        operator: &dyn LinearOperator,
        b: &Tensor,
        x0: Option<&Tensor>,
        precond: Option<&dyn LinearOperator>,
        options: CgOptions,
    ) -> Result<(Tensor, i32)> {
        super::cg::cg(self, operator, b, x0, precond, options)
    }

    fn cg_batch(
        &self,
        operator: &dyn LinearOperator,
        bs: &[Tensor],
        precond: Option<&dyn LinearOperator>,
        options: CgOptions,
    ) -> Result<Vec<(Tensor, i32)>> {
        super::cg::cg_batch(self, operator, bs, precond, options)
    }
}

/// Validate solver inputs and return the system dimension N
///
/// Runs before any operator application:
/// - `b` must be 1-D
/// - operator and preconditioner dimensions, when known, must equal N
/// - `x0` must match `b` in shape and dtype
/// - `tol` and `atol` must be finite and non-negative
/// - an explicit `max_iter` must be positive
pub fn validate_cg_inputs(
    operator: &dyn LinearOperator,
    precond: Option<&dyn LinearOperator>,
    b: &Tensor,
    x0: Option<&Tensor>,
    options: &CgOptions,
) -> Result<usize> {
    if b.ndim() != 1 {
        return Err(Error::shape_mismatch(&[b.numel()], b.shape()));
    }
    let n = b.numel();

    for op in std::iter::once(operator).chain(precond) {
        if let Some(dim) = op.dim() {
            if dim != n {
                return Err(Error::shape_mismatch(&[dim], b.shape()));
            }
        }
    }

    if let Some(x0) = x0 {
        Error::check_shapes(b.shape(), x0.shape())?;
        Error::check_dtypes(b.dtype(), x0.dtype())?;
    }

    for (arg, value) in [("tol", options.tol), ("atol", options.atol)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(Error::invalid_argument(
                arg,
                format!("must be finite and non-negative, got {value}"),
            ));
        }
    }

    if options.max_iter == Some(0) {
        return Err(Error::invalid_argument("max_iter", "must be positive"));
    }

    Ok(n)
}
