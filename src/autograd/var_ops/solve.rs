//! Differentiable linear solves
//!
//! [`custom_linear_solve`] evaluates `x = solve(A, b)` as a registered
//! primitive. Its derivative rule never looks inside `solve`: the gradient with
//! respect to `b` is the solution `u` of the adjoint system
//!
//! ```text
//! A u = g     (symmetric A)
//! Aᵀ u = g    (otherwise)
//! ```
//!
//! computed with the same kind of solver, and gradients with respect to
//! parameters captured by a [`DifferentiableOperator`] follow from
//! `dL/dθ = −uᵀ (∂A/∂θ) x`, evaluated by differentiating `−⟨u, A_θ(x)⟩` with
//! the autograd engine.

use super::{ensure_real, var_dot, var_neg};
use crate::algorithm::iterative::{CgOptions, cg};
use crate::autograd::registry::{Primitive, PrimitiveParams, bind_primitive};
use crate::autograd::{Var, backward};
use crate::error::{Error, Result};
use crate::linop::{DenseOperator, DiagonalOperator, FnOperator, IdentityOperator, LinearOperator};
use crate::runtime::CpuClient;
use crate::tensor::Tensor;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Registry name of the linear-solve primitive
pub const LINEAR_SOLVE: &str = "custom_linear_solve";

/// A solver strategy: `(A, b) ↦ x` with `A x ≈ b`
pub type SolveFn = Arc<dyn Fn(&dyn LinearOperator, &Tensor) -> Result<Tensor> + Send + Sync>;

/// A linear operator whose action may depend on differentiable parameters
///
/// `params` lists the parameter variables the operator captures, and
/// `apply_traced` recomputes `A_θ x` from given parameter variables using var
/// ops, so the autograd engine can differentiate it with respect to θ. The
/// plain [`LinearOperator::apply`] must agree with `apply_traced` evaluated at
/// the captured parameter values.
///
/// Operators without parameters can rely on the defaults.
pub trait DifferentiableOperator: LinearOperator {
    /// Captured parameter variables
    fn params(&self) -> Vec<Var> {
        Vec::new()
    }

    /// Traced application `A_θ x`
    fn apply_traced(&self, params: &[Var], x: &Var, client: &CpuClient) -> Result<Var> {
        let _ = (params, client);
        Ok(Var::new(self.apply(x.tensor())?, false))
    }
}

impl DifferentiableOperator for IdentityOperator {}
impl DifferentiableOperator for DiagonalOperator {}
impl DifferentiableOperator for DenseOperator {}
impl<F> DifferentiableOperator for FnOperator<F> where
    F: Fn(&Tensor) -> Result<Tensor> + Send + Sync
{
}

type TracedFn = dyn Fn(&[Var], &Var, &CpuClient) -> Result<Var> + Send + Sync;

/// Operator defined by a traced closure over parameter variables
///
/// # Example
///
/// ```
/// use matfree::prelude::*;
/// use matfree::autograd::{TracedOperator, Var, var_matvec};
///
/// let client = CpuClient::new();
/// let m = Var::new(Tensor::from_slice(&[2.0f64, 0.0, 0.0, 4.0], &[2, 2]), true);
/// let op = TracedOperator::new(&client, vec![m], |p, x, c| var_matvec(&p[0], x, c));
///
/// let y = op.apply(&Tensor::from_slice(&[1.0f64, 1.0], &[2]))?;
/// assert_eq!(y.to_vec::<f64>(), vec![2.0, 4.0]);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub struct TracedOperator {
    client: CpuClient,
    params: Vec<Var>,
    f: Arc<TracedFn>,
}

impl TracedOperator {
    /// Build an operator from parameters and `f(params, x, client) = A_θ x`
    pub fn new<F>(client: &CpuClient, params: Vec<Var>, f: F) -> Self
    where
        F: Fn(&[Var], &Var, &CpuClient) -> Result<Var> + Send + Sync + 'static,
    {
        Self {
            client: client.clone(),
            params,
            f: Arc::new(f),
        }
    }
}

impl LinearOperator for TracedOperator {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        let detached: Vec<Var> = self.params.iter().map(Var::detach).collect();
        let y = (self.f)(&detached, &Var::new(x.clone(), false), &self.client)?;
        Ok(y.into_tensor())
    }
}

impl DifferentiableOperator for TracedOperator {
    fn params(&self) -> Vec<Var> {
        self.params.clone()
    }

    fn apply_traced(&self, params: &[Var], x: &Var, client: &CpuClient) -> Result<Var> {
        (self.f)(params, x, client)
    }
}

impl fmt::Debug for TracedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedOperator")
            .field("params", &self.params)
            .finish()
    }
}

/// How the derivative rule of [`custom_linear_solve`] obtains the adjoint
#[derive(Clone, Default)]
pub struct LinearSolveOptions {
    /// The operator is symmetric: the adjoint reuses `A` and `solve`
    pub symmetric: bool,
    /// Solver for the transposed system, required when not symmetric
    pub transpose_solve: Option<SolveFn>,
    /// The transposed operator Aᵀ, required when not symmetric
    pub transpose_operator: Option<Arc<dyn LinearOperator>>,
}

impl LinearSolveOptions {
    /// Options for a symmetric operator
    pub fn symmetric() -> Self {
        Self {
            symmetric: true,
            ..Self::default()
        }
    }
}

impl fmt::Debug for LinearSolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearSolveOptions")
            .field("symmetric", &self.symmetric)
            .field("transpose_solve", &self.transpose_solve.is_some())
            .field("transpose_operator", &self.transpose_operator.is_some())
            .finish()
    }
}

struct LinearSolveParams {
    client: CpuClient,
    operator: Arc<dyn DifferentiableOperator>,
    solve: SolveFn,
    options: LinearSolveOptions,
}

fn downcast(params: &PrimitiveParams) -> Result<&LinearSolveParams> {
    params
        .downcast_ref::<LinearSolveParams>()
        .ok_or_else(|| Error::Internal(format!("'{LINEAR_SOLVE}' bound with foreign parameters")))
}

/// The registered linear-solve primitive
///
/// Inputs are `[b, θ₁, …, θₖ]` where the θ are the operator's parameters.
pub(crate) struct LinearSolvePrimitive;

impl Primitive for LinearSolvePrimitive {
    fn name(&self) -> &'static str {
        LINEAR_SOLVE
    }

    fn forward(&self, inputs: &[Tensor], params: &PrimitiveParams) -> Result<Tensor> {
        let p = downcast(params)?;
        let b = inputs
            .first()
            .ok_or_else(|| Error::invalid_argument("inputs", "missing right-hand side"))?;
        let operator: &dyn LinearOperator = &p.operator;
        (p.solve)(operator, b)
    }

    fn vjp(
        &self,
        inputs: &[Tensor],
        output: &Tensor,
        params: &PrimitiveParams,
        grad_output: &Tensor,
    ) -> Result<Vec<Option<Tensor>>> {
        let p = downcast(params)?;
        debug!(
            "{LINEAR_SOLVE} vjp: symmetric = {}, {} parameter inputs",
            p.options.symmetric,
            inputs.len().saturating_sub(1)
        );

        let u = if p.options.symmetric {
            let operator: &dyn LinearOperator = &p.operator;
            (p.solve)(operator, grad_output)?
        } else {
            let transpose_operator = p.options.transpose_operator.as_ref().ok_or_else(|| {
                Error::invalid_argument(
                    "transpose_operator",
                    "required to differentiate a non-symmetric linear solve",
                )
            })?;
            let transpose_solve = p.options.transpose_solve.as_ref().ok_or_else(|| {
                Error::invalid_argument(
                    "transpose_solve",
                    "required to differentiate a non-symmetric linear solve",
                )
            })?;
            transpose_solve(&**transpose_operator, grad_output)?
        };

        let mut grads = Vec::with_capacity(inputs.len());
        grads.push(Some(u.clone()));
        if inputs.len() == 1 {
            return Ok(grads);
        }

        // dL/dθ = −uᵀ (∂A/∂θ) x, by differentiating −⟨u, A_θ(x)⟩
        let leaves: Vec<Var> = inputs[1..]
            .iter()
            .map(|t| Var::new(t.clone(), true))
            .collect();
        let x = Var::new(output.clone(), false);
        let ax = p.operator.apply_traced(&leaves, &x, &p.client)?;
        let inner = var_dot(&Var::new(u, false), &ax, &p.client)?;
        let loss = var_neg(&inner, &p.client)?;

        if loss.requires_grad() {
            let store = backward(&loss, &p.client)?;
            for leaf in &leaves {
                let grad = match store.get(leaf.id()) {
                    Some(g) => g.clone(),
                    None => Tensor::zeros_like(leaf.tensor()),
                };
                grads.push(Some(grad));
            }
        } else {
            grads.extend(leaves.iter().map(|leaf| Some(Tensor::zeros_like(leaf.tensor()))));
        }
        Ok(grads)
    }
}

/// Solve `A x = b` with a user-supplied strategy and an adjoint-based gradient
///
/// The forward pass is `solve(A, b)`. Reverse-mode differentiation solves
/// the adjoint system instead of tracing through `solve`, yielding gradients
/// for `b` and for the operator's parameters.
///
/// `A` must be symmetric when `options.symmetric` is set; this is not checked.
/// Without `symmetric`, both `transpose_operator` and `transpose_solve` must
/// be provided or the backward pass fails with `InvalidArgument`.
pub fn custom_linear_solve(
    client: &CpuClient,
    operator: Arc<dyn DifferentiableOperator>,
    b: &Var,
    solve: SolveFn,
    options: LinearSolveOptions,
) -> Result<Var> {
    ensure_real(b.tensor().dtype(), LINEAR_SOLVE)?;

    let mut inputs = vec![b.clone()];
    inputs.extend(operator.params());

    let params = LinearSolveParams {
        client: client.clone(),
        operator,
        solve,
        options,
    };
    bind_primitive(LINEAR_SOLVE, &inputs, Arc::new(params))
}

/// Differentiable preconditioned conjugate gradient
///
/// Returns `(x, info)` like [`cg`]. Gradients with respect to `b` and the
/// operator's parameters come from one more CG solve on the cotangent, with
/// the same initial guess, preconditioner and options.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use matfree::prelude::*;
/// use matfree::autograd::{Var, backward, var_cg, var_sum};
///
/// let client = CpuClient::new();
/// let a = DenseOperator::new(&client, Tensor::from_slice(&[4.0f64, 1.0, 1.0, 3.0], &[2, 2]))?;
/// let b = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), true);
///
/// let (x, _) = var_cg(&client, Arc::new(a), &b, None, None, CgOptions::default())?;
/// let loss = var_sum(&x, &client)?;
/// let grads = backward(&loss, &client)?;
///
/// // dL/db solves A u = 1: u = [2/11, 3/11]
/// let u = grads.get(b.id()).unwrap().to_vec::<f64>();
/// assert!((u[0] - 2.0 / 11.0).abs() < 1e-4);
/// assert!((u[1] - 3.0 / 11.0).abs() < 1e-4);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub fn var_cg(
    client: &CpuClient,
    operator: Arc<dyn DifferentiableOperator>,
    b: &Var,
    x0: Option<&Tensor>,
    precond: Option<Arc<dyn LinearOperator>>,
    options: CgOptions,
) -> Result<(Var, i32)> {
    let solver_client = client.clone();
    let x0 = x0.cloned();
    let solve: SolveFn = Arc::new(move |op: &dyn LinearOperator, rhs: &Tensor| -> Result<Tensor> {
        let (x, _info) = cg(&solver_client, op, rhs, x0.as_ref(), precond.as_deref(), options)?;
        Ok(x)
    });

    let x = custom_linear_solve(client, operator, b, solve, LinearSolveOptions::symmetric())?;
    Ok((x, 0))
}
