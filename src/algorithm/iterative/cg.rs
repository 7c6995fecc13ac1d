//! Preconditioned Conjugate Gradient
//!
//! Algorithm (Hestenes-Stiefel, conjugate inner products):
//! ```text
//! r = b - A x0, z = M r, p = z, gamma = <r, z>, k = 0
//! atol2 = max(tol² <b, b>, atol²)
//! while rs > atol2 and k < max_iter:
//!     Ap = A p
//!     alpha = gamma / <p, Ap>
//!     x = x + alpha p
//!     r = r - alpha Ap
//!     z = M r
//!     gamma_new = <r, z>
//!     beta = gamma_new / gamma
//!     p = z + beta p
//!     gamma = gamma_new, k = k + 1
//! ```
//! with `rs = Re(gamma)` when M is the identity and `rs = <r, r>` otherwise.
//!
//! Zero denominators are not guarded: a breakdown shows up as non-finite values
//! in the returned solution, and a NaN stopping metric ends the loop.

use log::{debug, trace};

use crate::algorithm::control::{CompiledLoop, ExecutionMode, while_loop};
use crate::dispatch_dtype;
use crate::dtype::{AccumulationPrecision, Element};
use crate::error::{Error, Result};
use crate::linop::{IdentityOperator, LinearOperator};
use crate::ops::{BinaryOps, ReduceOps, ScalarOps};
use crate::runtime::CpuClient;
use crate::tensor::Tensor;

use super::traits::validate_cg_inputs;
use super::types::{CgOptions, ConvergenceCriteria, SolverState};

static IDENTITY: IdentityOperator = IdentityOperator { dim: None };

/// Everything a CG iteration reads but never changes
#[derive(Clone, Copy)]
pub struct CgSystem<'a> {
    /// Client executing vector operations
    pub client: &'a CpuClient,
    /// The operator A
    pub operator: &'a dyn LinearOperator,
    /// The preconditioner M
    pub precond: &'a dyn LinearOperator,
    /// Accumulation precision of every inner product
    pub precision: AccumulationPrecision,
}

impl<'a> CgSystem<'a> {
    /// Bundle a system; `precond = None` selects the identity
    pub fn new(
        client: &'a CpuClient,
        operator: &'a dyn LinearOperator,
        precond: Option<&'a dyn LinearOperator>,
        precision: AccumulationPrecision,
    ) -> Self {
        Self {
            client,
            operator,
            precond: precond.unwrap_or(&IDENTITY),
            precision,
        }
    }

    fn residual_metric<T: Element>(&self, r: &Tensor, gamma: T) -> Result<f64> {
        if self.precond.is_identity() {
            Ok(gamma.re())
        } else {
            self.client.norm_sq(r, self.precision)
        }
    }
}

/// Apply an operator and check it preserved shape and dtype
fn apply_checked(op: &dyn LinearOperator, v: &Tensor) -> Result<Tensor> {
    let out = op.apply(v)?;
    Error::check_shapes(v.shape(), out.shape())?;
    Error::check_dtypes(v.dtype(), out.dtype())?;
    Ok(out)
}

/// Build the initial state from the right-hand side and initial guess
pub fn init_state<T: Element>(
    sys: &CgSystem<'_>,
    b: &Tensor,
    x0: &Tensor,
) -> Result<SolverState<T>> {
    let ax = apply_checked(sys.operator, x0)?;
    let r = sys.client.sub(b, &ax)?;
    let z = apply_checked(sys.precond, &r)?;
    let gamma = sys.client.dot::<T>(&r, &z, sys.precision)?;
    let rs = sys.residual_metric(&r, gamma)?;

    Ok(SolverState {
        x: x0.clone(),
        r,
        gamma,
        p: z,
        k: 0,
        rs,
    })
}

/// One CG iteration
pub fn step<T: Element>(sys: &CgSystem<'_>, state: SolverState<T>) -> Result<SolverState<T>> {
    let client = sys.client;

    let ap = apply_checked(sys.operator, &state.p)?;
    let p_ap = client.dot::<T>(&state.p, &ap, sys.precision)?;
    let alpha = state.gamma / p_ap;

    let x = client.axpy(alpha, &state.p, &state.x)?;
    let r = client.axpy(-alpha, &ap, &state.r)?;

    let z = apply_checked(sys.precond, &r)?;
    let gamma = client.dot::<T>(&r, &z, sys.precision)?;
    let beta = gamma / state.gamma;
    let p = client.axpy(beta, &state.p, &z)?;

    let rs = sys.residual_metric(&r, gamma)?;

    Ok(SolverState {
        x,
        r,
        gamma,
        p,
        k: state.k + 1,
        rs,
    })
}

/// Loop predicate: `rs > atol2 && k < max_iter`
#[inline]
pub fn should_continue<T: Element>(state: &SolverState<T>, criteria: &ConvergenceCriteria) -> bool {
    state.rs > criteria.atol2 && state.k < criteria.max_iter
}

fn traced_step<T: Element>(sys: &CgSystem<'_>, state: SolverState<T>) -> Result<SolverState<T>> {
    let next = step(sys, state)?;
    trace!("cg iteration {}: rs = {:e}", next.k, next.rs);
    Ok(next)
}

fn drive<T: Element>(
    sys: &CgSystem<'_>,
    criteria: ConvergenceCriteria,
    init: SolverState<T>,
    mode: ExecutionMode,
) -> Result<SolverState<T>> {
    match mode {
        ExecutionMode::Eager => while_loop(
            |s: &SolverState<T>| should_continue(s, &criteria),
            |s| traced_step(sys, s),
            init,
        ),
        ExecutionMode::Compiled => {
            let sys = *sys;
            CompiledLoop::new(
                move |s: &SolverState<T>| should_continue(s, &criteria),
                move |s| traced_step(&sys, s),
            )
            .run(init)
        }
    }
}

/// Run CG and return the final iteration state
///
/// `T` must be the element type of `b`. Inputs are validated before the
/// operator is applied for the first time.
pub fn cg_state<T: Element>(
    client: &CpuClient,
    operator: &dyn LinearOperator,
    b: &Tensor,
    x0: Option<&Tensor>,
    precond: Option<&dyn LinearOperator>,
    options: CgOptions,
) -> Result<SolverState<T>> {
    let n = validate_cg_inputs(operator, precond, b, x0, &options)?;
    Error::check_dtypes(T::DTYPE, b.dtype())?;

    let sys = CgSystem::new(client, operator, precond, options.precision);
    let criteria = ConvergenceCriteria::new(
        options.tol,
        options.atol,
        client.norm_sq(b, options.precision)?,
        options.resolved_max_iter(n),
    );

    let x0 = match x0 {
        Some(x0) => x0.clone(),
        None => Tensor::zeros_like(b),
    };
    let init = init_state::<T>(&sys, b, &x0)?;
    let state = drive(&sys, criteria, init, options.mode)?;

    debug!(
        "cg finished after {} iterations (n = {}, rs = {:e}, atol2 = {:e}, max_iter = {})",
        state.k, n, state.rs, criteria.atol2, criteria.max_iter
    );
    Ok(state)
}

/// Solve `A x = b` with preconditioned CG
///
/// Returns `(x, info)`. `info` is always 0: reaching `max_iter` is not
/// distinguished from convergence. Use [`cg_state`] to inspect the final
/// residual and iteration count.
///
/// # Example
///
/// ```
/// use matfree::prelude::*;
///
/// let client = CpuClient::new();
/// let a = DenseOperator::new(&client, Tensor::from_slice(&[4.0f64, 1.0, 1.0, 3.0], &[2, 2]))?;
/// let b = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
///
/// let (x, info) = cg(&client, &a, &b, None, None, CgOptions::default())?;
/// let x = x.to_vec::<f64>();
/// assert_eq!(info, 0);
/// assert!((x[0] - 1.0 / 11.0).abs() < 1e-4);
/// assert!((x[1] - 7.0 / 11.0).abs() < 1e-4);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub fn cg(
    client: &CpuClient,
    operator: &dyn LinearOperator,
    b: &Tensor,
    x0: Option<&Tensor>,
    precond: Option<&dyn LinearOperator>,
    options: CgOptions,
) -> Result<(Tensor, i32)> {
    let x = dispatch_dtype!(b.dtype(), T => {
        cg_state::<T>(client, operator, b, x0, precond, options)?.x
    });
    Ok((x, 0))
}

/// Solve `A x = b` for several independent right-hand sides
///
/// Every system starts from a zero initial guess and gets its own stopping
/// threshold. The systems are driven by one compiled loop; with the `rayon`
/// feature they run in parallel. Results are in input order.
pub fn cg_batch(
    client: &CpuClient,
    operator: &dyn LinearOperator,
    bs: &[Tensor],
    precond: Option<&dyn LinearOperator>,
    options: CgOptions,
) -> Result<Vec<(Tensor, i32)>> {
    let Some(first) = bs.first() else {
        return Ok(Vec::new());
    };
    dispatch_dtype!(first.dtype(), T => {
        cg_batch_typed::<T>(client, operator, bs, precond, options)
    })
}

fn cg_batch_typed<T: Element>(
    client: &CpuClient,
    operator: &dyn LinearOperator,
    bs: &[Tensor],
    precond: Option<&dyn LinearOperator>,
    options: CgOptions,
) -> Result<Vec<(Tensor, i32)>> {
    let sys = CgSystem::new(client, operator, precond, options.precision);

    let mut inits = Vec::with_capacity(bs.len());
    for b in bs {
        let n = validate_cg_inputs(operator, precond, b, None, &options)?;
        Error::check_dtypes(T::DTYPE, b.dtype())?;
        let criteria = ConvergenceCriteria::new(
            options.tol,
            options.atol,
            client.norm_sq(b, options.precision)?,
            options.resolved_max_iter(n),
        );
        inits.push(criteria);
    }

    let mut states = Vec::with_capacity(bs.len());
    for (b, criteria) in bs.iter().zip(inits) {
        let state = init_state::<T>(&sys, b, &Tensor::zeros_like(b))?;
        states.push((state, criteria));
    }

    let compiled = CompiledLoop::new(
        |(s, c): &(SolverState<T>, ConvergenceCriteria)| should_continue(s, c),
        |(s, c): (SolverState<T>, ConvergenceCriteria)| Ok((traced_step(&sys, s)?, c)),
    );
    let finals = compiled.run_batch(states)?;

    debug!(
        "cg_batch finished {} systems (iterations: {:?})",
        finals.len(),
        finals.iter().map(|(s, _)| s.k).collect::<Vec<_>>()
    );
    Ok(finals.into_iter().map(|(s, _)| (s.x, 0)).collect())
}
