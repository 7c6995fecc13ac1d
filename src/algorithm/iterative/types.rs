//! Solver options, stopping criteria and iteration state

use crate::algorithm::control::ExecutionMode;
use crate::dtype::{AccumulationPrecision, Element};
use crate::tensor::Tensor;

/// Configuration options for the Conjugate Gradient solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgOptions {
    /// Relative tolerance on the residual norm (default: 1e-5)
    pub tol: f64,
    /// Absolute tolerance on the residual norm (default: 0.0)
    pub atol: f64,
    /// Maximum number of iterations (default: `None`, meaning 10·N)
    pub max_iter: Option<usize>,
    /// Accumulation precision of every inner product (default: Highest)
    pub precision: AccumulationPrecision,
    /// Loop driver (default: Eager)
    pub mode: ExecutionMode,
}

impl Default for CgOptions {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            atol: 0.0,
            max_iter: None,
            precision: AccumulationPrecision::Highest,
            mode: ExecutionMode::Eager,
        }
    }
}

impl CgOptions {
    /// Iteration bound for a system of dimension `n`
    #[inline]
    pub fn resolved_max_iter(&self, n: usize) -> usize {
        self.max_iter.unwrap_or(10 * n)
    }
}

/// Stopping criteria, fixed once from the right-hand side
///
/// Iteration continues while `rs > atol2` and `k < max_iter`, where `rs` is
/// the squared residual metric tracked in [`SolverState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceCriteria {
    /// Squared absolute threshold `max(tol² ⟨b,b⟩, atol²)`
    pub atol2: f64,
    /// Iteration bound
    pub max_iter: usize,
}

impl ConvergenceCriteria {
    /// Criteria for a right-hand side with squared norm `b_norm_sq`
    pub fn new(tol: f64, atol: f64, b_norm_sq: f64, max_iter: usize) -> Self {
        Self {
            atol2: (tol * tol * b_norm_sq).max(atol * atol),
            max_iter,
        }
    }
}

/// Iteration record of preconditioned CG
///
/// A plain value: [`super::step`] consumes one state and returns the next.
#[derive(Debug, Clone)]
pub struct SolverState<T: Element> {
    /// Current solution estimate
    pub x: Tensor,
    /// Residual b − A x
    pub r: Tensor,
    /// Preconditioned residual inner product ⟨r, M r⟩
    pub gamma: T,
    /// Search direction
    pub p: Tensor,
    /// Number of completed iterations
    pub k: usize,
    /// Stopping metric: Re(gamma) for the identity preconditioner, ⟨r, r⟩
    /// otherwise
    pub rs: f64,
}
