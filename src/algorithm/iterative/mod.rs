//! Matrix-free iterative solvers
//!
//! # Available Linear Solvers
//!
//! - **CG** - preconditioned Conjugate Gradient for symmetric (Hermitian)
//!   positive-definite operators
//!
//! # Architecture
//!
//! The solver is a pure state machine: [`init_state`] builds a
//! [`SolverState`] from the right-hand side and the initial guess, [`step`]
//! maps one state to the next, and [`should_continue`] decides termination
//! against a [`ConvergenceCriteria`] fixed before the first iteration. The
//! drivers in [`crate::algorithm::control`] run the pair either eagerly or as a
//! compiled loop; both produce identical bits.
//!
//! Operators are only accessed through [`crate::linop::LinearOperator::apply`].

mod cg;
mod traits;
mod types;

pub use cg::{CgSystem, cg, cg_batch, cg_state, init_state, should_continue, step};
pub use traits::{IterativeSolvers, validate_cg_inputs};
pub use types::{CgOptions, ConvergenceCriteria, SolverState};
