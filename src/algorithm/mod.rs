//! Algorithms built on the tensor substrate
//!
//! - [`control`]: the looping construct solvers are expressed with
//! - [`iterative`]: matrix-free Krylov solvers (preconditioned conjugate gradient)

pub mod control;
pub mod iterative;
