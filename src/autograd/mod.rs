//! Automatic differentiation (autograd)
//!
//! Reverse-mode automatic differentiation over [`crate::tensor::Tensor`]s.
//!
//! - [`Var`] wraps a tensor and records the [`GradFn`] that produced it.
//! - `var_*` functions compute a result and attach a backward node.
//! - [`backward`] walks the graph from a scalar loss and fills a [`GradStore`].
//!
//! Operations with their own derivative rule are expressed as a [`Primitive`]
//! registered in a process-wide table and applied with [`bind_primitive`].
//! The built-in linear-solve primitive backs [`custom_linear_solve`] and
//! [`var_cg`], whose gradients come from solving the adjoint system rather
//! than differentiating every solver iteration.

mod backward;
mod grad_fn;
mod grad_store;
mod registry;
mod var;
mod var_ops;

pub mod ops;

pub use backward::backward;
pub use grad_fn::GradFn;
pub use grad_store::GradStore;
pub use registry::{
    Primitive, PrimitiveParams, bind_primitive, lookup_primitive, register_primitive,
};
pub use var::Var;
pub use var_ops::{
    DifferentiableOperator, LINEAR_SOLVE, LinearSolveOptions, SolveFn, TracedOperator,
    custom_linear_solve, var_add, var_cg, var_dot, var_matvec, var_mul, var_mul_scalar, var_neg,
    var_sub, var_sum,
};
