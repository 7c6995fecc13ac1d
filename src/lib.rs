//! # matfree
//!
//! **Matrix-free preconditioned conjugate gradient with adjoint-based gradients.**
//!
//! matfree solves symmetric (Hermitian) positive-definite systems `A x = b`
//! where `A` is only available as a function `x ↦ A x`, and makes that solve a
//! differentiable operation: the gradient of a loss through `x` is obtained by
//! one more solve on the adjoint system instead of differentiating every
//! iteration.
//!
//! ## Features
//!
//! - **Tensors**: dtype-dynamic 1-D/2-D tensors in f32, f64, Complex64, Complex128
//! - **Linear operators**: identity, diagonal (Jacobi), dense, closure-backed
//! - **CG**: preconditioned conjugate gradient with selectable inner-product
//!   precision, eager or compiled loop execution, and batched right-hand sides
//! - **Autograd**: reverse-mode `Var`/`backward`, a registry of primitives with
//!   custom derivative rules, and the differentiable solves `var_cg` and
//!   `custom_linear_solve`
//!
//! ## Quick Start
//!
//! ```
//! use matfree::prelude::*;
//!
//! let client = CpuClient::new();
//! let a = DenseOperator::new(&client, Tensor::from_slice(&[4.0f64, 1.0, 1.0, 3.0], &[2, 2]))?;
//! let b = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
//!
//! let (x, info) = client.cg(&a, &b, None, None, CgOptions::default())?;
//! assert_eq!(info, 0);
//! # Ok::<(), matfree::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): multi-threaded element-wise kernels and batched solves

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod algorithm;
pub mod autograd;
pub mod dtype;
pub mod error;
pub mod linop;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::control::ExecutionMode;
    pub use crate::algorithm::iterative::{CgOptions, IterativeSolvers, cg, cg_batch};
    pub use crate::dtype::{AccumulationPrecision, Complex64, Complex128, DType};
    pub use crate::error::{Error, Result};
    pub use crate::linop::{
        DenseOperator, DiagonalOperator, FnOperator, IdentityOperator, LinearOperator,
    };
    pub use crate::ops::{BinaryOps, LinalgOps, ReduceOps, ScalarOps, TensorOps, UnaryOps};
    pub use crate::runtime::CpuClient;
    pub use crate::tensor::Tensor;
}
