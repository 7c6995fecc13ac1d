//! Tensor operations
//!
//! This module defines the vector substrate the solvers and the autograd engine
//! are written against.
//!
//! # Design
//!
//! Operations are defined as traits implemented by a client type, which gives
//! them a place to carry configuration such as the default accumulation
//! precision.
//!
//! ```text
//! CpuClient
//!   └── implements TensorOps
//!         ├── add, sub, mul           (BinaryOps)
//!         ├── neg                     (UnaryOps)
//!         ├── mul_scalar, scale, axpy (ScalarOps)
//!         ├── sum, dot, norm_sq       (ReduceOps)
//!         └── matvec, transpose, outer (LinalgOps)
//! ```

pub(crate) mod dispatch;
mod traits;

pub use crate::dtype::AccumulationPrecision;
pub use traits::{BinaryOps, LinalgOps, ReduceOps, ScalarOps, TensorOps, UnaryOps};
