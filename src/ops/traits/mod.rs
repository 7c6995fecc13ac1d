//! Operation traits for tensor operations.
//!
//! Implementations live in [`crate::runtime::cpu`].

mod binary;
mod linalg;
mod reduce;
mod scalar;
mod unary;

pub use binary::BinaryOps;
pub use linalg::LinalgOps;
pub use reduce::ReduceOps;
pub use scalar::ScalarOps;
pub use unary::UnaryOps;

/// Core tensor operations trait
///
/// Aggregates every operation trait; implemented automatically for any client
/// that implements all of them.
pub trait TensorOps: BinaryOps + UnaryOps + ScalarOps + ReduceOps + LinalgOps {}

impl<C> TensorOps for C where C: BinaryOps + UnaryOps + ScalarOps + ReduceOps + LinalgOps {}
