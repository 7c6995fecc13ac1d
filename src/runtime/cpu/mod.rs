//! CPU runtime implementation
//!
//! Element-wise kernels are parallelised with Rayon above a size threshold when
//! the `rayon` feature is enabled. Reductions and inner products always run
//! sequentially in index order so a given input produces the same bits no
//! matter how many threads are available.

mod client;
pub(crate) mod kernels;
mod ops;

pub use client::CpuClient;
