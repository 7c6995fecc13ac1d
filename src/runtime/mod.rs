//! Compute runtime
//!
//! matfree ships a single CPU runtime. All vector work the solvers and the
//! autograd engine perform is dispatched through [`CpuClient`].

pub mod cpu;

pub use cpu::CpuClient;
