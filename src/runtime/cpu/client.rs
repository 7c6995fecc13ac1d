//! CPU client for operation dispatch

/// CPU client for operation dispatch
///
/// The client is the receiver of every op trait. It holds no configuration:
/// inner products take their accumulation precision as an argument, which the
/// CG engine reads from [`crate::algorithm::iterative::CgOptions::precision`].
#[derive(Clone, Debug, Default)]
pub struct CpuClient;

impl CpuClient {
    /// Create a new CPU client
    pub fn new() -> Self {
        Self
    }
}
