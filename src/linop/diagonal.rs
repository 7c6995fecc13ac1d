use super::LinearOperator;
use crate::dispatch_dtype;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::BinaryOps;
use crate::runtime::CpuClient;
use crate::runtime::cpu::kernels;
use crate::tensor::Tensor;

/// Diagonal operator `diag(d)`
///
/// [`DiagonalOperator::inverse`] gives the Jacobi preconditioner for a
/// diagonally dominant system.
#[derive(Clone, Debug)]
pub struct DiagonalOperator {
    client: CpuClient,
    diag: Tensor,
}

impl DiagonalOperator {
    /// Wrap a 1-D tensor of diagonal entries
    pub fn new(client: &CpuClient, diag: Tensor) -> Result<Self> {
        if diag.ndim() != 1 {
            return Err(Error::invalid_argument(
                "diag",
                format!("expected a 1-D tensor, got shape {:?}", diag.shape()),
            ));
        }
        Ok(Self {
            client: client.clone(),
            diag,
        })
    }

    /// Diagonal entries
    pub fn diag(&self) -> &Tensor {
        &self.diag
    }

    /// Element-wise reciprocal of the diagonal
    ///
    /// Zero entries become infinite (or NaN for complex) rather than failing.
    pub fn inverse(&self) -> Result<Self> {
        let inv = dispatch_dtype!(self.diag.dtype(), T => {
            let data = kernels::unary_map::<T, _>(self.diag.as_slice()?, |d| T::one() / d);
            Tensor::from_vec(data, self.diag.shape())?
        });
        Ok(Self {
            client: self.client.clone(),
            diag: inv,
        })
    }
}

impl LinearOperator for DiagonalOperator {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        self.client.mul(&self.diag, x)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.diag.numel())
    }
}
