use super::LinearOperator;
use crate::error::{Error, Result};
use crate::ops::LinalgOps;
use crate::runtime::CpuClient;
use crate::tensor::Tensor;

/// Operator backed by an explicit row-major `[n, n]` matrix
///
/// Mostly useful for tests and small systems; the solvers still only see
/// matrix-vector products.
#[derive(Clone, Debug)]
pub struct DenseOperator {
    client: CpuClient,
    matrix: Tensor,
}

impl DenseOperator {
    /// Wrap a square matrix
    pub fn new(client: &CpuClient, matrix: Tensor) -> Result<Self> {
        match matrix.shape() {
            &[m, n] if m == n => Ok(Self {
                client: client.clone(),
                matrix,
            }),
            other => Err(Error::invalid_argument(
                "matrix",
                format!("expected a square 2-D tensor, got shape {other:?}"),
            )),
        }
    }

    /// The wrapped matrix
    pub fn matrix(&self) -> &Tensor {
        &self.matrix
    }

    /// Operator for Aᵗ
    pub fn transpose(&self) -> Result<Self> {
        Ok(Self {
            client: self.client.clone(),
            matrix: self.client.transpose(&self.matrix)?,
        })
    }
}

impl LinearOperator for DenseOperator {
    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        self.client.matvec(&self.matrix, x)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.matrix.shape()[0])
    }
}
