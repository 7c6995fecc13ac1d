//! Error types for matfree

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using matfree's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matfree operations
///
/// Only argument and shape problems are reported as errors. Numerical trouble
/// inside an iterative solve (zero denominators, non-convergence) is never
/// raised; it shows up in the values of the returned tensor.
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch in an operation
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// DType mismatch between operands
    #[error("DType mismatch: {lhs:?} vs {rhs:?}")]
    DTypeMismatch {
        /// Left-hand side dtype
        lhs: DType,
        /// Right-hand side dtype
        rhs: DType,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Missing gradient in backward pass
    #[error("Missing gradient for tensor")]
    MissingGradient,

    /// No primitive registered under the requested name
    #[error("No primitive registered under the name '{name}'")]
    UnknownPrimitive {
        /// The requested primitive name
        name: String,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Fail with `DTypeMismatch` unless both dtypes agree
    pub fn check_dtypes(lhs: DType, rhs: DType) -> Result<()> {
        if lhs != rhs {
            return Err(Self::DTypeMismatch { lhs, rhs });
        }
        Ok(())
    }

    /// Fail with `ShapeMismatch` unless both shapes agree
    pub fn check_shapes(expected: &[usize], got: &[usize]) -> Result<()> {
        if expected != got {
            return Err(Self::shape_mismatch(expected, got));
        }
        Ok(())
    }
}
