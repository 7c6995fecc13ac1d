//! DType dispatch utilities
//!
//! The `dispatch_dtype!` macro converts a runtime [`crate::dtype::DType`] into a
//! concrete Rust type bound to an identifier inside a block:
//!
//! ```ignore
//! let bytes = dispatch_dtype!(tensor.dtype(), T => {
//!     std::mem::size_of::<T>()
//! });
//! ```
//!
//! `dispatch_real_dtype!` does the same for the real types only and returns an
//! `UnsupportedDType` error from the enclosing function for complex dtypes.

/// Macro for runtime dtype dispatch to typed operations.
#[macro_export]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = $crate::dtype::Complex64;
                $body
            }
            $crate::dtype::DType::Complex128 => {
                type $T = $crate::dtype::Complex128;
                $body
            }
        }
    };
}

/// Runtime dtype dispatch restricted to real floating point types.
#[macro_export]
macro_rules! dispatch_real_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            dtype => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype,
                    op: $error_op,
                });
            }
        }
    };
}
