//! Data type system for matfree tensors
//!
//! This module provides the `DType` enum representing the supported element
//! types, the [`Element`] trait tying Rust types to them, and the
//! [`AccumulationPrecision`] knob used by inner products.

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::Element;

use std::fmt;

// ============================================================================
// Accumulation Precision
// ============================================================================

/// Accumulation precision for reductions and inner products.
///
/// Krylov methods compute a handful of inner products per iteration and feed
/// them straight back into the next update, so rounding error in the
/// accumulation compounds over long runs on ill-conditioned systems.
///
/// | Precision    | Accumulator                          | Use Case |
/// |--------------|--------------------------------------|----------|
/// | **Native**   | element type                         | cheapest, matches a naive loop |
/// | **F64**      | f64                                  | f32 data, moderate iteration counts |
/// | **Highest**  | f64 with Neumaier compensation       | long runs, ill-conditioned operators |
///
/// Every variant sums sequentially in index order, so results are
/// reproducible bit for bit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccumulationPrecision {
    /// Accumulate in the element type itself
    Native,
    /// Widen every product to f64 before accumulating
    F64,
    /// f64 accumulation with compensated (Neumaier) summation
    #[default]
    Highest,
}

// ============================================================================
// DType Enum
// ============================================================================

/// Data types supported by matfree tensors
///
/// Tensors carry their dtype at runtime; kernels recover the concrete Rust type
/// through [`crate::dispatch_dtype!`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point
    F32 = 1,
    /// 64-bit complex (two f32: re, im)
    Complex64 = 40,
    /// 128-bit complex (two f64: re, im)
    Complex128 = 41,
}

impl DType {
    /// Returns true if this is a real floating point type
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }

    /// Returns true if this is a complex number type
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// Short name for display (e.g., "f32", "c128")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::Complex64 => "c64",
            Self::Complex128 => "c128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
