//! Element trait for mapping Rust types to DType

use super::{Complex64, Complex128, DType};
use crate::tensor::Storage;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to the runtime dtype carried by
/// [`crate::tensor::Tensor`]. It is implemented for the real and complex
/// floating point types a Krylov solver can work in.
///
/// Complex elements are treated as a pair of `f64` components (`re`, `im`) when
/// accumulating in higher precision; real elements report `im() == 0`.
pub trait Element:
    Copy
    + Clone
    + Send
    + Sync
    + Pod
    + Zeroable
    + Debug
    + PartialEq
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64. For complex types this is the magnitude |z|.
    fn to_f64(self) -> f64;

    /// Convert from f64. For complex types the imaginary part is zero.
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Real component as f64
    fn re(self) -> f64;

    /// Imaginary component as f64 (zero for real types)
    fn im(self) -> f64;

    /// Build from f64 components, dropping `im` for real types
    fn from_parts(re: f64, im: f64) -> Self;

    /// Wrap an owned buffer as tensor storage
    fn into_storage(data: Arc<[Self]>) -> Storage;

    /// Borrow tensor storage as a typed slice, if the dtype matches
    fn from_storage(storage: &Storage) -> Option<&[Self]>;
}

macro_rules! impl_real_element {
    ($ty:ty, $dtype:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $ty
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn re(self) -> f64 {
                self as f64
            }

            #[inline]
            fn im(self) -> f64 {
                0.0
            }

            #[inline]
            fn from_parts(re: f64, _im: f64) -> Self {
                re as $ty
            }

            fn into_storage(data: Arc<[Self]>) -> Storage {
                Storage::$dtype(data)
            }

            fn from_storage(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$dtype(data) => Some(&data[..]),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! impl_complex_element {
    ($ty:ident, $float:ty) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$ty;

            #[inline]
            fn to_f64(self) -> f64 {
                self.magnitude() as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                $ty::new(v as $float, 0.0)
            }

            #[inline]
            fn zero() -> Self {
                $ty::ZERO
            }

            #[inline]
            fn one() -> Self {
                $ty::ONE
            }

            #[inline]
            fn conj(self) -> Self {
                $ty::conj(self)
            }

            #[inline]
            fn re(self) -> f64 {
                self.re as f64
            }

            #[inline]
            fn im(self) -> f64 {
                self.im as f64
            }

            #[inline]
            fn from_parts(re: f64, im: f64) -> Self {
                $ty::new(re as $float, im as $float)
            }

            fn into_storage(data: Arc<[Self]>) -> Storage {
                Storage::$ty(data)
            }

            fn from_storage(storage: &Storage) -> Option<&[Self]> {
                match storage {
                    Storage::$ty(data) => Some(&data[..]),
                    _ => None,
                }
            }
        }
    };
}

impl_real_element!(f64, F64);
impl_real_element!(f32, F32);
impl_complex_element!(Complex64, f32);
impl_complex_element!(Complex128, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_parts() {
        assert_eq!(2.5f32.re(), 2.5);
        assert_eq!(2.5f32.im(), 0.0);
        assert_eq!(f64::from_parts(1.5, 9.0), 1.5);
        assert_eq!((-3.0f64).conj(), -3.0);
    }

    #[test]
    fn test_complex_parts() {
        let z = Complex128::from_parts(1.0, -2.0);
        assert_eq!(z.re(), 1.0);
        assert_eq!(z.im(), -2.0);
        assert_eq!(Element::conj(z), Complex128::new(1.0, 2.0));
        assert_eq!(Complex64::from_f64(3.0), Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_storage_round_trip() {
        let storage = f64::into_storage(Arc::from(vec![1.0, 2.0]));
        assert_eq!(f64::from_storage(&storage), Some(&[1.0, 2.0][..]));
        assert!(f32::from_storage(&storage).is_none());
    }
}
