//! Complex scalars for Hermitian systems
//!
//! Both types are `#[repr(C)]` pairs `(re, im)` and `Pod`, so a complex tensor
//! buffer is an interleaved float buffer. Beyond field arithmetic the solver
//! only needs the conjugate, which the inner product `Σ conj(aᵢ)·bᵢ` applies to
//! its left operand.

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! complex_scalar {
    ($name:ident, $float:ty, $bits:literal) => {
        #[doc = concat!(
            "Complex scalar of two `", stringify!($float), "` components (", $bits, " bits)"
        )]
        #[repr(C)]
        #[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
        pub struct $name {
            /// Real part
            pub re: $float,
            /// Imaginary part
            pub im: $float,
        }

        impl $name {
            /// 0 + 0i
            pub const ZERO: Self = Self::new(0.0, 0.0);

            /// 1 + 0i
            pub const ONE: Self = Self::new(1.0, 0.0);

            /// Build from components
            #[inline]
            pub const fn new(re: $float, im: $float) -> Self {
                Self { re, im }
            }

            /// |z|, via `hypot` so large components do not overflow
            #[inline]
            pub fn magnitude(self) -> $float {
                self.re.hypot(self.im)
            }

            /// re - im·i
            #[inline]
            pub fn conj(self) -> Self {
                Self::new(self.re, -self.im)
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self::new(self.re + rhs.re, self.im + rhs.im)
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self::new(self.re - rhs.re, self.im - rhs.im)
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self::new(
                    self.re * rhs.re - self.im * rhs.im,
                    self.re * rhs.im + self.im * rhs.re,
                )
            }
        }

        impl Div for $name {
            type Output = Self;

            /// `self · conj(rhs) / |rhs|²`; a zero divisor yields NaN in both parts
            #[inline]
            fn div(self, rhs: Self) -> Self {
                let norm = rhs.re * rhs.re + rhs.im * rhs.im;
                if norm == 0.0 {
                    return Self::new(<$float>::NAN, <$float>::NAN);
                }
                let num = self * rhs.conj();
                Self::new(num.re / norm, num.im / norm)
            }
        }

        impl Neg for $name {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self::new(-self.re, -self.im)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:+}i", self.re, self.im)
            }
        }
    };
}

complex_scalar!(Complex64, f32, "64");
complex_scalar!(Complex128, f64, "128");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_with_conjugate_is_squared_magnitude() {
        let z = Complex128::new(3.0, 4.0);
        assert_eq!(z.conj() * z, Complex128::new(25.0, 0.0));
        assert_eq!(z.magnitude(), 5.0);
    }

    #[test]
    fn test_division_inverts_multiplication() {
        let a = Complex128::new(1.0, 2.0);
        let b = Complex128::new(3.0, -4.0);
        let q = (a * b) / b;
        assert!((q - a).magnitude() < 1e-15);

        let c = Complex64::new(2.0, 0.0) / Complex64::new(0.0, 1.0);
        assert_eq!(c, Complex64::new(0.0, -2.0));
    }

    #[test]
    fn test_zero_divisor_gives_nan() {
        let z = Complex64::ONE / Complex64::ZERO;
        assert!(z.re.is_nan() && z.im.is_nan());
    }

    #[test]
    fn test_display_sign() {
        assert_eq!(Complex128::new(1.0, -2.0).to_string(), "1-2i");
        assert_eq!(Complex128::new(1.0, 2.0).to_string(), "1+2i");
    }
}
