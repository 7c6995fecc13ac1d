//! CPU kernels on typed slices
//!
//! Performance characteristics:
//! - Parallelization threshold: 4096 elements (element-wise and matvec rows)
//! - Reductions are serial and ordered

use crate::dtype::{AccumulationPrecision, Element};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Parallelization threshold: skip Rayon for small tensors (overhead > benefit)
const PARALLEL_THRESHOLD: usize = 4096;

#[cfg(feature = "rayon")]
const CHUNK_SIZE: usize = 4096;

/// Apply `f` to every element of `a`
pub fn unary_map<T, F>(a: &[T], f: F) -> Vec<T>
where
    T: Element,
    F: Fn(T) -> T + Send + Sync,
{
    let mut out = vec![T::zero(); a.len()];

    #[cfg(feature = "rayon")]
    if a.len() >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(CHUNK_SIZE)
            .zip(a.par_chunks(CHUNK_SIZE))
            .for_each(|(out_chunk, in_chunk)| {
                for (o, &x) in out_chunk.iter_mut().zip(in_chunk) {
                    *o = f(x);
                }
            });
        return out;
    }

    for (o, &x) in out.iter_mut().zip(a) {
        *o = f(x);
    }
    out
}

/// Apply `f` pairwise to `a` and `b` (equal lengths)
pub fn binary_map<T, F>(a: &[T], b: &[T], f: F) -> Vec<T>
where
    T: Element,
    F: Fn(T, T) -> T + Send + Sync,
{
    debug_assert_eq!(a.len(), b.len());
    let mut out = vec![T::zero(); a.len()];

    #[cfg(feature = "rayon")]
    if a.len() >= PARALLEL_THRESHOLD {
        out.par_chunks_mut(CHUNK_SIZE)
            .zip(a.par_chunks(CHUNK_SIZE).zip(b.par_chunks(CHUNK_SIZE)))
            .for_each(|(out_chunk, (a_chunk, b_chunk))| {
                for ((o, &x), &y) in out_chunk.iter_mut().zip(a_chunk).zip(b_chunk) {
                    *o = f(x, y);
                }
            });
        return out;
    }

    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = f(x, y);
    }
    out
}

/// Running sum with Neumaier compensation
///
/// Unlike plain Kahan summation this stays accurate when an added term is
/// larger in magnitude than the running sum.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeumaierSum {
    sum: f64,
    comp: f64,
}

impl NeumaierSum {
    #[inline]
    pub fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.comp += (self.sum - t) + v;
        } else {
            self.comp += (v - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    pub fn total(self) -> f64 {
        self.sum + self.comp
    }
}

/// Conjugate inner product Σ conj(aᵢ)·bᵢ with the requested accumulation
pub fn dot<T: Element>(a: &[T], b: &[T], precision: AccumulationPrecision) -> T {
    debug_assert_eq!(a.len(), b.len());
    match precision {
        AccumulationPrecision::Native => {
            let mut acc = T::zero();
            for (&x, &y) in a.iter().zip(b) {
                acc = acc + x.conj() * y;
            }
            acc
        }
        AccumulationPrecision::F64 => {
            let (mut re, mut im) = (0.0f64, 0.0f64);
            for (&x, &y) in a.iter().zip(b) {
                let (xr, xi, yr, yi) = (x.re(), x.im(), y.re(), y.im());
                re += xr * yr + xi * yi;
                im += xr * yi - xi * yr;
            }
            T::from_parts(re, im)
        }
        AccumulationPrecision::Highest => {
            let mut re = NeumaierSum::default();
            let mut im = NeumaierSum::default();
            for (&x, &y) in a.iter().zip(b) {
                let (xr, xi, yr, yi) = (x.re(), x.im(), y.re(), y.im());
                re.add(xr * yr);
                re.add(xi * yi);
                if T::DTYPE.is_complex() {
                    im.add(xr * yi);
                    im.add(-(xi * yr));
                }
            }
            T::from_parts(re.total(), im.total())
        }
    }
}

/// Plain ordered sum in the element type
pub fn sum<T: Element>(a: &[T]) -> T {
    a.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// Row-major y = A x for A of shape `[m, n]`
///
/// Each row is reduced serially; rows are distributed across threads for large
/// matrices.
pub fn matvec<T: Element>(a: &[T], x: &[T], m: usize, n: usize) -> Vec<T> {
    let row = |i: usize| -> T {
        let r = &a[i * n..(i + 1) * n];
        r.iter()
            .zip(x)
            .fold(T::zero(), |acc, (&aij, &xj)| acc + aij * xj)
    };

    #[cfg(feature = "rayon")]
    if m * n >= PARALLEL_THRESHOLD {
        return (0..m).into_par_iter().map(row).collect();
    }

    (0..m).map(row).collect()
}

/// Row-major transpose of an `[m, n]` matrix
pub fn transpose<T: Element>(a: &[T], m: usize, n: usize) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    for i in 0..m {
        for j in 0..n {
            out[j * m + i] = a[i * n + j];
        }
    }
    out
}

/// Outer product u vᵀ, shape `[u.len(), v.len()]`
pub fn outer<T: Element>(u: &[T], v: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(u.len() * v.len());
    for &ui in u {
        out.extend(v.iter().map(|&vj| ui * vj));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;

    #[test]
    fn test_neumaier_recovers_cancelled_term() {
        let data = [1.0f64, 1e100, 1.0, -1e100];
        let mut acc = NeumaierSum::default();
        for &v in &data {
            acc.add(v);
        }
        assert_eq!(acc.total(), 2.0);
        assert_eq!(data.iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_dot_precisions_agree_on_easy_input() {
        let a = [1.0f64, 2.0, 3.0];
        let b = [4.0f64, 5.0, 6.0];
        for p in [
            AccumulationPrecision::Native,
            AccumulationPrecision::F64,
            AccumulationPrecision::Highest,
        ] {
            assert_eq!(dot(&a, &b, p), 32.0);
        }
    }

    #[test]
    fn test_dot_conjugates_left_operand() {
        // conj(i) * i = 1
        let a = [Complex128::new(0.0, 1.0)];
        for p in [
            AccumulationPrecision::Native,
            AccumulationPrecision::F64,
            AccumulationPrecision::Highest,
        ] {
            assert_eq!(dot(&a, &a, p), Complex128::ONE);
        }
        // conj(1+2i) * (3+4i) = (1-2i)(3+4i) = 11 - 2i
        let a = [Complex128::new(1.0, 2.0)];
        let b = [Complex128::new(3.0, 4.0)];
        assert_eq!(
            dot(&a, &b, AccumulationPrecision::Highest),
            Complex128::new(11.0, -2.0)
        );
    }

    #[test]
    fn test_binary_map_large_matches_serial() {
        let n = 3 * PARALLEL_THRESHOLD + 17;
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..n).map(|i| 2.0 * i as f64).collect();
        let out = binary_map(&a, &b, |x, y| x + y);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, 3.0 * i as f64);
        }
    }

    #[test]
    fn test_matvec_and_transpose() {
        // [[1, 2, 3], [4, 5, 6]]
        let a = [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(matvec(&a, &[1.0, 1.0, 1.0], 2, 3), vec![6.0, 15.0]);
        assert_eq!(transpose(&a, 2, 3), vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(outer(&[1.0f64, 2.0], &[3.0, 4.0]), vec![3.0, 4.0, 6.0, 8.0]);
    }
}
