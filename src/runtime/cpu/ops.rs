//! TensorOps implementation for the CPU client

use super::client::CpuClient;
use super::kernels;
use crate::dtype::{AccumulationPrecision, Element};
use crate::error::{Error, Result};
use crate::ops::{BinaryOps, LinalgOps, ReduceOps, ScalarOps, UnaryOps};
use crate::tensor::Tensor;
use crate::{dispatch_dtype, dispatch_real_dtype};

/// Validate that two operands agree on dtype and shape
fn check_same(a: &Tensor, b: &Tensor) -> Result<()> {
    Error::check_dtypes(a.dtype(), b.dtype())?;
    Error::check_shapes(a.shape(), b.shape())
}

/// Validate a 2-D operand and return (rows, cols)
fn matrix_dims(a: &Tensor, arg: &'static str) -> Result<(usize, usize)> {
    match a.shape() {
        &[m, n] => Ok((m, n)),
        other => Err(Error::invalid_argument(
            arg,
            format!("expected a 2-D tensor, got shape {other:?}"),
        )),
    }
}

fn binary_op<F>(a: &Tensor, b: &Tensor, f: F) -> Result<Tensor>
where
    F: BinaryFn,
{
    check_same(a, b)?;
    dispatch_dtype!(a.dtype(), T => {
        let out = kernels::binary_map::<T, _>(a.as_slice()?, b.as_slice()?, |x, y| f.apply(x, y));
        Tensor::from_vec(out, a.shape())
    })
}

/// Element-wise binary function usable at every dtype
trait BinaryFn: Copy + Send + Sync {
    fn apply<T: Element>(self, x: T, y: T) -> T;
}

#[derive(Clone, Copy)]
struct AddFn;
#[derive(Clone, Copy)]
struct SubFn;
#[derive(Clone, Copy)]
struct MulFn;

impl BinaryFn for AddFn {
    #[inline]
    fn apply<T: Element>(self, x: T, y: T) -> T {
        x + y
    }
}

impl BinaryFn for SubFn {
    #[inline]
    fn apply<T: Element>(self, x: T, y: T) -> T {
        x - y
    }
}

impl BinaryFn for MulFn {
    #[inline]
    fn apply<T: Element>(self, x: T, y: T) -> T {
        x * y
    }
}

impl BinaryOps for CpuClient {
    fn add(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        binary_op(a, b, AddFn)
    }

    fn sub(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        binary_op(a, b, SubFn)
    }

    fn mul(&self, a: &Tensor, b: &Tensor) -> Result<Tensor> {
        binary_op(a, b, MulFn)
    }
}

impl UnaryOps for CpuClient {
    fn neg(&self, a: &Tensor) -> Result<Tensor> {
        dispatch_dtype!(a.dtype(), T => {
            Tensor::from_vec(kernels::unary_map::<T, _>(a.as_slice()?, |x| -x), a.shape())
        })
    }
}

impl ScalarOps for CpuClient {
    fn mul_scalar(&self, a: &Tensor, scalar: f64) -> Result<Tensor> {
        dispatch_dtype!(a.dtype(), T => {
            let s = T::from_f64(scalar);
            Tensor::from_vec(kernels::unary_map::<T, _>(a.as_slice()?, |x| x * s), a.shape())
        })
    }

    fn scale<T: Element>(&self, alpha: T, x: &Tensor) -> Result<Tensor> {
        let out = kernels::unary_map(x.as_slice::<T>()?, |v| alpha * v);
        Tensor::from_vec(out, x.shape())
    }

    fn axpy<T: Element>(&self, alpha: T, x: &Tensor, y: &Tensor) -> Result<Tensor> {
        check_same(x, y)?;
        let out = kernels::binary_map(x.as_slice::<T>()?, y.as_slice::<T>()?, |a, b| {
            alpha * a + b
        });
        Tensor::from_vec(out, x.shape())
    }
}

impl ReduceOps for CpuClient {
    fn sum(&self, a: &Tensor) -> Result<Tensor> {
        dispatch_dtype!(a.dtype(), T => {
            let total = kernels::sum::<T>(a.as_slice()?);
            Tensor::from_vec(vec![total], &[1])
        })
    }

    fn dot<T: Element>(
        &self,
        a: &Tensor,
        b: &Tensor,
        precision: AccumulationPrecision,
    ) -> Result<T> {
        check_same(a, b)?;
        if a.ndim() != 1 {
            return Err(Error::invalid_argument(
                "a",
                format!("dot expects 1-D vectors, got shape {:?}", a.shape()),
            ));
        }
        Ok(kernels::dot(a.as_slice::<T>()?, b.as_slice::<T>()?, precision))
    }

    fn norm_sq(&self, a: &Tensor, precision: AccumulationPrecision) -> Result<f64> {
        dispatch_dtype!(a.dtype(), T => {
            let data = a.as_slice::<T>()?;
            Ok(kernels::dot(data, data, precision).re())
        })
    }
}

impl LinalgOps for CpuClient {
    fn matvec(&self, a: &Tensor, x: &Tensor) -> Result<Tensor> {
        Error::check_dtypes(a.dtype(), x.dtype())?;
        let (m, n) = matrix_dims(a, "a")?;
        Error::check_shapes(&[n], x.shape())?;
        dispatch_dtype!(a.dtype(), T => {
            let out = kernels::matvec::<T>(a.as_slice()?, x.as_slice()?, m, n);
            Tensor::from_vec(out, &[m])
        })
    }

    fn transpose(&self, a: &Tensor) -> Result<Tensor> {
        let (m, n) = matrix_dims(a, "a")?;
        dispatch_dtype!(a.dtype(), T => {
            Tensor::from_vec(kernels::transpose::<T>(a.as_slice()?, m, n), &[n, m])
        })
    }

    fn outer(&self, u: &Tensor, v: &Tensor) -> Result<Tensor> {
        Error::check_dtypes(u.dtype(), v.dtype())?;
        if u.ndim() != 1 || v.ndim() != 1 {
            return Err(Error::invalid_argument("u", "outer expects two 1-D vectors"));
        }
        // Outer products only appear in real-valued gradients.
        dispatch_real_dtype!(u.dtype(), T => {
            Tensor::from_vec(kernels::outer::<T>(u.as_slice()?, v.as_slice()?), &[u.numel(), v.numel()])
        }, "outer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::{Complex64, DType};

    #[test]
    fn test_binary_ops_validate() {
        let client = CpuClient::new();
        let a = Tensor::from_slice(&[1.0f64, 2.0], &[2]);
        let b = Tensor::from_slice(&[1.0f64, 2.0, 3.0], &[3]);
        let c = Tensor::from_slice(&[1.0f32, 2.0], &[2]);
        assert!(matches!(client.add(&a, &b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(client.sub(&a, &c), Err(Error::DTypeMismatch { .. })));
        assert_eq!(client.mul(&a, &a).unwrap().to_vec::<f64>(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_axpy_typed_scalar() {
        let client = CpuClient::new();
        let x = Tensor::from_slice(&[1.0f32, 2.0], &[2]);
        let y = Tensor::from_slice(&[10.0f32, 20.0], &[2]);
        let z = client.axpy(2.0f32, &x, &y).unwrap();
        assert_eq!(z.to_vec::<f32>(), vec![12.0, 24.0]);
        assert!(client.axpy(2.0f64, &x, &y).is_err());
    }

    #[test]
    fn test_complex_scale_and_norm() {
        let client = CpuClient::new();
        let x = Tensor::from_slice(&[Complex64::new(3.0, 4.0)], &[1]);
        let y = client.scale(Complex64::new(0.0, 1.0), &x).unwrap();
        assert_eq!(y.to_vec::<Complex64>(), vec![Complex64::new(-4.0, 3.0)]);
        assert_eq!(client.norm_sq(&y, AccumulationPrecision::Highest).unwrap(), 25.0);
    }

    #[test]
    fn test_sum_shape() {
        let client = CpuClient::new();
        let s = client.sum(&Tensor::ones(&[5], DType::F64)).unwrap();
        assert_eq!(s.shape(), &[1]);
        assert_eq!(s.item::<f64>().unwrap(), 5.0);
    }

    #[test]
    fn test_matvec_shape_checks() {
        let client = CpuClient::new();
        let a = Tensor::from_slice(&[1.0f64, 2.0, 3.0, 4.0], &[2, 2]);
        let x = Tensor::from_slice(&[1.0f64, 1.0, 1.0], &[3]);
        assert!(client.matvec(&a, &x).is_err());
        let x = Tensor::from_slice(&[1.0f64, -1.0], &[2]);
        assert_eq!(client.matvec(&a, &x).unwrap().to_vec::<f64>(), vec![-1.0, -1.0]);
    }

    #[test]
    fn test_outer_rejects_complex() {
        let client = CpuClient::new();
        let u = Tensor::from_slice(&[Complex64::ONE], &[1]);
        assert!(matches!(
            client.outer(&u, &u),
            Err(Error::UnsupportedDType { .. })
        ));
    }
}
