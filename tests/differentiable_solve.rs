//! Integration tests for the differentiable linear solves

mod common;

use common::{assert_allclose_f64, create_cpu_client, dense_f64, random_spd, random_vec};
use matfree::autograd::{
    LINEAR_SOLVE, LinearSolveOptions, SolveFn, TracedOperator, Var, backward,
    custom_linear_solve, lookup_primitive, var_cg, var_dot, var_matvec, var_sum,
};
use matfree::prelude::*;
use std::sync::Arc;

fn spd_2x2(client: &CpuClient) -> DenseOperator {
    dense_f64(client, &[4.0, 1.0, 1.0, 3.0], 2)
}

fn tight() -> CgOptions {
    CgOptions {
        tol: 1e-12,
        ..Default::default()
    }
}

/// Direct 2x2 solve by Cramer's rule, probing the operator on basis vectors
fn cramer_solve() -> SolveFn {
    Arc::new(|op: &dyn LinearOperator, rhs: &Tensor| -> Result<Tensor> {
        let c0 = op.apply(&Tensor::from_slice(&[1.0f64, 0.0], &[2]))?.to_vec::<f64>();
        let c1 = op.apply(&Tensor::from_slice(&[0.0f64, 1.0], &[2]))?.to_vec::<f64>();
        let b = rhs.as_slice::<f64>()?;
        let det = c0[0] * c1[1] - c1[0] * c0[1];
        let x0 = (b[0] * c1[1] - c1[0] * b[1]) / det;
        let x1 = (c0[0] * b[1] - b[0] * c0[1]) / det;
        Ok(Tensor::from_slice(&[x0, x1], &[2]))
    })
}

// ============================================================================
// var_cg
// ============================================================================

#[test]
fn test_var_cg_forward_matches_cg() {
    let client = create_cpu_client();
    let a = spd_2x2(&client);
    let b = Tensor::from_slice(&[1.0f64, 2.0], &[2]);

    let (plain, _) = cg(&client, &a, &b, None, None, tight()).unwrap();
    let (x, info) = var_cg(&client, Arc::new(a), &Var::new(b, true), None, None, tight()).unwrap();

    assert_eq!(info, 0);
    assert_eq!(x.tensor().to_vec::<f64>(), plain.to_vec::<f64>());
    assert!(x.requires_grad());
}

#[test]
fn test_var_cg_gradient_wrt_rhs() {
    let client = create_cpu_client();
    let b = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), true);

    let (x, _) = var_cg(&client, Arc::new(spd_2x2(&client)), &b, None, None, tight()).unwrap();
    let loss = var_sum(&x, &client).unwrap();
    let grads = backward(&loss, &client).unwrap();

    let grad_b = grads.get(b.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_b, &[2.0 / 11.0, 3.0 / 11.0], 1e-8, 1e-10, "A⁻¹ 1");

    // The rule is the same engine run on the cotangent
    let ones = Tensor::ones(&[2], DType::F64);
    let (direct, _) = cg(&client, &spd_2x2(&client), &ones, None, None, tight()).unwrap();
    assert_eq!(grad_b, direct.to_vec::<f64>());
}

#[test]
fn test_var_cg_gradient_of_quadratic_loss() {
    // L = <x, x>, dL/dx = 2x = [2/11, 14/11], dL/db = A⁻¹ 2x = [-8/121, 54/121]
    let client = create_cpu_client();
    let b = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), true);

    let (x, _) = var_cg(&client, Arc::new(spd_2x2(&client)), &b, None, None, tight()).unwrap();
    let loss = var_dot(&x, &x, &client).unwrap();
    let grads = backward(&loss, &client).unwrap();

    let grad_b = grads.get(b.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_b, &[-8.0 / 121.0, 54.0 / 121.0], 1e-8, 1e-10, "A⁻¹ 2x");
}

#[test]
fn test_var_cg_gradient_wrt_operator_parameters() {
    // dL/dM = −u xᵀ with x = [1, 7]/11 and u = [2, 3]/11
    let client = create_cpu_client();
    let m = Var::new(Tensor::from_slice(&[4.0f64, 1.0, 1.0, 3.0], &[2, 2]), true);
    let op = TracedOperator::new(&client, vec![m.clone()], |p, x, c| var_matvec(&p[0], x, c));
    let b = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), false);

    let (x, _) = var_cg(&client, Arc::new(op), &b, None, None, tight()).unwrap();
    let loss = var_sum(&x, &client).unwrap();
    let grads = backward(&loss, &client).unwrap();

    let grad_m = grads.get(m.id()).unwrap();
    assert_eq!(grad_m.shape(), &[2, 2]);
    assert_allclose_f64(
        &grad_m.to_vec::<f64>(),
        &[-2.0 / 121.0, -14.0 / 121.0, -3.0 / 121.0, -21.0 / 121.0],
        1e-8,
        1e-10,
        "-outer(u, x)",
    );
}

#[test]
fn test_var_cg_parameter_gradient_matches_finite_differences() {
    let client = create_cpu_client();
    let n = 6;
    let a_data = random_spd(n, 21);
    let b_data = random_vec(n, 22);
    let b = Var::new(Tensor::from_slice(&b_data, &[n]), false);

    let loss_at = |a: &[f64]| {
        let op = dense_f64(&client, a, n);
        let (x, _) = cg(&client, &op, b.tensor(), None, None, tight()).unwrap();
        x.to_vec::<f64>().iter().sum::<f64>()
    };

    let m = Var::new(Tensor::from_slice(&a_data, &[n, n]), true);
    let op = TracedOperator::new(&client, vec![m.clone()], |p, x, c| var_matvec(&p[0], x, c));
    let (x, _) = var_cg(&client, Arc::new(op), &b, None, None, tight()).unwrap();
    let grads = backward(&var_sum(&x, &client).unwrap(), &client).unwrap();
    let grad_m = grads.get(m.id()).unwrap().to_vec::<f64>();

    let eps = 1e-4;
    for idx in [0, 7, 13, n * n - 1] {
        let mut plus = a_data.clone();
        let mut minus = a_data.clone();
        plus[idx] += eps;
        minus[idx] -= eps;
        let fd = (loss_at(&plus) - loss_at(&minus)) / (2.0 * eps);
        assert!(
            (fd - grad_m[idx]).abs() < 1e-6,
            "entry {idx}: finite difference {fd} vs adjoint {}",
            grad_m[idx]
        );
    }
}

#[test]
fn test_var_cg_with_preconditioner_and_initial_guess() {
    let client = create_cpu_client();
    let a = DiagonalOperator::new(&client, Tensor::from_slice(&[2.0f64, 5.0, 10.0], &[3])).unwrap();
    let m: Arc<dyn LinearOperator> = Arc::new(a.inverse().unwrap());
    let x0 = Tensor::from_slice(&[0.1f64, 0.1, 0.1], &[3]);
    let b = Var::new(Tensor::from_slice(&[1.0f64, 1.0, 1.0], &[3]), true);

    let (x, _) = var_cg(&client, Arc::new(a), &b, Some(&x0), Some(m), tight()).unwrap();
    assert_allclose_f64(&x.tensor().to_vec::<f64>(), &[0.5, 0.2, 0.1], 1e-10, 1e-12, "x");

    let grads = backward(&var_sum(&x, &client).unwrap(), &client).unwrap();
    let grad_b = grads.get(b.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_b, &[0.5, 0.2, 0.1], 1e-10, 1e-12, "A⁻¹ 1");
}

#[test]
fn test_var_cg_rejects_complex() {
    let client = create_cpu_client();
    let b = Var::new(Tensor::from_slice(&[Complex128::ONE, Complex128::new(0.0, 1.0)], &[2]), true);
    let result = var_cg(&client, Arc::new(IdentityOperator::new()), &b, None, None, tight());
    assert!(matches!(result, Err(Error::UnsupportedDType { .. })));
}

// ============================================================================
// custom_linear_solve
// ============================================================================

#[test]
fn test_linear_solve_primitive_is_registered() {
    let primitive = lookup_primitive(LINEAR_SOLVE).unwrap();
    assert_eq!(primitive.name(), LINEAR_SOLVE);
}

#[test]
fn test_custom_solve_symmetric_matches_var_cg() {
    let client = create_cpu_client();
    let b = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), true);

    let x = custom_linear_solve(
        &client,
        Arc::new(spd_2x2(&client)),
        &b,
        cramer_solve(),
        LinearSolveOptions::symmetric(),
    )
    .unwrap();
    assert_allclose_f64(&x.tensor().to_vec::<f64>(), &[1.0 / 11.0, 7.0 / 11.0], 1e-12, 1e-14, "x");

    let grads = backward(&var_sum(&x, &client).unwrap(), &client).unwrap();
    let grad_b = grads.get(b.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_b, &[2.0 / 11.0, 3.0 / 11.0], 1e-12, 1e-14, "A⁻¹ 1");
}

#[test]
fn test_custom_solve_non_symmetric_uses_transpose() {
    let client = create_cpu_client();
    let a = dense_f64(&client, &[3.0, 1.0, 0.0, 2.0], 2);
    let at = a.transpose().unwrap();
    let b = Var::new(Tensor::from_slice(&[1.0f64, 1.0], &[2]), true);

    let options = LinearSolveOptions {
        symmetric: false,
        transpose_solve: Some(cramer_solve()),
        transpose_operator: Some(Arc::new(at)),
    };
    let x = custom_linear_solve(&client, Arc::new(a), &b, cramer_solve(), options).unwrap();
    // x = A⁻¹ [1, 1] = [1/6, 1/2]
    assert_allclose_f64(&x.tensor().to_vec::<f64>(), &[1.0 / 6.0, 0.5], 1e-12, 1e-14, "x");

    let grads = backward(&var_sum(&x, &client).unwrap(), &client).unwrap();
    let grad_b = grads.get(b.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_b, &[1.0 / 3.0, 1.0 / 3.0], 1e-12, 1e-14, "A⁻ᵀ 1");
}

#[test]
fn test_custom_solve_non_symmetric_without_transpose_fails_backward() {
    let client = create_cpu_client();
    let a = dense_f64(&client, &[3.0, 1.0, 0.0, 2.0], 2);
    let b = Var::new(Tensor::from_slice(&[1.0f64, 1.0], &[2]), true);

    let x = custom_linear_solve(
        &client,
        Arc::new(a),
        &b,
        cramer_solve(),
        LinearSolveOptions::default(),
    )
    .unwrap();

    let result = backward(&var_sum(&x, &client).unwrap(), &client);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_gradient_flows_into_upstream_graph() {
    // b = 2c, so dL/dc = 2 A⁻¹ 1
    let client = create_cpu_client();
    let c = Var::new(Tensor::from_slice(&[0.5f64, 1.0], &[2]), true);
    let b = matfree::autograd::var_mul_scalar(&c, 2.0, &client).unwrap();

    let (x, _) = var_cg(&client, Arc::new(spd_2x2(&client)), &b, None, None, tight()).unwrap();
    let grads = backward(&var_sum(&x, &client).unwrap(), &client).unwrap();

    let grad_c = grads.get(c.id()).unwrap().to_vec::<f64>();
    assert_allclose_f64(&grad_c, &[4.0 / 11.0, 6.0 / 11.0], 1e-8, 1e-10, "2 A⁻¹ 1");
}
