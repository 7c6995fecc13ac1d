//! Backward pass implementation
//!
//! Implements reverse-mode automatic differentiation using topological sort
//! to traverse the computation graph and accumulate gradients.

use super::{GradFn, GradStore, Var};
use crate::error::{Error, Result};
use crate::ops::BinaryOps;
use crate::runtime::CpuClient;
use crate::tensor::{Tensor, TensorId};
use std::collections::HashSet;
use std::sync::Arc;

/// Compute gradients via reverse-mode automatic differentiation
///
/// Starting from a scalar loss, traverses the computation graph in
/// reverse topological order, computing gradients for all variables
/// that require them.
///
/// # Example
///
/// ```
/// use matfree::prelude::*;
/// use matfree::autograd::{Var, backward, var_mul};
///
/// let client = CpuClient::new();
/// let x = Var::new(Tensor::from_slice(&[2.0f64], &[1]), true);
/// let y = Var::new(Tensor::from_slice(&[3.0f64], &[1]), true);
///
/// let z = var_mul(&x, &y, &client)?;
/// let grads = backward(&z, &client)?;
///
/// assert_eq!(grads.get(x.id()).unwrap().to_vec::<f64>(), vec![3.0]);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub fn backward(loss: &Var, client: &CpuClient) -> Result<GradStore> {
    if loss.numel() != 1 {
        return Err(Error::ShapeMismatch {
            expected: vec![1],
            got: loss.shape().to_vec(),
        });
    }

    if !loss.requires_grad() {
        return Err(Error::Internal(
            "backward() called on a variable that doesn't require grad".into(),
        ));
    }

    let mut grad_store = GradStore::new();

    // dL/dL = 1
    let one = Tensor::ones(loss.shape(), loss.tensor().dtype());
    grad_store.insert(loss.id(), one);

    let topo_order = topological_sort(loss);

    for (var_id, grad_fn_opt, input_ids) in topo_order.into_iter().rev() {
        let grad_output = match grad_store.get(var_id) {
            Some(g) => g.clone(),
            None => continue,
        };

        if let Some(grad_fn) = grad_fn_opt {
            let input_grads = grad_fn.backward(&grad_output)?;

            for (input_id, input_grad_opt) in input_ids.iter().zip(input_grads) {
                if let Some(input_grad) = input_grad_opt {
                    grad_store.accumulate(*input_id, input_grad, |existing, new| {
                        client.add(&existing, &new)
                    })?;
                }
            }
        }
    }

    Ok(grad_store)
}

/// Entry for topological sort: (var_id, grad_fn, input_ids)
type TopoEntry = (TensorId, Option<Arc<dyn GradFn>>, Vec<TensorId>);

/// Build topological sort of computation graph using DFS post-order traversal
///
/// Returns nodes in topological order (inputs before outputs).
fn topological_sort(loss: &Var) -> Vec<TopoEntry> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();

    fn dfs(
        id: TensorId,
        grad_fn: Option<Arc<dyn GradFn>>,
        visited: &mut HashSet<TensorId>,
        result: &mut Vec<TopoEntry>,
    ) {
        if !visited.insert(id) {
            return;
        }

        let input_ids: Vec<TensorId> = grad_fn
            .as_ref()
            .map(|gf| gf.inputs().to_vec())
            .unwrap_or_default();

        if let Some(gf) = &grad_fn {
            for (input_id, input_grad_fn) in input_ids.iter().zip(gf.input_grad_fns()) {
                dfs(*input_id, input_grad_fn, visited, result);
            }
        }

        result.push((id, grad_fn, input_ids));
    }

    dfs(loss.id(), loss.grad_fn().cloned(), &mut visited, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_requires_scalar() {
        let client = CpuClient::new();
        let var = Var::new(Tensor::from_slice(&[1.0f64, 2.0], &[2]), true);
        assert!(matches!(
            backward(&var, &client),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_backward_requires_grad() {
        let client = CpuClient::new();
        let var = Var::new(Tensor::from_slice(&[1.0f64], &[1]), false);
        assert!(backward(&var, &client).is_err());
    }

    #[test]
    fn test_backward_leaf_variable() {
        let client = CpuClient::new();
        let var = Var::new(Tensor::from_slice(&[5.0f32], &[1]), true);
        let grads = backward(&var, &client).unwrap();
        assert_eq!(grads.get(var.id()).unwrap().to_vec::<f32>(), vec![1.0f32]);
    }
}
