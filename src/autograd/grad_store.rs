//! Gradient storage and accumulation

use crate::error::Result;
use crate::tensor::{Tensor, TensorId};
use std::collections::HashMap;

/// Storage for gradients computed during backward pass
///
/// Gradients are stored by variable ID and accumulated when a variable
/// is used multiple times in the computation graph.
#[derive(Debug, Default)]
pub struct GradStore {
    grads: HashMap<TensorId, Tensor>,
}

impl GradStore {
    /// Create a new empty gradient store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the gradient for a variable
    pub fn get(&self, id: TensorId) -> Option<&Tensor> {
        self.grads.get(&id)
    }

    /// Insert a gradient (overwrites if exists)
    pub fn insert(&mut self, id: TensorId, grad: Tensor) {
        self.grads.insert(id, grad);
    }

    /// Number of stored gradients
    pub fn len(&self) -> usize {
        self.grads.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.grads.is_empty()
    }

    /// Accumulate a gradient for a variable
    ///
    /// If no gradient exists yet the gradient is stored; otherwise
    /// `add_fn(existing, new)` replaces it. A variable used several times in
    /// the graph receives the sum of its gradient contributions.
    pub fn accumulate<F>(&mut self, id: TensorId, grad: Tensor, add_fn: F) -> Result<()>
    where
        F: FnOnce(Tensor, Tensor) -> Result<Tensor>,
    {
        let accumulated = match self.grads.remove(&id) {
            Some(existing) => add_fn(existing, grad)?,
            None => grad,
        };
        self.grads.insert(id, accumulated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn test_accumulate_sums() {
        let mut store = GradStore::new();
        let id = TensorId::new();
        store
            .accumulate(id, Tensor::ones(&[2], DType::F64), |_, _| unreachable!())
            .unwrap();
        store
            .accumulate(id, Tensor::ones(&[2], DType::F64), |a, b| {
                let (a, b) = (a.to_vec::<f64>(), b.to_vec::<f64>());
                Tensor::from_vec(a.iter().zip(&b).map(|(x, y)| x + y).collect(), &[2])
            })
            .unwrap();
        assert_eq!(store.get(id).unwrap().to_vec::<f64>(), vec![2.0, 2.0]);
        assert_eq!(store.len(), 1);
    }
}
