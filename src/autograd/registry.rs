//! Process-wide registry of primitives with custom derivative rules
//!
//! A [`Primitive`] pairs a forward rule with a vector-Jacobian product. Once
//! registered under its name, [`bind_primitive`] evaluates it on [`Var`]s and
//! records a [`PrimitiveBackward`] node, so reverse-mode differentiation calls
//! the primitive's own `vjp` rather than tracing through the forward rule.
//!
//! The built-in primitives are registered when the registry is first touched.
//! After that the table is effectively read-only: later registrations of an
//! existing name are ignored.

use super::Var;
use super::ops::PrimitiveBackward;
use super::var_ops::solve::{LINEAR_SOLVE, LinearSolvePrimitive};
use crate::error::{Error, Result};
use crate::tensor::Tensor;
use log::debug;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Opaque, shareable parameters of one primitive application
///
/// Primitives downcast this to the concrete type they were bound with.
pub type PrimitiveParams = Arc<dyn Any + Send + Sync>;

/// An operation with a custom reverse-mode derivative rule
pub trait Primitive: Send + Sync {
    /// Registry key
    fn name(&self) -> &'static str;

    /// Evaluate the operation
    fn forward(&self, inputs: &[Tensor], params: &PrimitiveParams) -> Result<Tensor>;

    /// Vector-Jacobian product: gradients of the inputs given the gradient
    /// of the output
    ///
    /// Must return exactly one entry per input; `None` marks an input without
    /// a gradient.
    fn vjp(
        &self,
        inputs: &[Tensor],
        output: &Tensor,
        params: &PrimitiveParams,
        grad_output: &Tensor,
    ) -> Result<Vec<Option<Tensor>>>;
}

type Registry = RwLock<HashMap<&'static str, Arc<dyn Primitive>>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<&'static str, Arc<dyn Primitive>> = HashMap::new();
        map.insert(LINEAR_SOLVE, Arc::new(LinearSolvePrimitive));
        debug!("primitive registry initialised with '{LINEAR_SOLVE}'");
        RwLock::new(map)
    })
}

/// Register a primitive under its name
///
/// Returns `false` and leaves the registry unchanged if the name is taken.
pub fn register_primitive(primitive: Arc<dyn Primitive>) -> bool {
    let name = primitive.name();
    let mut map = registry().write();
    if map.contains_key(name) {
        debug!("primitive '{name}' already registered; ignoring");
        return false;
    }
    map.insert(name, primitive);
    debug!("registered primitive '{name}'");
    true
}

/// Look up a registered primitive
pub fn lookup_primitive(name: &str) -> Result<Arc<dyn Primitive>> {
    registry()
        .read()
        .get(name)
        .cloned()
        .ok_or_else(|| Error::UnknownPrimitive {
            name: name.to_string(),
        })
}

/// Evaluate a registered primitive on variables
///
/// When any input requires grad, the result carries a [`PrimitiveBackward`]
/// node dispatching to the primitive's `vjp`.
pub fn bind_primitive(name: &str, inputs: &[Var], params: PrimitiveParams) -> Result<Var> {
    let primitive = lookup_primitive(name)?;
    let tensors: Vec<Tensor> = inputs.iter().map(|v| v.tensor().clone()).collect();
    let output = primitive.forward(&tensors, &params)?;

    if inputs.iter().any(Var::requires_grad) {
        let grad_fn = PrimitiveBackward::new(
            primitive,
            params,
            inputs.iter().map(Var::id).collect(),
            tensors,
            output.clone(),
            inputs.iter().map(|v| v.grad_fn().cloned()).collect(),
        );
        Ok(Var::from_op(output, Arc::new(grad_fn)))
    } else {
        Ok(Var::new(output, false))
    }
}
