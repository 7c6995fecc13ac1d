//! Macro-based code generation for var_* functions

/// Binary operation whose backward only needs the input ids (add, sub)
///
/// The `with_client` form passes the client on to the backward node.
macro_rules! impl_var_binary_op_ids {
    ($(#[$meta:meta])* $fn_name:ident, $op_method:ident, $backward_ty:ident) => {
        $(#[$meta])*
        pub fn $fn_name(a: &Var, b: &Var, client: &CpuClient) -> Result<Var> {
            ensure_real(a.tensor().dtype(), stringify!($fn_name))?;
            let output = client.$op_method(a.tensor(), b.tensor())?;

            if a.requires_grad() || b.requires_grad() {
                let grad_fn =
                    $backward_ty::new(a.id(), b.id(), a.grad_fn().cloned(), b.grad_fn().cloned());
                Ok(Var::from_op(output, std::sync::Arc::new(grad_fn)))
            } else {
                Ok(Var::new(output, false))
            }
        }
    };
    ($(#[$meta:meta])* $fn_name:ident, $op_method:ident, $backward_ty:ident, with_client) => {
        $(#[$meta])*
        pub fn $fn_name(a: &Var, b: &Var, client: &CpuClient) -> Result<Var> {
            ensure_real(a.tensor().dtype(), stringify!($fn_name))?;
            let output = client.$op_method(a.tensor(), b.tensor())?;

            if a.requires_grad() || b.requires_grad() {
                let grad_fn = $backward_ty::new(
                    a.id(),
                    b.id(),
                    a.grad_fn().cloned(),
                    b.grad_fn().cloned(),
                    client,
                );
                Ok(Var::from_op(output, std::sync::Arc::new(grad_fn)))
            } else {
                Ok(Var::new(output, false))
            }
        }
    };
}

/// Binary operation whose backward saves both input tensors (mul, dot, matvec)
macro_rules! impl_var_binary_op_tensors {
    ($(#[$meta:meta])* $fn_name:ident, $forward:expr, $backward_ty:ident) => {
        $(#[$meta])*
        pub fn $fn_name(a: &Var, b: &Var, client: &CpuClient) -> Result<Var> {
            ensure_real(a.tensor().dtype(), stringify!($fn_name))?;
            let output = ($forward)(client, a.tensor(), b.tensor())?;

            if a.requires_grad() || b.requires_grad() {
                let grad_fn = $backward_ty::new(
                    a.id(),
                    b.id(),
                    a.tensor().clone(),
                    b.tensor().clone(),
                    a.grad_fn().cloned(),
                    b.grad_fn().cloned(),
                    client,
                );
                Ok(Var::from_op(output, std::sync::Arc::new(grad_fn)))
            } else {
                Ok(Var::new(output, false))
            }
        }
    };
}

pub(crate) use impl_var_binary_op_ids;
pub(crate) use impl_var_binary_op_tensors;
