//! Structured control flow for iterative algorithms
//!
//! Solvers are written as a pure transition `body: S -> S` guarded by a
//! predicate `cond: &S -> bool` and handed to one of two drivers:
//!
//! - [`while_loop`] evaluates the pair eagerly, once.
//! - [`CompiledLoop`] captures the pair into a single reusable unit that can be
//!   run many times, including over a batch of independent initial states.
//!
//! Both drivers apply `body` until `cond` is false, or not at all if `cond`
//! is false for the initial state, so the two produce identical results for
//! the same inputs.

use crate::error::Result;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// How an algorithm drives its loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Evaluate the loop directly with [`while_loop`]
    #[default]
    Eager,
    /// Build a [`CompiledLoop`] once and run it
    Compiled,
}

/// Apply `body` to `init` while `cond` holds
///
/// An error from `body` stops the loop and is returned unchanged.
///
/// # Example
///
/// ```
/// use matfree::algorithm::control::while_loop;
///
/// let n = while_loop(|&n: &u32| n < 10, |n| Ok(n * 3), 1)?;
/// assert_eq!(n, 27);
/// # Ok::<(), matfree::error::Error>(())
/// ```
pub fn while_loop<S, C, B>(mut cond: C, mut body: B, init: S) -> Result<S>
where
    C: FnMut(&S) -> bool,
    B: FnMut(S) -> Result<S>,
{
    let mut state = init;
    while cond(&state) {
        state = body(state)?;
    }
    Ok(state)
}

type CondFn<'a, S> = Box<dyn Fn(&S) -> bool + Send + Sync + 'a>;
type BodyFn<'a, S> = Box<dyn Fn(S) -> Result<S> + Send + Sync + 'a>;

/// A loop captured once as a single executable unit
///
/// The captured closures must be `Fn + Send + Sync`: a compiled loop carries no
/// mutable state of its own, which is what allows [`CompiledLoop::run_batch`]
/// to drive independent states concurrently.
pub struct CompiledLoop<'a, S> {
    cond: CondFn<'a, S>,
    body: BodyFn<'a, S>,
}

impl<'a, S> CompiledLoop<'a, S> {
    /// Capture a loop condition and body
    pub fn new<C, B>(cond: C, body: B) -> Self
    where
        C: Fn(&S) -> bool + Send + Sync + 'a,
        B: Fn(S) -> Result<S> + Send + Sync + 'a,
    {
        Self {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    /// Run the loop from one initial state
    pub fn run(&self, init: S) -> Result<S> {
        let mut state = init;
        while (self.cond)(&state) {
            state = (self.body)(state)?;
        }
        Ok(state)
    }

    /// Run the loop from each initial state independently
    ///
    /// Results are returned in input order. With the `rayon` feature the
    /// states are processed in parallel; the first error encountered is
    /// returned.
    pub fn run_batch(&self, inits: Vec<S>) -> Result<Vec<S>>
    where
        S: Send,
    {
        #[cfg(feature = "rayon")]
        {
            inits.into_par_iter().map(|s| self.run(s)).collect()
        }

        #[cfg(not(feature = "rayon"))]
        {
            inits.into_iter().map(|s| self.run(s)).collect()
        }
    }
}
