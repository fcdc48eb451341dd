//! # Tensor Operations Module (`ops`)
//!
//! Every differentiable primitive lives here as a pair:
//!
//! - an **`xxx_op` function** that computes the forward result on the
//!   underlying [`Array`]s and hands it to [`record_op`];
//! - a **`XxxBackward` struct** implementing [`BackwardOp`] that stores the
//!   forward context the vector-Jacobian product needs.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: Element-wise arithmetic with broadcasting (add, sub, mul, div, neg, pow).
//! - [`linalg`]: Matrix multiplication.
//! - [`reduction`]: Sum and mean over all or selected axes.

use crate::array::{Array, Element};
use crate::autograd::graph::{GradFn, InputEdge};
use crate::autograd::{is_grad_enabled, BackwardOp};
use crate::tensor::Tensor;
use std::sync::Arc;

pub mod arithmetic;
pub mod linalg;
pub mod reduction;

/// Wraps a forward result, recording it in the graph when appropriate.
///
/// The output is tracked if grad mode is enabled on this thread and at least
/// one input requires grad. `make_backward` is only called in that case, so
/// untracked calls save nothing.
pub(crate) fn record_op<T, B>(output: Array<T>, inputs: &[&Tensor<T>], make_backward: B) -> Tensor<T>
where
    T: Element,
    B: FnOnce() -> Box<dyn BackwardOp<T> + Send + Sync>,
{
    if !is_grad_enabled() || !inputs.iter().any(|t| t.requires_grad()) {
        return Tensor::from_array(output);
    }
    let edges = inputs.iter().map(|t| InputEdge::for_input(t)).collect();
    let grad_fn = Arc::new(GradFn::new(make_backward(), edges));
    log::trace!("recorded {} with {} inputs", grad_fn.name(), inputs.len());
    Tensor::from_grad_fn(output, grad_fn)
}
