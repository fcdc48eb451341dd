use crate::array::{Array, Element};
use crate::error::RevgradError;
use std::fmt::Debug;

/// Defines the interface for the backward pass of a differentiable tensor operation.
///
/// Every primitive op that can produce a non-leaf `Tensor` has an associated
/// `BackwardOp` implementation holding exactly the forward-time context its
/// vector-Jacobian product needs (input arrays, input shapes, exponents...).
/// The op is boxed inside the [`GradFn`](super::graph::GradFn) record stored
/// as the output tensor's `grad_fn`.
///
/// The trait requires `Debug + Send + Sync` because records are shared through
/// `Arc` and a leaf may be reached from backward passes running on several threads.
pub trait BackwardOp<T: Element>: Debug + Send + Sync {
    /// Short name used in logs and error messages (e.g. `"MulBackward"`).
    fn name(&self) -> &'static str;

    /// Computes the gradients of the operation's inputs given the gradient of its output.
    ///
    /// For \\( \text{Output} = f(\text{Input}_1, ..., \text{Input}_n) \\) this returns
    /// \\( \frac{dL}{d\text{Input}_i} = \frac{dL}{d\text{Output}} \cdot \frac{d\text{Output}}{d\text{Input}_i} \\)
    /// for every input.
    ///
    /// # Returns
    /// * `Ok(Vec<Array>)`: one gradient per forward input, in forward input order.
    ///   Each gradient must already have its input's shape; broadcasting ops
    ///   reduce with [`Array::reduce_to_shape`] before returning.
    /// * `Err(RevgradError)`: if the gradient cannot be computed (shape problems).
    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError>;
}
