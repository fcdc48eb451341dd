use crate::array::{Array, Element};
use crate::autograd::graph::GradFn;
use crate::autograd::{run_backward, BackwardOptions};
use crate::error::RevgradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::sync::{Arc, RwLock};

impl<T: Element> Tensor<T> {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` status of this tensor **in-place**.
    /// Only allowed on leaf tensors.
    pub fn requires_grad_(&self, requires_grad: bool) -> Result<(), RevgradError> {
        let mut guard = self.write_data();
        if guard.grad_fn.is_some() {
            return Err(RevgradError::RequiresGradOnNonLeaf);
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// A leaf has no `grad_fn`: it was created by the user, not by a tracked op.
    pub fn is_leaf(&self) -> bool {
        self.read_data().is_leaf()
    }

    /// Returns the record of the operation that produced this tensor, if tracked.
    pub fn grad_fn(&self) -> Option<Arc<GradFn<T>>> {
        self.read_data().grad_fn.clone()
    }

    /// Returns the accumulated gradient as a (detached) tensor, if any.
    pub fn grad(&self) -> Option<Tensor<T>> {
        self.read_data().grad.clone().map(Tensor::from_array)
    }

    /// Resets the gradient of this tensor to `None`.
    pub fn zero_grad(&self) {
        self.write_data().grad = None;
    }

    /// Accumulates `grad` into this tensor's gradient buffer.
    ///
    /// The shape must match exactly; broadcasting is resolved by the backward
    /// rule that produced the gradient, never here.
    pub fn accumulate_grad(&self, grad: &Tensor<T>) -> Result<(), RevgradError> {
        accumulate_into(&self.data, &grad.array())
    }

    /// Creates a new tensor that shares the same data but is detached
    /// from the computation graph.
    pub fn detach(&self) -> Tensor<T> {
        Tensor::from_array(self.array())
    }

    /// Keeps the gradient arriving at this non-leaf tensor during `backward`.
    /// No-op on leaves, which always keep their gradient.
    pub fn retain_grad(&self) {
        if let Some(grad_fn) = self.grad_fn() {
            grad_fn.set_retained_output(Arc::downgrade(&self.data));
        }
    }

    /// Computes the gradients of this tensor w.r.t. graph leaves, releasing the
    /// graph afterwards.
    ///
    /// # Arguments
    /// * `gradient`: Seed gradient (dL/dself). May be omitted only for
    ///   single-element tensors, where it defaults to one.
    ///
    /// # Errors
    /// * `BackwardNonScalar` if `gradient` is `None` and the tensor has more than one element.
    /// * `ShapeMismatch` if `gradient` does not have this tensor's shape.
    /// * `NoGraph` if the tensor neither requires grad nor has a `grad_fn`.
    /// * `GraphReleased` if an earlier backward already released part of the graph.
    pub fn backward(&self, gradient: Option<Tensor<T>>) -> Result<(), RevgradError> {
        self.backward_with_options(gradient, BackwardOptions::default())
    }

    /// Like [`backward`](Self::backward) with explicit options, e.g. `retain_graph`.
    pub fn backward_with_options(
        &self,
        gradient: Option<Tensor<T>>,
        options: BackwardOptions,
    ) -> Result<(), RevgradError> {
        run_backward(self, gradient.map(|g| g.array()), options)
    }
}

/// Adds `grad_to_add` into the gradient buffer behind `node`, creating it on first use.
pub(crate) fn accumulate_into<T: Element>(
    node: &RwLock<TensorData<T>>,
    grad_to_add: &Array<T>,
) -> Result<(), RevgradError> {
    let mut guard = node.write().unwrap_or_else(std::sync::PoisonError::into_inner);
    if grad_to_add.shape() != guard.shape() {
        return Err(RevgradError::ShapeMismatch {
            expected: guard.shape().to_vec(),
            actual: grad_to_add.shape().to_vec(),
            operation: "accumulate_grad".to_string(),
        });
    }
    let new_grad = match guard.grad.as_ref() {
        Some(existing) => existing.add(grad_to_add)?,
        None => grad_to_add.clone(),
    };
    guard.grad = Some(new_grad);
    Ok(())
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
