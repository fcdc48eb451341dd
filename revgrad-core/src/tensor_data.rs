// src/tensor_data.rs
use crate::array::{Array, Element};
use crate::autograd::graph::GradFn;
use std::fmt::Debug;
use std::sync::Arc;

/// Internal storage and autograd metadata for a Tensor.
///
/// It is wrapped in `Arc<RwLock<TensorData>>` by the `Tensor` struct to allow
/// shared ownership and interior mutability of the gradient buffer.
#[derive(Debug)]
pub struct TensorData<T: Element> {
    /// The numeric data. Never mutated after creation; `detach` shares it.
    pub(crate) data: Array<T>,

    /// Flag indicating if the tensor requires gradient computation.
    /// If true, operations involving this tensor will be tracked in the computation graph.
    pub(crate) requires_grad: bool,
    /// Accumulated gradient, same shape as `data`. Absent until the first
    /// accumulation.
    pub(crate) grad: Option<Array<T>>,
    /// The record of the operation that produced this tensor.
    /// Leaf tensors (created directly by the user) have `grad_fn = None`.
    /// Set once at creation and never replaced.
    pub(crate) grad_fn: Option<Arc<GradFn<T>>>,
}

impl<T: Element> TensorData<T> {
    /// Creates leaf data that does not require grad.
    pub fn new(data: Array<T>) -> Self {
        TensorData {
            data,
            requires_grad: false,
            grad: None,
            grad_fn: None,
        }
    }

    /// Creates the data of a tracked op output.
    pub(crate) fn new_non_leaf(data: Array<T>, grad_fn: Arc<GradFn<T>>) -> Self {
        TensorData {
            data,
            requires_grad: true,
            grad: None,
            grad_fn: Some(grad_fn),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn numel(&self) -> usize {
        self.data.numel()
    }

    pub fn is_leaf(&self) -> bool {
        self.grad_fn.is_none()
    }
}
