// src/tensor/mod.rs

use crate::array::{Array, Element};
use crate::autograd::graph::GradFn;
use crate::error::RevgradError;
use crate::tensor_data::TensorData;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod accessors;
mod arithmetic_methods;
mod reduction_methods;
pub(crate) mod autograd_methods;
pub mod create;
mod traits;

pub use create::{create_leaf, full, ones, ones_like, rand, randn, randn_with_rng, zeros, zeros_like};

/// A value node in the computation graph.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** Clones are cheap and point at the same node, so a
///     tensor used by several operations is one node with several consumers.
/// 2.  **Interior Mutability:** The gradient buffer can be accumulated into
///     through a shared reference. The write lock makes concurrent
///     accumulations into the same leaf mutually exclusive.
///
/// A tensor is either a *leaf* (created by the user, no `grad_fn`) or the
/// output of a tracked operation, in which case its `grad_fn` is fixed for
/// its whole lifetime.
pub struct Tensor<T: Element> {
    pub(crate) data: Arc<RwLock<TensorData<T>>>,
}

impl<T: Element> Tensor<T> {
    /// Creates a new leaf tensor from row-major data. `requires_grad` is false.
    pub fn new(data_vec: Vec<T>, shape: Vec<usize>) -> Result<Self, RevgradError> {
        Ok(Self::from_array(Array::new(data_vec, shape)?))
    }

    /// Creates a 0-dimensional leaf tensor.
    pub fn scalar(value: T) -> Self {
        Self::from_array(Array::scalar(value))
    }

    /// Wraps an existing array as a leaf tensor that does not require grad.
    pub fn from_array(array: Array<T>) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData::new(array))),
        }
    }

    /// Wraps the output of a tracked operation.
    pub(crate) fn from_grad_fn(array: Array<T>, grad_fn: Arc<GradFn<T>>) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(TensorData::new_non_leaf(array, grad_fn))),
        }
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// A poisoned lock is recovered: the protected data is plain values that
    /// remain consistent even if a holder panicked.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData<T>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData<T>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles refer to the same graph node.
    pub fn same_node(&self, other: &Tensor<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
