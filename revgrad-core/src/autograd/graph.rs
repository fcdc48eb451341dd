//! Backward graph records.
//!
//! A [`GradFn`] is allocated by the graph builder for every tracked forward
//! call. It owns the boxed [`BackwardOp`] (the saved forward context) and a
//! fixed list of [`InputEdge`]s, one per forward input, pointing at whatever
//! produced that input. Records are shared through `Arc`: several downstream
//! records may point at the same producer, but none of them owns it
//! exclusively, and a record can only point at records created before it, so
//! the graph is acyclic by construction.

use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

/// Where the gradient for one forward input goes.
pub enum Edge<T: Element> {
    /// The input did not require grad: nothing flows down this branch.
    None,
    /// Accumulate-grad terminal bound to a leaf tensor. Holds a weak handle so
    /// the graph never keeps a leaf alive; a dropped leaf simply discards its share.
    Leaf(Weak<RwLock<TensorData<T>>>),
    /// The input was produced by another tracked op.
    Node(Arc<GradFn<T>>),
}

impl<T: Element> Clone for Edge<T> {
    fn clone(&self) -> Self {
        match self {
            Edge::None => Edge::None,
            Edge::Leaf(leaf) => Edge::Leaf(Weak::clone(leaf)),
            Edge::Node(node) => Edge::Node(Arc::clone(node)),
        }
    }
}

impl<T: Element> fmt::Debug for Edge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::None => write!(f, "None"),
            Edge::Leaf(_) => write!(f, "AccumulateGrad"),
            Edge::Node(node) => write!(f, "{}", node.name()),
        }
    }
}

/// An [`Edge`] together with the shape of the forward input it stands for.
/// The engine checks every routed gradient against this shape.
#[derive(Debug, Clone)]
pub struct InputEdge<T: Element> {
    pub(crate) target: Edge<T>,
    pub(crate) shape: Vec<usize>,
}

impl<T: Element> InputEdge<T> {
    /// Builds the edge for one forward input:
    /// untracked → `None`, tracked leaf → `Leaf`, otherwise its creator.
    pub(crate) fn for_input(input: &Tensor<T>) -> Self {
        let guard = input.read_data();
        let target = if !guard.requires_grad {
            Edge::None
        } else {
            match guard.grad_fn.as_ref() {
                Some(grad_fn) => Edge::Node(Arc::clone(grad_fn)),
                None => Edge::Leaf(Arc::downgrade(&input.data)),
            }
        };
        InputEdge {
            target,
            shape: guard.data.shape().to_vec(),
        }
    }

    pub fn target(&self) -> &Edge<T> {
        &self.target
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
}

type BoxedBackwardOp<T> = Box<dyn BackwardOp<T> + Send + Sync>;

/// One executed primitive op in the backward graph.
pub struct GradFn<T: Element> {
    name: &'static str,
    /// `None` once the saved state has been released after a backward pass.
    op: Mutex<Option<BoxedBackwardOp<T>>>,
    edges: Vec<InputEdge<T>>,
    /// Set by `Tensor::retain_grad` on this record's output tensor.
    retained_output: Mutex<Option<Weak<RwLock<TensorData<T>>>>>,
}

fn lock<U>(mutex: &Mutex<U>) -> MutexGuard<'_, U> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Element> GradFn<T> {
    pub(crate) fn new(op: BoxedBackwardOp<T>, edges: Vec<InputEdge<T>>) -> Self {
        GradFn {
            name: op.name(),
            op: Mutex::new(Some(op)),
            edges,
            retained_output: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn edges(&self) -> &[InputEdge<T>] {
        &self.edges
    }

    /// `true` once a backward pass without `retain_graph` has run through this record.
    pub fn is_released(&self) -> bool {
        lock(&self.op).is_none()
    }

    /// Runs the op's backward rule and checks it honoured the one-gradient-per-input contract.
    pub(crate) fn apply(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let guard = lock(&self.op);
        let op = guard.as_ref().ok_or_else(|| RevgradError::GraphReleased {
            operation: self.name.to_string(),
        })?;
        let grads = op.backward(grad_output)?;
        if grads.len() != self.edges.len() {
            return Err(RevgradError::GradientCountMismatch {
                operation: self.name.to_string(),
                expected: self.edges.len(),
                actual: grads.len(),
            });
        }
        Ok(grads)
    }

    /// Drops the saved forward context.
    pub(crate) fn release(&self) {
        lock(&self.op).take();
    }

    pub(crate) fn set_retained_output(&self, output: Weak<RwLock<TensorData<T>>>) {
        *lock(&self.retained_output) = Some(output);
    }

    pub(crate) fn retained_output(&self) -> Option<Weak<RwLock<TensorData<T>>>> {
        lock(&self.retained_output).clone()
    }
}

impl<T: Element> fmt::Debug for GradFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradFn")
            .field("name", &self.name)
            .field("edges", &self.edges)
            .field("released", &self.is_released())
            .finish()
    }
}
