//! The backward engine.
//!
//! A pass runs in three phases over a task-local arena:
//!
//! 1. **Discovery**: an iterative DFS from the output's record assigns every
//!    reachable [`GradFn`] a stable index and counts its incoming edges. One
//!    consumer using a value twice counts twice.
//! 2. **Execution**: a FIFO ready queue runs a record once every consumer has
//!    delivered its share, so each record sees the full fan-in sum exactly once.
//! 3. **Commit**: gradients bound for leaves (and retained non-leaves) are
//!    staged during execution and only written into the tensors once every
//!    record succeeded. A failing pass leaves all gradient buffers untouched.
//!
//! Unless `retain_graph` is set, the saved state of every executed record is
//! released afterwards.

use crate::array::{Array, Element};
use crate::autograd::graph::{Edge, GradFn};
use crate::error::RevgradError;
use crate::tensor::autograd_methods::accumulate_into;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, Weak};

/// Options for a backward pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackwardOptions {
    /// Keep the saved forward state so the same graph can be traversed again.
    pub retain_graph: bool,
}

/// Computes gradients of `output` with respect to every tracked leaf reachable from it.
///
/// Free-function form of [`Tensor::backward_with_options`].
pub fn backward<T: Element>(
    output: &Tensor<T>,
    seed: Option<Tensor<T>>,
    retain_graph: bool,
) -> Result<(), RevgradError> {
    run_backward(output, seed.map(|s| s.array()), BackwardOptions { retain_graph })
}

type NodeHandle<T> = Weak<RwLock<TensorData<T>>>;

/// Edge target re-expressed against the arena.
enum Target<T: Element> {
    Skip,
    Leaf(NodeHandle<T>),
    Node(usize),
}

struct TaskEdge<T: Element> {
    target: Target<T>,
    shape: Vec<usize>,
}

/// Gradients waiting for the commit phase, keyed by tensor node identity.
struct StagedGrads<T: Element> {
    entries: Vec<(NodeHandle<T>, Array<T>)>,
    index: HashMap<*const RwLock<TensorData<T>>, usize>,
}

impl<T: Element> StagedGrads<T> {
    fn new() -> Self {
        StagedGrads {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn stage(&mut self, node: &NodeHandle<T>, grad: Array<T>) -> Result<(), RevgradError> {
        let key = Weak::as_ptr(node);
        match self.index.get(&key) {
            Some(&i) => {
                let summed = self.entries[i].1.add(&grad)?;
                self.entries[i].1 = summed;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((Weak::clone(node), grad));
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn commit(self) -> Result<(), RevgradError> {
        for (node, grad) in self.entries {
            // A leaf dropped by its owner simply discards its share.
            if let Some(node) = node.upgrade() {
                accumulate_into(&node, &grad)?;
            }
        }
        Ok(())
    }
}

/// One backward pass: the arena of records reachable from the output.
struct GraphTask<T: Element> {
    nodes: Vec<Arc<GradFn<T>>>,
    edges: Vec<Vec<TaskEdge<T>>>,
    /// Number of incoming edges per node.
    dependencies: Vec<usize>,
}

impl<T: Element> GraphTask<T> {
    /// Walks the graph from `root` (which gets index 0).
    fn discover(root: Arc<GradFn<T>>) -> Result<Self, RevgradError> {
        let mut index: HashMap<*const GradFn<T>, usize> = HashMap::new();
        let mut nodes: Vec<Arc<GradFn<T>>> = Vec::new();
        let mut dependencies: Vec<usize> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        index.insert(Arc::as_ptr(&root), 0);
        nodes.push(root);
        dependencies.push(0);
        stack.push(0);

        let mut edges: Vec<Vec<TaskEdge<T>>> = vec![Vec::new()];

        while let Some(current) = stack.pop() {
            let node = Arc::clone(&nodes[current]);
            if node.is_released() {
                return Err(RevgradError::GraphReleased {
                    operation: node.name().to_string(),
                });
            }
            let mut task_edges = Vec::with_capacity(node.edges().len());
            for input in node.edges() {
                let target = match input.target() {
                    Edge::None => Target::Skip,
                    Edge::Leaf(leaf) => Target::Leaf(Weak::clone(leaf)),
                    Edge::Node(child) => {
                        let key = Arc::as_ptr(child);
                        let child_idx = match index.get(&key) {
                            Some(&i) => i,
                            None => {
                                let i = nodes.len();
                                index.insert(key, i);
                                nodes.push(Arc::clone(child));
                                dependencies.push(0);
                                edges.push(Vec::new());
                                stack.push(i);
                                i
                            }
                        };
                        dependencies[child_idx] += 1;
                        Target::Node(child_idx)
                    }
                };
                task_edges.push(TaskEdge {
                    target,
                    shape: input.shape().to_vec(),
                });
            }
            edges[current] = task_edges;
        }

        log::debug!("backward: discovered {} graph records", nodes.len());
        Ok(GraphTask {
            nodes,
            edges,
            dependencies,
        })
    }

    /// Runs every record once, returning the gradients to commit.
    fn execute(&self, seed: Array<T>) -> Result<StagedGrads<T>, RevgradError> {
        let n = self.nodes.len();
        let mut pending: Vec<Option<Array<T>>> = vec![None; n];
        let mut remaining = self.dependencies.clone();
        let mut ready: VecDeque<usize> = VecDeque::new();
        let mut staged = StagedGrads::new();
        let mut executed = 0usize;

        if remaining[0] != 0 {
            return Err(RevgradError::InternalError(
                "backward root has incoming edges".to_string(),
            ));
        }
        pending[0] = Some(seed);
        ready.push_back(0);

        while let Some(idx) = ready.pop_front() {
            let node = &self.nodes[idx];
            let grad_output = pending[idx].take().ok_or_else(|| {
                RevgradError::InternalError(format!(
                    "{} became ready without an incoming gradient",
                    node.name()
                ))
            })?;
            log::trace!("backward: running {} (node {})", node.name(), idx);

            if let Some(output) = node.retained_output() {
                staged.stage(&output, grad_output.clone())?;
            }

            let grads = node.apply(&grad_output)?;
            for (edge, grad) in self.edges[idx].iter().zip(grads) {
                if let Target::Skip = edge.target {
                    continue;
                }
                if grad.shape() != edge.shape.as_slice() {
                    return Err(RevgradError::ShapeMismatch {
                        expected: edge.shape.clone(),
                        actual: grad.shape().to_vec(),
                        operation: format!("{} backward", node.name()),
                    });
                }
                match &edge.target {
                    Target::Skip => {}
                    Target::Leaf(leaf) => staged.stage(leaf, grad)?,
                    Target::Node(child) => {
                        let child = *child;
                        let summed = match pending[child].take() {
                            Some(acc) => acc.add(&grad)?,
                            None => grad,
                        };
                        pending[child] = Some(summed);
                        remaining[child] -= 1;
                        if remaining[child] == 0 {
                            ready.push_back(child);
                        }
                    }
                }
            }
            executed += 1;
        }

        if executed != n {
            return Err(RevgradError::InternalError(format!(
                "backward executed {} of {} graph records",
                executed, n
            )));
        }
        Ok(staged)
    }

    fn release(&self) {
        for node in &self.nodes {
            node.release();
        }
    }
}

/// Resolves the seed against the output shape. Defaults to ones for single-element outputs.
fn resolve_seed<T: Element>(seed: Option<Array<T>>, shape: &[usize]) -> Result<Array<T>, RevgradError> {
    match seed {
        Some(seed) => {
            if seed.shape() != shape {
                return Err(RevgradError::ShapeMismatch {
                    expected: shape.to_vec(),
                    actual: seed.shape().to_vec(),
                    operation: "backward seed".to_string(),
                });
            }
            Ok(seed)
        }
        None => {
            let numel: usize = shape.iter().product();
            if numel != 1 {
                return Err(RevgradError::BackwardNonScalar {
                    shape: shape.to_vec(),
                });
            }
            Ok(Array::ones(shape))
        }
    }
}

pub(crate) fn run_backward<T: Element>(
    output: &Tensor<T>,
    seed: Option<Array<T>>,
    options: BackwardOptions,
) -> Result<(), RevgradError> {
    let (root, requires_grad, shape) = {
        let guard = output.read_data();
        (guard.grad_fn.clone(), guard.requires_grad, guard.shape().to_vec())
    };

    if root.is_none() && !requires_grad {
        return Err(RevgradError::NoGraph);
    }
    let seed = resolve_seed(seed, &shape)?;

    let root = match root {
        Some(root) => root,
        None => {
            log::debug!("backward: output is a tracked leaf, accumulating seed directly");
            return accumulate_into(&output.data, &seed);
        }
    };

    let task = GraphTask::discover(root)?;
    let staged = task.execute(seed)?;
    log::debug!(
        "backward: executed {} records, committing {} gradients",
        task.nodes.len(),
        staged.len()
    );
    staged.commit()?;

    if !options.retain_graph {
        task.release();
        log::debug!("backward: released {} graph records", task.nodes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::BackwardOp;
    use crate::ops::arithmetic::{add_op, mul_op};
    use crate::ops::record_op;
    use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

    /// Returns a gradient of the wrong shape for its single input.
    #[derive(Debug)]
    struct BadShapeBackward;

    impl BackwardOp<f64> for BadShapeBackward {
        fn name(&self) -> &'static str {
            "BadShapeBackward"
        }

        fn backward(&self, _grad_output: &Array<f64>) -> Result<Vec<Array<f64>>, RevgradError> {
            Ok(vec![Array::zeros(&[5])])
        }
    }

    #[test]
    fn test_dependency_counts_every_edge() {
        let x = create_test_tensor_with_grad(vec![2.0], vec![1]);
        let h = add_op(&x, &x).unwrap();
        let y = mul_op(&h, &h).unwrap();
        let task = GraphTask::discover(y.grad_fn().unwrap()).unwrap();
        assert_eq!(task.nodes.len(), 2);
        assert_eq!(task.dependencies, vec![0, 2]);
    }

    #[test]
    fn test_fan_in_sums_before_running_producer() -> Result<(), RevgradError> {
        // y = h * h with h = x + x: dy/dx = 2h * 2 = 16 at x = 2
        let x = create_test_tensor_with_grad(vec![2.0], vec![1]);
        let h = add_op(&x, &x)?;
        let y = mul_op(&h, &h)?;
        y.backward(None)?;
        check_tensor_near(&x.grad().unwrap(), &[1], &[16.0], 1e-12);
        Ok(())
    }

    #[test]
    fn test_bad_backward_shape_leaves_grads_untouched() {
        let x = create_test_tensor_with_grad(vec![1.0, 2.0, 3.0], vec![3]);
        let w = create_test_tensor_with_grad(vec![1.0, 1.0, 1.0], vec![3]);
        let bad = record_op(x.array(), &[&x], || Box::new(BadShapeBackward));
        let out = mul_op(&bad, &w).unwrap();

        let err = out
            .backward(Some(create_test_tensor(vec![1.0, 1.0, 1.0], vec![3])))
            .unwrap_err();
        assert_eq!(
            err,
            RevgradError::ShapeMismatch {
                expected: vec![3],
                actual: vec![5],
                operation: "BadShapeBackward backward".to_string(),
            }
        );
        assert!(x.grad().is_none());
        // w's share was already computed, but nothing is committed on failure.
        assert!(w.grad().is_none());
        // A failed pass does not release the graph.
        assert!(!out.grad_fn().unwrap().is_released());
    }

    #[test]
    fn test_released_record_detected_before_any_write() {
        let x = create_test_tensor_with_grad(vec![1.0], vec![1]);
        let h = mul_op(&x, &x).unwrap();
        let y = add_op(&h, &x).unwrap();
        h.grad_fn().unwrap().release();

        let err = y.backward(None).unwrap_err();
        assert_eq!(
            err,
            RevgradError::GraphReleased {
                operation: "MulBackward".to_string()
            }
        );
        assert!(x.grad().is_none());
    }

    #[test]
    fn test_dropped_leaf_discards_its_share() -> Result<(), RevgradError> {
        let x = create_test_tensor_with_grad(vec![3.0], vec![1]);
        let y = {
            let tmp = create_test_tensor_with_grad(vec![4.0], vec![1]);
            mul_op(&x, &tmp)?
        };
        y.backward(None)?;
        check_tensor_near(&x.grad().unwrap(), &[1], &[4.0], 1e-12);
        Ok(())
    }

    #[test]
    fn test_tracked_leaf_output_receives_seed() -> Result<(), RevgradError> {
        let x = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
        backward(&x, Some(create_test_tensor(vec![0.5, 0.25], vec![2])), false)?;
        check_tensor_near(&x.grad().unwrap(), &[2], &[0.5, 0.25], 1e-12);
        Ok(())
    }

    #[test]
    fn test_untracked_output_has_no_graph() {
        let c = create_test_tensor(vec![1.0], vec![1]);
        assert_eq!(c.backward(None), Err(RevgradError::NoGraph));
    }
}
