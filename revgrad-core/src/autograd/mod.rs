//! # Autograd
//!
//! Reverse-mode automatic differentiation over the graph that tracked
//! operations build as they execute.
//!
//! - [`BackwardOp`]: per-op vector-Jacobian product plus its saved forward context.
//! - [`graph`]: the [`GradFn`](graph::GradFn) records and their input edges.
//! - [`engine`]: the backward traversal (discovery, dependency counting, ready queue).
//! - [`grad_mode`]: the no-grad scope that suspends graph construction.
//! - [`grad_check`]: finite-difference verification of analytical gradients.

pub mod backward_op;
pub mod engine;
pub mod grad_check;
pub mod grad_mode;
pub mod graph;

pub use backward_op::BackwardOp;
pub use engine::{backward, BackwardOptions};
pub use grad_mode::{is_grad_enabled, no_grad, GradModeGuard, NoGradGuard};

pub(crate) use engine::run_backward;
