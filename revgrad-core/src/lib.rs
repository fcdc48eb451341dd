//! # revgrad-core
//!
//! A reverse-mode automatic differentiation engine.
//!
//! Tracked operations on [`Tensor`]s record a graph of [`GradFn`](autograd::graph::GradFn)
//! records as they execute. Calling [`Tensor::backward`] on a result walks that
//! graph in reverse, summing the gradient contributions of every path, and
//! accumulates the final gradients into the leaves that requested them.
//!
//! ```
//! use revgrad_core::{create_leaf, RevgradError};
//!
//! # fn main() -> Result<(), RevgradError> {
//! let x = create_leaf(vec![0.2f64], vec![1], true)?;
//! let y = x.pow(2.0)?;
//! y.backward(None)?;
//! assert!((x.grad().unwrap().item()? - 0.4).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod array;
pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod utils;

pub use array::{Array, Element};
pub use autograd::{backward, is_grad_enabled, no_grad, BackwardOptions, GradModeGuard, NoGradGuard};
pub use error::{ErrorKind, RevgradError};
pub use tensor::{create_leaf, full, ones, ones_like, rand, randn, zeros, zeros_like, Tensor};

// Re-export traits required by public functions/structs
pub use num_traits;
