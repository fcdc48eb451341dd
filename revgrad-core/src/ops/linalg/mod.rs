//! Linear algebra operations.

pub mod matmul;

pub use matmul::matmul_op;
