use crate::array::Element;
use crate::error::RevgradError;
use crate::ops::arithmetic::{add_op, div_op, mul_op, neg_op, pow_op, sub_op};
use crate::ops::linalg::matmul_op;
use crate::tensor::Tensor;

/// Method forms of the differentiable operations. Each one delegates to the
/// matching `xxx_op` function and records the graph the same way.
impl<T: Element> Tensor<T> {
    pub fn add(&self, other: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
        add_op(self, other)
    }

    pub fn sub(&self, other: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
        sub_op(self, other)
    }

    pub fn mul(&self, other: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
        mul_op(self, other)
    }

    pub fn div(&self, other: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
        div_op(self, other)
    }

    pub fn neg(&self) -> Result<Tensor<T>, RevgradError> {
        neg_op(self)
    }

    /// Element-wise power with a constant exponent.
    pub fn pow(&self, exponent: T) -> Result<Tensor<T>, RevgradError> {
        pow_op(self, exponent)
    }

    /// 2-D matrix product.
    pub fn matmul(&self, other: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
        matmul_op(self, other)
    }
}
