use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for `x^n` with a constant exponent.
#[derive(Debug)]
struct PowBackward<T: Element> {
    base: Array<T>,
    exponent: T,
}

impl<T: Element> BackwardOp<T> for PowBackward<T> {
    fn name(&self) -> &'static str {
        "PowBackward"
    }

    /// grad = grad_output * n * x^(n-1). A zero exponent gives a zero gradient
    /// even at x = 0, where `0^-1` would otherwise produce `inf * 0 = NaN`.
    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        if self.exponent == T::zero() {
            return Ok(vec![Array::zeros(self.base.shape())]);
        }
        let local = self
            .base
            .powf(self.exponent - T::one())
            .scale(self.exponent);
        Ok(vec![grad_output.mul(&local)?])
    }
}

/// Raises every element of `x` to the constant power `exponent`.
pub fn pow_op<T: Element>(x: &Tensor<T>, exponent: T) -> Result<Tensor<T>, RevgradError> {
    let base = x.array();
    let output = base.powf(exponent);
    Ok(record_op(output, &[x], || {
        Box::new(PowBackward { base, exponent })
    }))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
