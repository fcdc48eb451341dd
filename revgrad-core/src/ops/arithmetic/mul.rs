use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

/// Backward context for multiplication. Keeps both forward operands.
#[derive(Debug)]
struct MulBackward<T: Element> {
    a: Array<T>,
    b: Array<T>,
}

// --- Backward Operation Implementation ---

impl<T: Element> BackwardOp<T> for MulBackward<T> {
    fn name(&self) -> &'static str {
        "MulBackward"
    }

    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        // grad_a = grad_output * b
        let grad_a = grad_output.mul(&self.b)?.reduce_to_shape(self.a.shape())?;
        // grad_b = grad_output * a
        let grad_b = grad_output.mul(&self.a)?.reduce_to_shape(self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Element-wise `a * b` with broadcasting.
///
/// The saved operands share their buffers with the inputs, so recording costs
/// no copy.
pub fn mul_op<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let a_data = a.array();
    let b_data = b.array();
    let output = a_data.mul(&b_data)?;
    Ok(record_op(output, &[a, b], || {
        Box::new(MulBackward { a: a_data, b: b_data })
    }))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
