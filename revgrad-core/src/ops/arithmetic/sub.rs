use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for subtraction.
#[derive(Debug)]
struct SubBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

impl<T: Element> BackwardOp<T> for SubBackward {
    fn name(&self) -> &'static str {
        "SubBackward"
    }

    /// grad_a = grad_output, grad_b = -grad_output, each reduced to its input shape.
    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.neg().reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }
}

/// Element-wise `a - b` with broadcasting.
pub fn sub_op<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let a_data = a.array();
    let b_data = b.array();
    let output = a_data.sub(&b_data)?;
    Ok(record_op(output, &[a, b], || {
        Box::new(SubBackward {
            a_shape: a_data.shape().to_vec(),
            b_shape: b_data.shape().to_vec(),
        })
    }))
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
