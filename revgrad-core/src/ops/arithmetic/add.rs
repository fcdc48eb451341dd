use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

// --- Backward Operation Structure ---

/// Backward context for addition: only the input shapes are needed.
#[derive(Debug)]
struct AddBackward {
    a_shape: Vec<usize>,
    b_shape: Vec<usize>,
}

// --- Backward Operation Implementation ---

impl<T: Element> BackwardOp<T> for AddBackward {
    fn name(&self) -> &'static str {
        "AddBackward"
    }

    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let grad_a = grad_output.reduce_to_shape(&self.a_shape)?;
        let grad_b = grad_output.reduce_to_shape(&self.b_shape)?;
        Ok(vec![grad_a, grad_b])
    }
}

// --- Forward Operation ---

/// Element-wise `a + b` with broadcasting.
///
/// # Errors
/// `BroadcastError` if the shapes are not broadcast-compatible.
pub fn add_op<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let a_data = a.array();
    let b_data = b.array();
    let output = a_data.add(&b_data)?;
    Ok(record_op(output, &[a, b], || {
        Box::new(AddBackward {
            a_shape: a_data.shape().to_vec(),
            b_shape: b_data.shape().to_vec(),
        })
    }))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
