use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for division.
#[derive(Debug)]
struct DivBackward<T: Element> {
    a: Array<T>,
    b: Array<T>,
}

impl<T: Element> BackwardOp<T> for DivBackward<T> {
    fn name(&self) -> &'static str {
        "DivBackward"
    }

    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        // grad_a = grad_output / b
        let grad_a = grad_output.div(&self.b)?.reduce_to_shape(self.a.shape())?;
        // grad_b = -grad_output * a / b^2
        let b_squared = self.b.mul(&self.b)?;
        let grad_b = grad_output
            .mul(&self.a)?
            .div(&b_squared)?
            .neg()
            .reduce_to_shape(self.b.shape())?;
        Ok(vec![grad_a, grad_b])
    }
}

/// Element-wise `a / b` with broadcasting. Division by zero follows IEEE-754.
pub fn div_op<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let a_data = a.array();
    let b_data = b.array();
    let output = a_data.div(&b_data)?;
    Ok(record_op(output, &[a, b], || {
        Box::new(DivBackward { a: a_data, b: b_data })
    }))
}

#[cfg(test)]
#[path = "div_test.rs"]
mod tests;
