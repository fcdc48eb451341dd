use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for 2-D matrix multiplication.
#[derive(Debug)]
struct MatmulBackward<T: Element> {
    a: Array<T>,
    b: Array<T>,
}

impl<T: Element> BackwardOp<T> for MatmulBackward<T> {
    fn name(&self) -> &'static str {
        "MatmulBackward"
    }

    /// For `C = A @ B`: `grad_A = grad_C @ B^T` and `grad_B = A^T @ grad_C`.
    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let grad_a = grad_output.matmul(&self.b.transpose()?)?;
        let grad_b = self.a.transpose()?.matmul(grad_output)?;
        Ok(vec![grad_a, grad_b])
    }
}

/// Matrix product of two 2-D tensors: `[m, k] @ [k, n] -> [m, n]`.
///
/// # Errors
/// `IncompatibleShapes` if either input is not 2-D or the inner dimensions differ.
pub fn matmul_op<T: Element>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let a_data = a.array();
    let b_data = b.array();
    let output = a_data.matmul(&b_data)?;
    Ok(record_op(output, &[a, b], || {
        Box::new(MatmulBackward { a: a_data, b: b_data })
    }))
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
