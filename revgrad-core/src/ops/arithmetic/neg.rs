use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

#[derive(Debug)]
struct NegBackward;

impl<T: Element> BackwardOp<T> for NegBackward {
    fn name(&self) -> &'static str {
        "NegBackward"
    }

    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        Ok(vec![grad_output.neg()])
    }
}

/// Element-wise negation.
pub fn neg_op<T: Element>(a: &Tensor<T>) -> Result<Tensor<T>, RevgradError> {
    let output = a.array().neg();
    Ok(record_op(output, &[a], || Box::new(NegBackward)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

    #[test]
    fn test_neg_forward() {
        let t = create_test_tensor(vec![1.0, -2.0, 0.0], vec![3]);
        let result = neg_op(&t).unwrap();
        check_tensor_near(&result, &[3], &[-1.0, 2.0, 0.0], 1e-12);
    }

    #[test]
    fn test_neg_backward() -> Result<(), RevgradError> {
        let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
        let output = neg_op(&a)?;
        output.backward(Some(create_test_tensor(vec![1.0, 3.0], vec![2])))?;
        check_tensor_near(&a.grad().unwrap(), &[2], &[-1.0, -3.0], 1e-12);
        Ok(())
    }
}
