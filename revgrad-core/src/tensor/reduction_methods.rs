use crate::array::Element;
use crate::error::RevgradError;
use crate::ops::reduction::{mean_op, sum_op};
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Computes the sum of the tensor elements over given axes.
    /// Delegates to `ops::reduction::sum::sum_op`.
    pub fn sum(&self, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor<T>, RevgradError> {
        sum_op(self, axes, keep_dims)
    }

    /// Computes the mean of the tensor elements over given axes.
    /// Delegates to `ops::reduction::mean::mean_op`.
    pub fn mean(&self, axes: Option<&[usize]>, keep_dims: bool) -> Result<Tensor<T>, RevgradError> {
        mean_op(self, axes, keep_dims)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::testing::{check_tensor_near, create_test_tensor_with_grad};
    use crate::error::RevgradError;

    #[test]
    fn test_method_chain_matches_ops() -> Result<(), RevgradError> {
        // loss = mean((a * b - a)^2)
        let a = create_test_tensor_with_grad(vec![1.0, 2.0], vec![2]);
        let b = create_test_tensor_with_grad(vec![3.0, 0.5], vec![2]);
        let diff = a.mul(&b)?.sub(&a)?;
        let loss = diff.pow(2.0)?.mean(None, false)?;
        check_tensor_near(&loss, &[], &[(4.0 + 1.0) / 2.0], 1e-12);
        loss.backward(None)?;
        // dloss/dd = d, dd/da = b - 1, dd/db = a
        check_tensor_near(&a.grad().unwrap(), &[2], &[4.0, 0.5], 1e-12);
        check_tensor_near(&b.grad().unwrap(), &[2], &[2.0, -2.0], 1e-12);
        Ok(())
    }
}
