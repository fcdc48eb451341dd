use crate::array::reduction::process_reduction_axes;
use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for `sum_op`.
#[derive(Debug)]
struct SumBackward {
    input_shape: Vec<usize>,
    /// Validated, sorted axes that were reduced.
    axes: Vec<usize>,
}

impl<T: Element> BackwardOp<T> for SumBackward {
    fn name(&self) -> &'static str {
        "SumBackward"
    }

    /// Every input element contributed once, so the upstream gradient is
    /// broadcast back over the reduced axes unchanged.
    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let grad = grad_output
            .restore_reduced_dims(&self.input_shape, &self.axes)?
            .expand_to(&self.input_shape)?;
        Ok(vec![grad])
    }
}

/// Sums `x` along `axes` (all axes when `None` or empty).
///
/// # Errors
/// `InvalidAxis` if an axis is out of range for the rank of `x`.
pub fn sum_op<T: Element>(
    x: &Tensor<T>,
    axes: Option<&[usize]>,
    keep_dims: bool,
) -> Result<Tensor<T>, RevgradError> {
    let input = x.array();
    let axes = process_reduction_axes(input.rank(), axes)?;
    let output = input.sum_axes(Some(axes.as_slice()), keep_dims)?;
    Ok(record_op(output, &[x], || {
        Box::new(SumBackward {
            input_shape: input.shape().to_vec(),
            axes,
        })
    }))
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
