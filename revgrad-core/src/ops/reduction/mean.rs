use crate::array::reduction::process_reduction_axes;
use crate::array::{Array, Element};
use crate::autograd::BackwardOp;
use crate::error::RevgradError;
use crate::ops::record_op;
use crate::tensor::Tensor;

/// Backward context for `mean_op`.
#[derive(Debug)]
struct MeanBackward<T: Element> {
    input_shape: Vec<usize>,
    axes: Vec<usize>,
    /// Number of elements averaged into each output element.
    n: T,
}

impl<T: Element> BackwardOp<T> for MeanBackward<T> {
    fn name(&self) -> &'static str {
        "MeanBackward"
    }

    fn backward(&self, grad_output: &Array<T>) -> Result<Vec<Array<T>>, RevgradError> {
        let grad = grad_output
            .scale(T::one() / self.n)
            .restore_reduced_dims(&self.input_shape, &self.axes)?
            .expand_to(&self.input_shape)?;
        Ok(vec![grad])
    }
}

/// Averages `x` along `axes` (all axes when `None` or empty).
///
/// Reducing over an empty axis yields `NaN`.
pub fn mean_op<T: Element>(
    x: &Tensor<T>,
    axes: Option<&[usize]>,
    keep_dims: bool,
) -> Result<Tensor<T>, RevgradError> {
    let input = x.array();
    let axes = process_reduction_axes(input.rank(), axes)?;
    let count: usize = axes.iter().map(|&axis| input.shape()[axis]).product();
    let n = num_traits::cast::<usize, T>(count).ok_or_else(|| {
        RevgradError::InternalError(format!("mean element count {} not representable", count))
    })?;
    let output = input.sum_axes(Some(axes.as_slice()), keep_dims)?.scale(T::one() / n);
    Ok(record_op(output, &[x], || {
        Box::new(MeanBackward {
            input_shape: input.shape().to_vec(),
            axes,
            n,
        })
    }))
}

#[cfg(test)]
#[path = "mean_test.rs"]
mod tests;
