use super::reduction::calculate_reduction_output_shape;
use super::utils::{broadcast_offset, broadcast_shapes, calculate_strides, index_to_coord};
use super::{Array, Element};
use crate::error::RevgradError;

impl<T: Element> Array<T> {
    /// Reduces the array (a gradient) to `target_shape` by summing along broadcast dimensions.
    ///
    /// Undoes the expansion performed by a broadcasting forward op: leading
    /// dimensions the input never had are summed away, and dimensions where the
    /// input had size 1 are summed with `keep_dims`. Crucial for the backward pass
    /// of every broadcasting binary op.
    ///
    /// # Errors
    /// `ShapeMismatch` if `target_shape` could not have been broadcast to the current shape.
    pub fn reduce_to_shape(&self, target_shape: &[usize]) -> Result<Array<T>, RevgradError> {
        let current_shape = self.shape();
        if current_shape == target_shape {
            return Ok(self.clone());
        }

        let mismatch = || RevgradError::ShapeMismatch {
            expected: target_shape.to_vec(),
            actual: current_shape.to_vec(),
            operation: "reduce_to_shape".to_string(),
        };

        let current_rank = current_shape.len();
        let target_rank = target_shape.len();
        if current_rank < target_rank {
            return Err(mismatch());
        }

        let rank_diff = current_rank - target_rank;
        let mut axes_to_reduce: Vec<usize> = (0..rank_diff).collect();
        for (i, &target_dim) in target_shape.iter().enumerate() {
            let current_dim = current_shape[rank_diff + i];
            if current_dim != target_dim {
                if target_dim == 1 {
                    axes_to_reduce.push(rank_diff + i);
                } else {
                    return Err(mismatch());
                }
            }
        }

        let reduced = self.sum_axes(Some(axes_to_reduce.as_slice()), true)?;
        // Leading axes were kept as size 1; drop them to land on the target rank.
        reduced.reshape(target_shape.to_vec())
    }

    /// Broadcasts the array to `target_shape`, materialising the repeated elements.
    ///
    /// Counterpart of [`reduce_to_shape`](Self::reduce_to_shape): used by reduction
    /// backward rules to spread an upstream gradient back over the input shape.
    pub fn expand_to(&self, target_shape: &[usize]) -> Result<Array<T>, RevgradError> {
        if self.shape() == target_shape {
            return Ok(self.clone());
        }
        let broadcast = broadcast_shapes(self.shape(), target_shape)?;
        if broadcast != target_shape {
            return Err(RevgradError::ShapeMismatch {
                expected: target_shape.to_vec(),
                actual: self.shape().to_vec(),
                operation: "expand_to".to_string(),
            });
        }

        let strides = calculate_strides(self.shape());
        let numel: usize = target_shape.iter().product();
        let source = self.as_slice();
        let data = (0..numel)
            .map(|i| {
                let coord = index_to_coord(i, target_shape);
                source[broadcast_offset(&coord, self.shape(), &strides)]
            })
            .collect();
        Array::new(data, target_shape.to_vec())
    }

    /// Re-inserts size-1 dimensions at `axes` so that a reduction result
    /// (computed without `keep_dims`) lines up with `input_shape` again.
    pub(crate) fn restore_reduced_dims(
        &self,
        input_shape: &[usize],
        axes: &[usize],
    ) -> Result<Array<T>, RevgradError> {
        let kept_shape = calculate_reduction_output_shape(input_shape, axes, true);
        if self.shape() == kept_shape.as_slice() {
            return Ok(self.clone());
        }
        self.reshape(kept_shape)
    }
}
