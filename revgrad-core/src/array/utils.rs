use crate::error::RevgradError;
use std::cmp::max;

/// Calculates the strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Determines the output shape resulting from broadcasting two input shapes.
///
/// Follows NumPy/PyTorch broadcasting rules:
/// 1. If the shapes have different numbers of dimensions, prepend 1s to the shorter shape.
/// 2. Compare dimensions element-wise from right to left.
/// 3. Dimensions are compatible if they are equal, or one of them is 1.
/// 4. The resulting dimension size is the maximum of the two compared dimensions.
pub fn broadcast_shapes(shape_a: &[usize], shape_b: &[usize]) -> Result<Vec<usize>, RevgradError> {
    let rank_a = shape_a.len();
    let rank_b = shape_b.len();
    let max_rank = max(rank_a, rank_b);
    let mut result_shape = vec![0; max_rank];

    for i in 0..max_rank {
        let dim_a = if i < rank_a { shape_a[rank_a - 1 - i] } else { 1 };
        let dim_b = if i < rank_b { shape_b[rank_b - 1 - i] } else { 1 };

        result_shape[max_rank - 1 - i] = if dim_a == dim_b || dim_b == 1 {
            dim_a
        } else if dim_a == 1 {
            dim_b
        } else {
            return Err(RevgradError::BroadcastError {
                shape1: shape_a.to_vec(),
                shape2: shape_b.to_vec(),
            });
        };
    }
    Ok(result_shape)
}

/// Converts a linear (row-major) index into coordinates for `shape`.
pub fn index_to_coord(index: usize, shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut remainder = index;
    for dim in (0..shape.len()).rev() {
        let size = shape[dim];
        if size > 0 {
            coord[dim] = remainder % size;
            remainder /= size;
        }
    }
    coord
}

/// Maps coordinates in a broadcast output onto the flat offset of an input
/// with `input_shape`/`input_strides`. Leading output dimensions absent from
/// the input are ignored; size-1 input dimensions always read index 0.
pub(crate) fn broadcast_offset(
    output_coord: &[usize],
    input_shape: &[usize],
    input_strides: &[usize],
) -> usize {
    let rank_diff = output_coord.len() - input_shape.len();
    input_shape
        .iter()
        .zip(input_strides)
        .enumerate()
        .map(|(dim, (&size, &stride))| {
            if size == 1 {
                0
            } else {
                output_coord[rank_diff + dim] * stride
            }
        })
        .sum()
}
