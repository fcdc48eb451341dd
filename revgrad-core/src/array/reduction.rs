//! Reductions over array axes.

use super::utils::{calculate_strides, index_to_coord};
use super::{Array, Element};
use crate::error::RevgradError;

/// Processes the axes provided for a reduction operation.
///
/// - If `axes` is `None` or empty, returns all axes `0..rank`.
/// - Otherwise validates each axis against the rank, sorts them and removes duplicates.
pub(crate) fn process_reduction_axes(
    rank: usize,
    axes: Option<&[usize]>,
) -> Result<Vec<usize>, RevgradError> {
    match axes {
        None => Ok((0..rank).collect()),
        Some(ax) if ax.is_empty() => Ok((0..rank).collect()),
        Some(ax) => {
            let mut processed = Vec::with_capacity(ax.len());
            for &axis in ax {
                if axis >= rank {
                    return Err(RevgradError::InvalidAxis { axis, rank });
                }
                processed.push(axis);
            }
            processed.sort_unstable();
            processed.dedup();
            Ok(processed)
        }
    }
}

/// Calculates the output shape after reducing `axes` of `input_shape`.
/// With `keep_dims`, reduced dimensions are kept with size 1.
pub(crate) fn calculate_reduction_output_shape(
    input_shape: &[usize],
    axes: &[usize],
    keep_dims: bool,
) -> Vec<usize> {
    input_shape
        .iter()
        .enumerate()
        .filter_map(|(dim, &size)| {
            if !axes.contains(&dim) {
                Some(size)
            } else if keep_dims {
                Some(1)
            } else {
                None
            }
        })
        .collect()
}

impl<T: Element> Array<T> {
    /// Sums elements along `axes` (all axes when `None`).
    pub fn sum_axes(&self, axes: Option<&[usize]>, keep_dims: bool) -> Result<Array<T>, RevgradError> {
        let axes = process_reduction_axes(self.rank(), axes)?;
        let kept_shape = calculate_reduction_output_shape(self.shape(), &axes, true);
        let output_shape = calculate_reduction_output_shape(self.shape(), &axes, keep_dims);

        // Dropping size-1 dims does not change the flat layout, so the
        // keep-dims strides address the output in both cases.
        let kept_strides = calculate_strides(&kept_shape);
        let output_numel: usize = kept_shape.iter().product();
        let mut result = vec![T::zero(); output_numel];

        for (i, &value) in self.as_slice().iter().enumerate() {
            let coord = index_to_coord(i, self.shape());
            let out_idx: usize = coord
                .iter()
                .zip(&kept_strides)
                .enumerate()
                .map(|(dim, (&c, &stride))| if axes.contains(&dim) { 0 } else { c * stride })
                .sum();
            result[out_idx] = result[out_idx] + value;
        }
        Array::new(result, output_shape)
    }

    /// Sums every element into a 0-dimensional array.
    pub fn sum_all(&self) -> Array<T> {
        let total = self.as_slice().iter().fold(T::zero(), |acc, &x| acc + x);
        Array::scalar(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Array<f64> {
        Array::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap()
    }

    #[test]
    fn test_sum_all() {
        let r = sample().sum_axes(None, false).unwrap();
        assert_eq!(r.shape(), &[] as &[usize]);
        assert_eq!(r.to_vec(), vec![21.0]);
        assert_eq!(sample().sum_all().to_vec(), vec![21.0]);
    }

    #[test]
    fn test_sum_axis0() {
        let r = sample().sum_axes(Some(&[0]), false).unwrap();
        assert_eq!(r.shape(), &[3]);
        assert_eq!(r.to_vec(), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_sum_axis1_keepdims() {
        let r = sample().sum_axes(Some(&[1]), true).unwrap();
        assert_eq!(r.shape(), &[2, 1]);
        assert_eq!(r.to_vec(), vec![6.0, 15.0]);
    }

    #[test]
    fn test_sum_multiple_axes() {
        let t = Array::new((1..=24).map(|x| x as f64).collect(), vec![2, 3, 4]).unwrap();
        let r = t.sum_axes(Some(&[0, 2]), false).unwrap();
        assert_eq!(r.shape(), &[3]);
        assert_eq!(r.to_vec(), vec![68.0, 100.0, 132.0]);
    }

    #[test]
    fn test_sum_invalid_axis() {
        let r = sample().sum_axes(Some(&[2]), false);
        assert_eq!(r.unwrap_err(), RevgradError::InvalidAxis { axis: 2, rank: 2 });
    }
}
