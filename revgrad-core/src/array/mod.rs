//! # Array kernel (`array`)
//!
//! Contiguous, row-major n-dimensional storage and the numeric kernels the
//! autograd layer calls into: element-wise math with trailing-dimension
//! broadcasting, reductions, 2-D linear algebra, and the broadcast helpers
//! used by backward rules (`reduce_to_shape`, `expand_to`).
//!
//! An [`Array`] never tracks gradients. It is the plain data carried by a
//! [`Tensor`](crate::tensor::Tensor) and the form in which backward rules
//! receive and return gradients.

use crate::error::RevgradError;
use num_traits::Float;
use std::fmt::{self, Debug};
use std::sync::Arc;

pub mod broadcast_utils;
pub mod linalg;
pub mod reduction;
pub mod utils;

use utils::{broadcast_offset, broadcast_shapes, calculate_strides, index_to_coord};

/// Scalar types an [`Array`] can hold.
pub trait Element: Float + Debug + Send + Sync + 'static {}

impl Element for f32 {}
impl Element for f64 {}

/// Immutable n-dimensional array.
///
/// The element buffer sits behind an `Arc`, so clones (and reshapes) share
/// storage instead of copying it. Every kernel returns a freshly allocated
/// array; nothing is mutated in place.
#[derive(Clone, PartialEq)]
pub struct Array<T: Element> {
    data: Arc<Vec<T>>,
    shape: Vec<usize>,
}

impl<T: Element> Array<T> {
    /// Creates an array from row-major data.
    ///
    /// # Errors
    /// `TensorCreationError` if `data.len()` differs from the element count of `shape`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, RevgradError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(RevgradError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Array {
            data: Arc::new(data),
            shape,
        })
    }

    /// Creates a 0-dimensional array.
    pub fn scalar(value: T) -> Self {
        Array {
            data: Arc::new(vec![value]),
            shape: vec![],
        }
    }

    pub fn full(shape: &[usize], value: T) -> Self {
        let numel: usize = shape.iter().product();
        Array {
            data: Arc::new(vec![value; numel]),
            shape: shape.to_vec(),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.as_ref().clone()
    }

    /// Returns `true` if both arrays point at the same element buffer.
    pub fn shares_buffer(&self, other: &Array<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Returns the same elements under a new shape without copying.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Array<T>, RevgradError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(RevgradError::ShapeMismatch {
                expected: shape,
                actual: self.shape.clone(),
                operation: "reshape".to_string(),
            });
        }
        Ok(Array {
            data: Arc::clone(&self.data),
            shape,
        })
    }

    /// Applies `f` to every element.
    pub fn map<F>(&self, f: F) -> Array<T>
    where
        F: Fn(T) -> T,
    {
        Array {
            data: Arc::new(self.data.iter().map(|&x| f(x)).collect()),
            shape: self.shape.clone(),
        }
    }

    /// Combines two arrays element by element with broadcasting.
    pub fn zip_with<F>(&self, other: &Array<T>, f: F) -> Result<Array<T>, RevgradError>
    where
        F: Fn(T, T) -> T,
    {
        // Fast path: identical shapes need no index arithmetic.
        if self.shape == other.shape {
            let data = self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Array {
                data: Arc::new(data),
                shape: self.shape.clone(),
            });
        }

        let output_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let numel: usize = output_shape.iter().product();
        let a_strides = calculate_strides(&self.shape);
        let b_strides = calculate_strides(&other.shape);

        let mut data = Vec::with_capacity(numel);
        for i in 0..numel {
            let coord = index_to_coord(i, &output_shape);
            let a = self.data[broadcast_offset(&coord, &self.shape, &a_strides)];
            let b = other.data[broadcast_offset(&coord, &other.shape, &b_strides)];
            data.push(f(a, b));
        }
        Ok(Array {
            data: Arc::new(data),
            shape: output_shape,
        })
    }

    pub fn add(&self, other: &Array<T>) -> Result<Array<T>, RevgradError> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Array<T>) -> Result<Array<T>, RevgradError> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Array<T>) -> Result<Array<T>, RevgradError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Element-wise division. Division by zero yields `inf`/`NaN` per IEEE-754.
    pub fn div(&self, other: &Array<T>) -> Result<Array<T>, RevgradError> {
        self.zip_with(other, |a, b| a / b)
    }

    pub fn neg(&self) -> Array<T> {
        self.map(|x| -x)
    }

    /// Raises every element to `exponent`. Negative bases with fractional
    /// exponents produce `NaN`.
    pub fn powf(&self, exponent: T) -> Array<T> {
        self.map(|x| x.powf(exponent))
    }

    pub fn scale(&self, factor: T) -> Array<T> {
        self.map(|x| x * factor)
    }
}

impl<T: Element> Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        write!(f, "Array(shape={:?}, data=", self.shape)?;
        if self.numel() <= PREVIEW {
            write!(f, "{:?}", self.data.as_slice())?;
        } else {
            write!(f, "{:?} ... ({} elements)", &self.data[..PREVIEW], self.numel())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let err = Array::new(vec![1.0, 2.0, 3.0], vec![2, 2]).unwrap_err();
        assert_eq!(
            err,
            RevgradError::TensorCreationError {
                data_len: 3,
                shape: vec![2, 2]
            }
        );
    }

    #[test]
    fn test_add_same_shape() {
        let a = Array::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let b = Array::new(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]).unwrap();
        let c = a.add(&b).unwrap();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.to_vec(), vec![6.0, 8.0, 10.0, 12.0]);
    }

    #[test]
    fn test_broadcast_column_against_matrix() {
        let col = Array::new(vec![10.0, 20.0, 30.0], vec![3, 1]).unwrap();
        let m = Array::new((0..12).map(|x| x as f64).collect(), vec![3, 4]).unwrap();
        let c = col.add(&m).unwrap();
        assert_eq!(c.shape(), &[3, 4]);
        assert_eq!(
            c.to_vec(),
            vec![10.0, 11.0, 12.0, 13.0, 24.0, 25.0, 26.0, 27.0, 38.0, 39.0, 40.0, 41.0]
        );
    }

    #[test]
    fn test_broadcast_scalar() {
        let s = Array::scalar(2.0);
        let v = Array::new(vec![1.0, 2.0, 3.0], vec![3]).unwrap();
        assert_eq!(v.mul(&s).unwrap().to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!(s.sub(&v).unwrap().to_vec(), vec![1.0, 0.0, -1.0]);
    }

    #[test]
    fn test_incompatible_broadcast() {
        let a = Array::<f32>::zeros(&[2, 2]);
        let b = Array::<f32>::zeros(&[3]);
        assert!(matches!(a.add(&b), Err(RevgradError::BroadcastError { .. })));
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        let a = Array::new(vec![1.0, 0.0, -1.0], vec![3]).unwrap();
        let z = Array::zeros(&[3]);
        let c = a.div(&z).unwrap().to_vec();
        assert!(c[0].is_infinite() && c[0] > 0.0);
        assert!(c[1].is_nan());
        assert!(c[2].is_infinite() && c[2] < 0.0);
    }

    #[test]
    fn test_reshape_shares_buffer() {
        let a = Array::new(vec![1.0, 2.0, 3.0, 4.0], vec![4]).unwrap();
        let b = a.reshape(vec![2, 2]).unwrap();
        assert!(a.shares_buffer(&b));
        assert!(a.reshape(vec![3]).is_err());
    }

    #[test]
    fn test_powf_negative_base_fractional_exponent() {
        let a = Array::new(vec![-4.0_f64, 4.0], vec![2]).unwrap();
        let r = a.powf(0.5).to_vec();
        assert!(r[0].is_nan());
        assert_eq!(r[1], 2.0);
    }
}
