// src/tensor/accessors.rs
use crate::array::{Array, Element};
use crate::error::RevgradError;
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Returns a clone of the tensor's shape (dimensions).
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape().to_vec()
    }

    /// Returns the rank (number of dimensions) of the tensor.
    pub fn rank(&self) -> usize {
        self.read_data().shape().len()
    }

    /// Returns the total number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Returns the underlying array. The element buffer is shared, not copied.
    pub fn array(&self) -> Array<T> {
        self.read_data().data.clone()
    }

    /// Copies the elements out in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read_data().data.to_vec()
    }

    /// Extracts the value of a tensor containing exactly one element.
    pub fn item(&self) -> Result<T, RevgradError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(RevgradError::ShapeMismatch {
                expected: vec![],
                actual: guard.shape().to_vec(),
                operation: "item()".to_string(),
            });
        }
        Ok(guard.data.as_slice()[0])
    }
}
