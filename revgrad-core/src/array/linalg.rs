use super::{Array, Element};
use crate::error::RevgradError;

impl<T: Element> Array<T> {
    /// Matrix product of two 2-D arrays: `[m, k] @ [k, n] -> [m, n]`.
    pub fn matmul(&self, other: &Array<T>) -> Result<Array<T>, RevgradError> {
        if self.rank() != 2 || other.rank() != 2 {
            return Err(RevgradError::IncompatibleShapes {
                shape1: self.shape().to_vec(),
                shape2: other.shape().to_vec(),
                operation: "matmul (rank check)".to_string(),
            });
        }
        let (m, k) = (self.shape()[0], self.shape()[1]);
        let (k2, n) = (other.shape()[0], other.shape()[1]);
        if k != k2 {
            return Err(RevgradError::IncompatibleShapes {
                shape1: self.shape().to_vec(),
                shape2: other.shape().to_vec(),
                operation: "matmul (inner dim)".to_string(),
            });
        }

        let a = self.as_slice();
        let b = other.as_slice();
        let mut output = vec![T::zero(); m * n];
        for i in 0..m {
            for l in 0..k {
                let a_il = a[i * k + l];
                for j in 0..n {
                    output[i * n + j] = output[i * n + j] + a_il * b[l * n + j];
                }
            }
        }
        Array::new(output, vec![m, n])
    }

    /// Transposes a 2-D array.
    pub fn transpose(&self) -> Result<Array<T>, RevgradError> {
        if self.rank() != 2 {
            return Err(RevgradError::ShapeMismatch {
                expected: vec![0, 0],
                actual: self.shape().to_vec(),
                operation: "transpose (requires rank 2)".to_string(),
            });
        }
        let (rows, cols) = (self.shape()[0], self.shape()[1]);
        let data = self.as_slice();
        let mut output = Vec::with_capacity(rows * cols);
        for j in 0..cols {
            for i in 0..rows {
                output.push(data[i * cols + j]);
            }
        }
        Array::new(output, vec![cols, rows])
    }
}
