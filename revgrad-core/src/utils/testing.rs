use crate::array::Element;
use crate::tensor::Tensor;

/// Checks if a tensor is approximately equal to the expected shape and data.
/// Comparison happens in f64 so the helper serves both element types.
/// Panics if shapes differ or data differs significantly.
pub fn check_tensor_near<T: Element>(
    actual: &Tensor<T>,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual.to_vec();
    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        let a = a.to_f64().unwrap_or(f64::NAN);
        let diff = (a - *e).abs();
        if diff.is_nan() || diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Helper to create a simple f64 tensor for testing purposes.
#[cfg(test)]
pub(crate) fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor<f64> {
    Tensor::new(data, shape).expect("Failed to create test tensor")
}

/// Helper to create a simple f64 tensor that requires gradient for testing.
#[cfg(test)]
pub(crate) fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor<f64> {
    let tensor = Tensor::new(data, shape).expect("Failed to create test tensor with grad");
    tensor.write_data().requires_grad = true;
    tensor
}
