use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_mul_tensors_ok() {
    let t1 = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let t2 = create_test_tensor(vec![5.0, 6.0, 7.0, 8.0], vec![2, 2]);
    let result = mul_op(&t1, &t2).unwrap();
    check_tensor_near(&result, &[2, 2], &[5.0, 12.0, 21.0, 32.0], 1e-12);
}

#[test]
fn test_mul_broadcasting() {
    let matrix = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let column = create_test_tensor(vec![10.0, 100.0], vec![2, 1]);
    let result = mul_op(&matrix, &column).unwrap();
    check_tensor_near(&result, &[2, 2], &[10.0, 20.0, 300.0, 400.0], 1e-12);
}

#[test]
fn test_mul_incompatible_shapes() {
    let t1 = create_test_tensor(vec![1.0, 2.0], vec![2]);
    let t2 = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    assert!(matches!(mul_op(&t1, &t2), Err(RevgradError::BroadcastError { .. })));
}

#[test]
fn test_mul_backward_simple() -> Result<(), RevgradError> {
    let a = create_test_tensor_with_grad(vec![2.0, 3.0], vec![2]);
    let b = create_test_tensor_with_grad(vec![4.0, 5.0], vec![2]);
    let output = mul_op(&a, &b)?;
    output.backward(Some(create_test_tensor(vec![1.0, 1.0], vec![2])))?;
    check_tensor_near(&a.grad().unwrap(), &[2], &[4.0, 5.0], 1e-12);
    check_tensor_near(&b.grad().unwrap(), &[2], &[2.0, 3.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_backward_same_operand_twice() -> Result<(), RevgradError> {
    // d(x*x)/dx = 2x: both edges land on the same leaf and are summed.
    let x = create_test_tensor_with_grad(vec![3.0], vec![1]);
    let y = mul_op(&x, &x)?;
    y.backward(None)?;
    check_tensor_near(&x.grad().unwrap(), &[1], &[6.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_backward_broadcast_grad_check() {
    let a = create_test_tensor_with_grad(vec![1.0, -2.0, 3.0, 0.5, -0.5, 1.5], vec![2, 3]);
    let b = create_test_tensor_with_grad(vec![0.3, -0.7, 1.1], vec![1, 3]);
    let output_grad = create_test_tensor(vec![1.0, 0.5, -1.0, 2.0, 1.0, -0.25], vec![2, 3]);
    check_grad(|inputs| mul_op(&inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-6, 1e-6)
        .expect("grad check failed for mul");
}
