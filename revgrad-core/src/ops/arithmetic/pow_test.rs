use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_pow_forward() {
    let t = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let result = pow_op(&t, 2.0).unwrap();
    check_tensor_near(&result, &[3], &[1.0, 4.0, 9.0], 1e-12);
}

#[test]
fn test_pow_backward_square() -> Result<(), RevgradError> {
    let x = create_test_tensor_with_grad(vec![0.2], vec![1]);
    let y = pow_op(&x, 2.0)?;
    y.backward(None)?;
    check_tensor_near(&x.grad().unwrap(), &[1], &[0.4], 1e-12);
    Ok(())
}

#[test]
fn test_pow_zero_exponent_has_zero_grad() -> Result<(), RevgradError> {
    let x = create_test_tensor_with_grad(vec![0.0, 5.0], vec![2]);
    let y = pow_op(&x, 0.0)?;
    check_tensor_near(&y, &[2], &[1.0, 1.0], 1e-12);
    y.backward(Some(create_test_tensor(vec![1.0, 1.0], vec![2])))?;
    check_tensor_near(&x.grad().unwrap(), &[2], &[0.0, 0.0], 1e-12);
    Ok(())
}

#[test]
fn test_pow_backward_grad_check() {
    let x = create_test_tensor_with_grad(vec![0.5, 1.5, 2.0, 3.0], vec![2, 2]);
    let output_grad = create_test_tensor(vec![1.0, -1.0, 0.5, 2.0], vec![2, 2]);
    check_grad(|inputs| pow_op(&inputs[0], 3.0), &[x.clone()], &output_grad, 1e-6, 1e-6)
        .expect("grad check failed for cube");
    check_grad(|inputs| pow_op(&inputs[0], 0.5), &[x], &output_grad, 1e-6, 1e-6)
        .expect("grad check failed for sqrt");
}

#[test]
fn test_pow_f32() -> Result<(), RevgradError> {
    let x = crate::tensor::create_leaf(vec![3.0f32], vec![1], true)?;
    let y = pow_op(&x, 2.0f32)?;
    y.backward(None)?;
    let grad = x.grad().unwrap().item()?;
    assert!((grad - 6.0f32).abs() < 1e-6);
    Ok(())
}
