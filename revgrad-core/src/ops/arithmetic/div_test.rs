use super::*;
use crate::autograd::grad_check::check_grad;
use crate::utils::testing::{check_tensor_near, create_test_tensor, create_test_tensor_with_grad};

#[test]
fn test_div_tensors_ok() {
    let t1 = create_test_tensor(vec![6.0, 8.0, 9.0], vec![3]);
    let t2 = create_test_tensor(vec![2.0, 4.0, 3.0], vec![3]);
    let result = div_op(&t1, &t2).unwrap();
    check_tensor_near(&result, &[3], &[3.0, 2.0, 3.0], 1e-12);
}

#[test]
fn test_div_by_zero_is_infinite() {
    let t1 = create_test_tensor(vec![1.0], vec![1]);
    let t2 = create_test_tensor(vec![0.0], vec![1]);
    let result = div_op(&t1, &t2).unwrap();
    assert!(result.item().unwrap().is_infinite());
}

#[test]
fn test_div_backward() -> Result<(), RevgradError> {
    let a = create_test_tensor_with_grad(vec![6.0], vec![1]);
    let b = create_test_tensor_with_grad(vec![2.0], vec![1]);
    let output = div_op(&a, &b)?;
    output.backward(None)?;
    check_tensor_near(&a.grad().unwrap(), &[1], &[0.5], 1e-12);
    check_tensor_near(&b.grad().unwrap(), &[1], &[-1.5], 1e-12);
    Ok(())
}

#[test]
fn test_div_backward_grad_check() {
    let a = create_test_tensor_with_grad(vec![1.0, -2.0, 3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor_with_grad(vec![2.0, -1.5], vec![2]);
    let output_grad = create_test_tensor(vec![1.0, 1.0, 0.5, -2.0], vec![2, 2]);
    check_grad(|inputs| div_op(&inputs[0], &inputs[1]), &[a, b], &output_grad, 1e-6, 1e-6)
        .expect("grad check failed for div");
}
