use rand::rngs::StdRng;
use rand::SeedableRng;
use revgrad_core::autograd::grad_check::check_grad;
use revgrad_core::ops::arithmetic::{add_op, div_op, mul_op, pow_op, sub_op};
use revgrad_core::ops::linalg::matmul_op;
use revgrad_core::ops::reduction::{mean_op, sum_op};
use revgrad_core::tensor::randn_with_rng;
use revgrad_core::{RevgradError, Tensor};

mod common;
use common::{constant, init_logging};

const EPSILON: f64 = 1e-6;
const TOLERANCE: f64 = 1e-5;

fn random_leaf(rng: &mut StdRng, shape: &[usize]) -> Tensor<f64> {
    let t: Tensor<f64> = randn_with_rng(shape, rng).expect("randn failed");
    t.requires_grad_(true).expect("fresh tensor is a leaf");
    t
}

/// Composite expression mixing every primitive:
/// mean(((a @ w + bias) * a_row - c)^2 / d, axis 1)
fn composite(inputs: &[Tensor<f64>]) -> Result<Tensor<f64>, RevgradError> {
    let (a, w, bias) = (&inputs[0], &inputs[1], &inputs[2]);
    let projected = add_op(&matmul_op(a, w)?, bias)?;
    let shifted = sub_op(&mul_op(&projected, &projected)?, &constant(vec![0.5], vec![1]))?;
    let scaled = div_op(&shifted, &constant(vec![2.0, -4.0], vec![2]))?;
    let squared = pow_op(&scaled, 2.0)?;
    mean_op(&squared, Some(&[1]), false)
}

#[test]
fn composite_expression_matches_finite_differences() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_leaf(&mut rng, &[3, 4]);
    let w = random_leaf(&mut rng, &[4, 2]);
    let bias = random_leaf(&mut rng, &[2]);
    let output_grad = constant(vec![1.0, -0.5, 2.0], vec![3]);
    check_grad(composite, &[a, w, bias], &output_grad, EPSILON, TOLERANCE)
        .expect("grad check failed for composite expression");
}

#[test]
fn shared_input_matches_finite_differences() {
    let mut rng = StdRng::seed_from_u64(11);
    let x = random_leaf(&mut rng, &[2, 3]);
    let output_grad = constant(vec![1.0], vec![]);
    // sum(x * x + x): x feeds three edges.
    check_grad(
        |inputs| {
            let x = &inputs[0];
            sum_op(&add_op(&mul_op(x, x)?, x)?, None, false)
        },
        &[x],
        &output_grad,
        EPSILON,
        TOLERANCE,
    )
    .expect("grad check failed for shared input");
}

#[test]
fn constant_inputs_are_skipped() {
    let mut rng = StdRng::seed_from_u64(3);
    let x = random_leaf(&mut rng, &[3]);
    let c = constant(vec![1.0, 2.0, 3.0], vec![3]);
    let output_grad = constant(vec![1.0, 1.0, 1.0], vec![3]);
    check_grad(|inputs| mul_op(&inputs[0], &inputs[1]), &[x, c.clone()], &output_grad, EPSILON, TOLERANCE)
        .expect("grad check failed with constant input");
    assert!(c.grad().is_none());
}
