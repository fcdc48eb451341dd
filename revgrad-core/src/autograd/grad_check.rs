use crate::array::{Array, Element};
use crate::autograd::no_grad;
use crate::error::RevgradError;
use crate::tensor::Tensor;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(RevgradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(RevgradError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(RevgradError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<RevgradError> for GradCheckError {
    fn from(err: RevgradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

fn to_f64<T: Element>(value: T) -> Result<f64, GradCheckError> {
    value.to_f64().ok_or_else(|| {
        GradCheckError::TensorError(RevgradError::InternalError(format!(
            "{:?} is not representable as f64",
            value
        )))
    })
}

fn from_f64<T: Element>(value: f64) -> Result<T, GradCheckError> {
    num_traits::cast::<f64, T>(value).ok_or_else(|| {
        GradCheckError::TensorError(RevgradError::InternalError(format!(
            "{} is not representable in the element type",
            value
        )))
    })
}

/// Checks analytical gradients against numerical gradients using central
/// finite differences.
///
/// The scalar loss is `sum(func(inputs) * output_grad)`, so the analytical
/// gradients are those produced by `func(inputs).backward(Some(output_grad))`.
/// Inputs that do not require grad are held constant. Perturbed forward
/// passes run without building a graph.
///
/// Gradient buffers of the inputs are reset before the analytical pass.
pub fn check_grad<T, F>(
    func: F,
    inputs: &[Tensor<T>],
    output_grad: &Tensor<T>,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    T: Element,
    F: Fn(&[Tensor<T>]) -> Result<Tensor<T>, RevgradError>,
{
    for (i, input) in inputs.iter().enumerate() {
        if input.requires_grad() && !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
    }

    // --- Analytical gradients ---
    for input in inputs.iter().filter(|t| t.requires_grad()) {
        input.zero_grad();
    }
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let any_input_requires_grad = inputs.iter().any(|t| t.requires_grad());
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if output.requires_grad() {
        output
            .backward(Some(output_grad.clone()))
            .map_err(GradCheckError::BackwardPassError)?;
    }
    let output_grad = output_grad.array();

    // --- Numerical gradients ---
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical = original_input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .to_vec();
        let original_data = original_input.to_vec();
        let shape = original_input.shape();

        for elem_idx in 0..original_data.len() {
            let center = to_f64(original_data[elem_idx])?;
            let loss_at = |value: f64| -> Result<f64, GradCheckError> {
                let mut data = original_data.clone();
                data[elem_idx] = from_f64(value)?;
                let perturbed = Tensor::new(data, shape.clone())?;
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i] = perturbed;
                let out = no_grad(|| func(&perturbed_inputs)).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&out.array(), &output_grad)
            };
            let loss_plus = loss_at(center + epsilon)?;
            let loss_minus = loss_at(center - epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = to_f64(analytical[elem_idx])?;

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }

            let close = relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            );
            if !close {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
        log::trace!("grad_check: input {} matched on {} elements", i, original_data.len());
    }

    Ok(())
}

/// `sum(output * output_grad)`, accumulated in f64.
fn calculate_loss<T: Element>(output: &Array<T>, output_grad: &Array<T>) -> Result<f64, GradCheckError> {
    if output.shape() != output_grad.shape() {
        return Err(GradCheckError::TensorError(RevgradError::ShapeMismatch {
            expected: output.shape().to_vec(),
            actual: output_grad.shape().to_vec(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    output
        .as_slice()
        .iter()
        .zip(output_grad.as_slice())
        .try_fold(0.0f64, |acc, (&o, &g)| Ok(acc + to_f64(o)? * to_f64(g)?))
}
