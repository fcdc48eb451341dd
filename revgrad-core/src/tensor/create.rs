// src/tensor/create.rs
//! Leaf tensor creation.

use crate::array::{Array, Element};
use crate::error::RevgradError;
use crate::tensor::Tensor;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a leaf tensor and sets its `requires_grad` flag.
///
/// A leaf with `requires_grad = true` is a gradient sink: after `backward`,
/// its `grad()` holds the sum of every contribution that reached it.
pub fn create_leaf<T: Element>(
    data: Vec<T>,
    shape: Vec<usize>,
    requires_grad: bool,
) -> Result<Tensor<T>, RevgradError> {
    let tensor = Tensor::new(data, shape)?;
    tensor.write_data().requires_grad = requires_grad;
    Ok(tensor)
}

pub fn zeros<T: Element>(shape: &[usize]) -> Tensor<T> {
    Tensor::from_array(Array::zeros(shape))
}

pub fn ones<T: Element>(shape: &[usize]) -> Tensor<T> {
    Tensor::from_array(Array::ones(shape))
}

pub fn full<T: Element>(shape: &[usize], value: T) -> Tensor<T> {
    Tensor::from_array(Array::full(shape, value))
}

pub fn zeros_like<T: Element>(tensor: &Tensor<T>) -> Tensor<T> {
    zeros(&tensor.shape())
}

pub fn ones_like<T: Element>(tensor: &Tensor<T>) -> Tensor<T> {
    ones(&tensor.shape())
}

/// Creates a tensor with values drawn uniformly from `[0, 1)`.
pub fn rand<T: Element>(shape: &[usize]) -> Result<Tensor<T>, RevgradError>
where
    Standard: Distribution<T>,
{
    let mut rng = rand::thread_rng();
    let numel: usize = shape.iter().product();
    let data: Vec<T> = (0..numel).map(|_| rng.gen()).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates a tensor with values drawn from the standard normal distribution.
pub fn randn<T: Element>(shape: &[usize]) -> Result<Tensor<T>, RevgradError>
where
    StandardNormal: Distribution<T>,
{
    randn_with_rng(shape, &mut rand::thread_rng())
}

/// Like [`randn`], drawing from a caller-provided generator (e.g. a seeded `StdRng`).
pub fn randn_with_rng<T: Element, R: Rng + ?Sized>(
    shape: &[usize],
    rng: &mut R,
) -> Result<Tensor<T>, RevgradError>
where
    StandardNormal: Distribution<T>,
{
    let numel: usize = shape.iter().product();
    let data: Vec<T> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
    Tensor::new(data, shape.to_vec())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
