use revgrad_core::{create_leaf, Tensor};

/// Initialises `env_logger` once per test binary so `RUST_LOG=revgrad_core=trace`
/// shows engine activity.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn leaf(data: Vec<f64>, shape: Vec<usize>) -> Tensor<f64> {
    create_leaf(data, shape, true).expect("Test leaf creation failed")
}

#[allow(dead_code)]
pub fn constant(data: Vec<f64>, shape: Vec<usize>) -> Tensor<f64> {
    Tensor::new(data, shape).expect("Test tensor creation failed")
}
