use thiserror::Error;

/// Coarse classification of [`RevgradError`] variants.
///
/// Callers that only care about the category of a failure (bad shapes, a
/// misconfigured `backward` call, or a problem with the computation graph
/// itself) can match on this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shapes do not line up: seed vs output, broadcast failures, invalid axes.
    Shape,
    /// The call itself is ill-formed (e.g. implicit seed on a non-scalar output).
    Config,
    /// The graph cannot be traversed (released, missing, or inconsistent).
    Graph,
    /// Invariant violation inside the engine.
    Internal,
}

/// Custom error type for the revgrad engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum RevgradError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Incompatible shapes for operation {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Backward called on non-scalar tensor of shape {shape:?} without explicit gradient.")]
    BackwardNonScalar { shape: Vec<usize> },

    #[error("requires_grad can only be changed on leaf tensors.")]
    RequiresGradOnNonLeaf,

    #[error("Trying to backward through the graph a second time: saved state of {operation} was already released. Use retain_graph=true on the earlier backward call.")]
    GraphReleased { operation: String },

    #[error("Tensor does not require grad and has no grad_fn: there is no graph to differentiate.")]
    NoGraph,

    #[error("{operation} returned {actual} gradients, but expected {expected}")]
    GradientCountMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RevgradError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RevgradError::ShapeMismatch { .. }
            | RevgradError::IncompatibleShapes { .. }
            | RevgradError::BroadcastError { .. }
            | RevgradError::TensorCreationError { .. }
            | RevgradError::InvalidAxis { .. } => ErrorKind::Shape,
            RevgradError::BackwardNonScalar { .. } | RevgradError::RequiresGradOnNonLeaf => {
                ErrorKind::Config
            }
            RevgradError::GraphReleased { .. }
            | RevgradError::NoGraph
            | RevgradError::GradientCountMismatch { .. } => ErrorKind::Graph,
            RevgradError::InternalError(_) => ErrorKind::Internal,
        }
    }
}
