// src/tensor/traits.rs

use crate::array::Element;
use crate::tensor::Tensor;
use std::fmt::{self, Debug};
use std::sync::Arc;

impl<T: Element> Clone for Tensor<T> {
    /// Clones the handle, not the node: both handles refer to the same
    /// data, gradient buffer and `grad_fn`.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Element> Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let td = self.read_data();
        let mut s = f.debug_struct("Tensor");
        s.field("data", &td.data).field("requires_grad", &td.requires_grad);
        if let Some(grad_fn) = td.grad_fn.as_ref() {
            s.field("grad_fn", &grad_fn.name());
        }
        if let Some(grad) = td.grad.as_ref() {
            s.field("grad", grad);
        }
        s.finish()
    }
}
