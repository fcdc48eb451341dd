//! Element-wise arithmetic with NumPy-style broadcasting.
//!
//! Backward rules reduce each gradient back to its input's shape with
//! [`Array::reduce_to_shape`](crate::array::Array::reduce_to_shape).

pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod pow;
pub mod sub;

pub use add::add_op;
pub use div::div_op;
pub use mul::mul_op;
pub use neg::neg_op;
pub use pow::pow_op;
pub use sub::sub_op;
