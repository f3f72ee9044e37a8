//! Dense tensor views
//!
//! gspmm does not own tensor storage. Callers hand in contiguous buffers
//! through [`TensorView`] / [`TensorViewMut`], which carry the full shape so
//! the kernels can validate leading dimensions and feature shapes.

mod shape;
mod view;

pub use shape::Shape;
pub use view::{TensorView, TensorViewMut};
