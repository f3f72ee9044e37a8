//! Borrowed views over caller-owned dense buffers
//!
//! The kernels never allocate or resize caller tensors. A view pairs a
//! contiguous row-major slice with its full shape; the first dimension is the
//! node, edge or destination id and the rest is the feature shape.

use super::shape::Shape;
use crate::error::{Error, Result};
use bytemuck::Pod;

fn check_len(len: usize, shape: &[usize]) -> Result<()> {
    if shape.is_empty() {
        return Err(Error::invalid_argument(
            "shape",
            "feature tensors need at least one (leading) dimension",
        ));
    }
    let numel: usize = shape.iter().product();
    if numel != len {
        return Err(Error::shape_mismatch(&[numel], &[len]));
    }
    Ok(())
}

/// Read-only view of a dense tensor
#[derive(Debug, Clone)]
pub struct TensorView<'a, T> {
    data: &'a [T],
    shape: Shape,
}

impl<'a, T: Copy> TensorView<'a, T> {
    /// Create a view over `data` with the given full shape
    ///
    /// # Errors
    ///
    /// Returns error if `shape` is empty or its element count differs from
    /// `data.len()`.
    pub fn new(data: &'a [T], shape: &[usize]) -> Result<Self> {
        check_len(data.len(), shape)?;
        Ok(Self {
            data,
            shape: Shape::from(shape),
        })
    }

    /// Returns the full shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of the leading (node/edge) dimension
    #[inline]
    pub fn leading_dim(&self) -> usize {
        self.shape.leading_dim()
    }

    /// Per-element feature shape (all dimensions after the first)
    #[inline]
    pub fn feature_shape(&self) -> &[usize] {
        self.shape.trailing()
    }

    /// Number of scalars per leading index
    #[inline]
    pub fn row_len(&self) -> usize {
        self.feature_shape().iter().product()
    }

    /// Underlying contiguous data
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

impl<'a, T: Pod> TensorView<'a, T> {
    /// Create a view by reinterpreting a raw byte buffer
    ///
    /// # Errors
    ///
    /// Returns error if the buffer is misaligned or its length is not a
    /// multiple of `size_of::<T>()`, or if the shape does not match.
    pub fn from_bytes(bytes: &'a [u8], shape: &[usize]) -> Result<Self> {
        let data: &'a [T] = bytemuck::try_cast_slice(bytes)
            .map_err(|e| Error::invalid_argument("bytes", e.to_string()))?;
        Self::new(data, shape)
    }
}

/// Mutable view of a dense tensor, written in place by the kernels
#[derive(Debug)]
pub struct TensorViewMut<'a, T> {
    data: &'a mut [T],
    shape: Shape,
}

impl<'a, T: Copy> TensorViewMut<'a, T> {
    /// Create a mutable view over `data` with the given full shape
    ///
    /// # Errors
    ///
    /// Returns error if `shape` is empty or its element count differs from
    /// `data.len()`.
    pub fn new(data: &'a mut [T], shape: &[usize]) -> Result<Self> {
        check_len(data.len(), shape)?;
        Ok(Self {
            data,
            shape: Shape::from(shape),
        })
    }

    /// Returns the full shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Size of the leading (destination) dimension
    #[inline]
    pub fn leading_dim(&self) -> usize {
        self.shape.leading_dim()
    }

    /// Per-element feature shape
    #[inline]
    pub fn feature_shape(&self) -> &[usize] {
        self.shape.trailing()
    }

    /// Number of scalars per leading index
    #[inline]
    pub fn row_len(&self) -> usize {
        self.feature_shape().iter().product()
    }

    /// Underlying contiguous data
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.data
    }

    /// Underlying contiguous data, mutable
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Overwrite every element with `value`
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<'a, T: Pod> TensorViewMut<'a, T> {
    /// Create a mutable view by reinterpreting a raw byte buffer
    ///
    /// # Errors
    ///
    /// Same conditions as [`TensorView::from_bytes`].
    pub fn from_bytes(bytes: &'a mut [u8], shape: &[usize]) -> Result<Self> {
        let data: &'a mut [T] = bytemuck::try_cast_slice_mut(bytes)
            .map_err(|e| Error::invalid_argument("bytes", e.to_string()))?;
        Self::new(data, shape)
    }
}
