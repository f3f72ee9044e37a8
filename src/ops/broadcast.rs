//! Broadcast planning between the two feature operands of an SpMM call
//!
//! Only the trailing (feature) dimensions take part; the leading node/edge
//! dimension is stripped by the caller. Shapes are right-aligned and a
//! size-1 dimension stretches to the other operand's size:
//!
//! ```text
//! ufeat feature shape:    [4, 1, 8]
//! efeat feature shape:       [3, 1]
//! output feature shape:   [4, 3, 8]
//! ```
//!
//! The plan is built once per invocation. When broadcasting is actually
//! needed it precomputes, for every flat output-feature index, the flat
//! index into each operand's feature block, so traversal does an O(1)
//! table lookup per scalar.

use super::SpmmOp;
use crate::error::{Error, Result};
use crate::tensor::Shape;

/// Compute the broadcast of two feature shapes
///
/// Returns None if the shapes are incompatible (both sizes > 1 and unequal
/// at some aligned axis).
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Option<Shape> {
    let max_ndim = a.len().max(b.len());
    let mut result = Shape::new();

    for i in 0..max_ndim {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        if a_dim == b_dim || b_dim == 1 {
            result.push(a_dim);
        } else if a_dim == 1 {
            result.push(b_dim);
        } else {
            return None;
        }
    }

    result.reverse();
    Some(result)
}

/// Precomputed offsets translating output-feature positions to operand positions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastPlan {
    out_shape: Shape,
    out_len: usize,
    lhs_len: usize,
    rhs_len: usize,
    // Empty unless the operand shapes differ.
    lhs_offsets: Vec<usize>,
    rhs_offsets: Vec<usize>,
}

impl BroadcastPlan {
    /// Plan the broadcast of `lhs` (ufeat) and `rhs` (efeat) feature shapes for `op`
    ///
    /// An operand the operator ignores does not participate: its shape is
    /// neither checked nor reflected in the output shape.
    ///
    /// # Errors
    ///
    /// Returns `BroadcastError` if the participating shapes are incompatible.
    pub fn new(op: SpmmOp, lhs: &[usize], rhs: &[usize]) -> Result<Self> {
        let lhs: &[usize] = if op.uses_lhs() { lhs } else { &[] };
        let rhs: &[usize] = if op.uses_rhs() { rhs } else { &[] };

        let out_shape = broadcast_shapes(lhs, rhs).ok_or_else(|| Error::broadcast(lhs, rhs))?;
        let out_len = out_shape.numel();
        let lhs_len: usize = lhs.iter().product();
        let rhs_len: usize = rhs.iter().product();

        // An operand with as many scalars as the output is never stretched,
        // so its offsets are the identity.
        let use_bcast =
            (op.uses_lhs() && lhs_len != out_len) || (op.uses_rhs() && rhs_len != out_len);
        let (lhs_offsets, rhs_offsets) = if use_bcast {
            (
                operand_offsets(&out_shape, lhs),
                operand_offsets(&out_shape, rhs),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Self {
            out_shape,
            out_len,
            lhs_len,
            rhs_len,
            lhs_offsets,
            rhs_offsets,
        })
    }

    /// Broadcast-resolved feature shape of the output
    #[inline]
    pub fn out_shape(&self) -> &[usize] {
        &self.out_shape
    }

    /// Number of scalars per output row
    #[inline]
    pub fn out_len(&self) -> usize {
        self.out_len
    }

    /// Number of scalars per `ufeat` row (1 when the operand is ignored)
    #[inline]
    pub fn lhs_len(&self) -> usize {
        self.lhs_len
    }

    /// Number of scalars per `efeat` row (1 when the operand is ignored)
    #[inline]
    pub fn rhs_len(&self) -> usize {
        self.rhs_len
    }

    /// Whether operand offsets differ from the output position
    #[inline]
    pub fn use_bcast(&self) -> bool {
        !self.lhs_offsets.is_empty()
    }

    /// Flat index into a `ufeat` row for output position `k`
    #[inline(always)]
    pub fn lhs_offset(&self, k: usize) -> usize {
        if self.lhs_offsets.is_empty() {
            k
        } else {
            self.lhs_offsets[k]
        }
    }

    /// Flat index into an `efeat` row for output position `k`
    #[inline(always)]
    pub fn rhs_offset(&self, k: usize) -> usize {
        if self.rhs_offsets.is_empty() {
            k
        } else {
            self.rhs_offsets[k]
        }
    }
}

/// For every flat index of `out_shape`, the flat index into an operand of
/// shape `operand` (right-aligned, size-1 axes pinned to 0).
fn operand_offsets(out_shape: &[usize], operand: &[usize]) -> Vec<usize> {
    let ndim = out_shape.len();
    let pad = ndim - operand.len();

    // Row-major strides of the operand, zero on broadcast axes
    let mut strides = vec![0usize; ndim];
    let mut stride = 1usize;
    for axis in (0..ndim).rev() {
        let dim = if axis >= pad { operand[axis - pad] } else { 1 };
        if dim != 1 {
            strides[axis] = stride;
        }
        stride *= dim;
    }

    let out_len: usize = out_shape.iter().product();
    let mut offsets = Vec::with_capacity(out_len);
    for flat in 0..out_len {
        let mut rem = flat;
        let mut offset = 0usize;
        for axis in (0..ndim).rev() {
            let coord = rem % out_shape[axis];
            rem /= out_shape[axis];
            offset += coord * strides[axis];
        }
        offsets.push(offset);
    }
    offsets
}
