//! IndexElement trait for sparse index widths

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

/// Trait for integer types used as node ids, edge ids and offsets
///
/// Sparse structures validate every stored index once at construction, so
/// kernels convert with [`IndexElement::as_usize`] without re-checking.
pub trait IndexElement: Copy + Send + Sync + Debug + Pod + Zeroable + Ord + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Largest value representable, as usize
    const MAX_USIZE: usize;

    /// Checked conversion to usize; `None` for negative values
    fn to_usize(self) -> Option<usize>;

    /// Unchecked conversion for already validated indices
    fn as_usize(self) -> usize;

    /// Conversion from usize; callers guarantee `v <= MAX_USIZE`
    fn from_usize(v: usize) -> Self;

    /// Widen to i64 for error reporting
    fn to_i64(self) -> i64;
}

impl IndexElement for i64 {
    const DTYPE: DType = DType::I64;
    const MAX_USIZE: usize = i64::MAX as usize;

    #[inline]
    fn to_usize(self) -> Option<usize> {
        usize::try_from(self).ok()
    }

    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as i64
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self
    }
}

impl IndexElement for i32 {
    const DTYPE: DType = DType::I32;
    const MAX_USIZE: usize = i32::MAX as usize;

    #[inline]
    fn to_usize(self) -> Option<usize> {
        usize::try_from(self).ok()
    }

    #[inline]
    fn as_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as i32
    }

    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }
}
