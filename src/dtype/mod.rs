//! Data type system for SpMM kernels
//!
//! Kernels are specialized at compile time over two independent axes:
//! the value type of feature tensors ([`Element`]: `f32`, `f64`) and the
//! integer width of sparse indices ([`IndexElement`]: `i32`, `i64`).
//! [`DType`] is the runtime tag for either, used in logs and diagnostics.

mod element;
mod index;

pub use element::Element;
pub use index::IndexElement;

use std::fmt;

/// Data type tag for values and indices
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 64-bit floating point
    F64 = 0,
    /// 32-bit floating point (most common)
    F32 = 1,
    /// 64-bit signed integer
    I64 = 10,
    /// 32-bit signed integer
    I32 = 11,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F64 | Self::I64 => 8,
            Self::F32 | Self::I32 => 4,
        }
    }

    /// Short name for display (e.g., "f32", "i64")
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F64 => "f64",
            Self::F32 => "f32",
            Self::I64 => "i64",
            Self::I32 => "i32",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
