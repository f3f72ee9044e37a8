//! Element trait for mapping Rust value types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Trait for types that can be feature values of an SpMM kernel
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Shared across worker threads
/// - `Pod + Zeroable` - Zero-copy views over caller byte buffers (bytemuck)
/// - `Add + Sub + Mul + Div` - The binary operator set (Output = Self)
/// - `PartialOrd` - Strict comparison for max/min reducers
pub trait Element:
    Copy
    + Send
    + Sync
    + Debug
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for diagnostics and tolerance checks
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    fn from_f64(v: f64) -> Self;

    /// Zero value (additive identity)
    fn zero() -> Self;

    /// Positive infinity, the initial value of a min reduction
    fn infinity() -> Self;

    /// Negative infinity, the initial value of a max reduction
    fn neg_infinity() -> Self;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn infinity() -> Self {
        f64::INFINITY
    }

    #[inline]
    fn neg_infinity() -> Self {
        f64::NEG_INFINITY
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn infinity() -> Self {
        f32::INFINITY
    }

    #[inline]
    fn neg_infinity() -> Self {
        f32::NEG_INFINITY
    }
}
