//! Reducers aggregating all contributions arriving at one destination slot

use crate::dtype::Element;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Reduction policy of an SpMM call
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    /// Sum of contributions; no provenance
    Sum,
    /// Maximum contribution, recording which (node, edge) attained it
    Max,
    /// Minimum contribution, recording which (node, edge) attained it
    Min,
}

impl ReduceOp {
    /// All supported reducers
    pub const ALL: [ReduceOp; 3] = [ReduceOp::Sum, ReduceOp::Max, ReduceOp::Min];

    /// Canonical reducer name
    pub const fn name(self) -> &'static str {
        match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Max => "max",
            ReduceOp::Min => "min",
        }
    }

    /// Whether this reducer writes the `arg_u` / `arg_e` index pair
    #[inline]
    pub const fn tracks_args(self) -> bool {
        matches!(self, ReduceOp::Max | ReduceOp::Min)
    }

    /// Value of a slot that received no contributions
    ///
    /// - sum → 0
    /// - max → -∞
    /// - min → +∞
    pub fn identity<T: Element>(self) -> T {
        match self {
            ReduceOp::Sum => T::zero(),
            ReduceOp::Max => MaxReducer::identity(),
            ReduceOp::Min => MinReducer::identity(),
        }
    }
}

impl FromStr for ReduceOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(ReduceOp::Sum),
            "max" => Ok(ReduceOp::Max),
            "min" => Ok(ReduceOp::Min),
            other => Err(Error::UnsupportedReducer(other.to_string())),
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extremal reducer with provenance
///
/// A contribution replaces the running value only on strict improvement,
/// so among equal values the first one in traversal order is kept. NaN never
/// compares as an improvement.
pub trait CmpReducer: Send + Sync + 'static {
    /// The runtime tag of this reducer
    const OP: ReduceOp;

    /// Initial running value
    fn identity<T: Element>() -> T;

    /// True when `val` strictly improves on `acc`
    fn improves<T: Element>(acc: T, val: T) -> bool;
}

/// Running maximum
pub struct MaxReducer;
/// Running minimum
pub struct MinReducer;

impl CmpReducer for MaxReducer {
    const OP: ReduceOp = ReduceOp::Max;

    #[inline(always)]
    fn identity<T: Element>() -> T {
        T::neg_infinity()
    }

    #[inline(always)]
    fn improves<T: Element>(acc: T, val: T) -> bool {
        val > acc
    }
}

impl CmpReducer for MinReducer {
    const OP: ReduceOp = ReduceOp::Min;

    #[inline(always)]
    fn identity<T: Element>() -> T {
        T::infinity()
    }

    #[inline(always)]
    fn improves<T: Element>(acc: T, val: T) -> bool {
        val < acc
    }
}
