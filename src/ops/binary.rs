//! Element-wise binary operators combining a source-node feature with an edge feature

use crate::dtype::Element;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Binary operator applied per edge: `op(ufeat[src], efeat[edge])`
///
/// This is a closed set. Names are resolved to a variant once at the
/// dispatch boundary and then to a monomorphized [`BinaryFunctor`]; nothing
/// in the per-edge loop branches on the variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpmmOp {
    /// Addition: u + e
    Add,
    /// Subtraction: u - e
    Sub,
    /// Multiplication: u * e
    Mul,
    /// Division: u / e
    Div,
    /// Copy the source-node feature; the edge feature is ignored
    CopyLhs,
    /// Copy the edge feature; the source-node feature is ignored
    CopyRhs,
}

impl SpmmOp {
    /// All supported operators
    pub const ALL: [SpmmOp; 6] = [
        SpmmOp::Add,
        SpmmOp::Sub,
        SpmmOp::Mul,
        SpmmOp::Div,
        SpmmOp::CopyLhs,
        SpmmOp::CopyRhs,
    ];

    /// Canonical operator name
    pub const fn name(self) -> &'static str {
        match self {
            SpmmOp::Add => "add",
            SpmmOp::Sub => "sub",
            SpmmOp::Mul => "mul",
            SpmmOp::Div => "div",
            SpmmOp::CopyLhs => "copy_lhs",
            SpmmOp::CopyRhs => "copy_rhs",
        }
    }

    /// Whether the operator reads the source-node operand (`ufeat`)
    #[inline]
    pub const fn uses_lhs(self) -> bool {
        !matches!(self, SpmmOp::CopyRhs)
    }

    /// Whether the operator reads the edge operand (`efeat`)
    #[inline]
    pub const fn uses_rhs(self) -> bool {
        !matches!(self, SpmmOp::CopyLhs)
    }

    /// Evaluate the operator on one pair of scalars
    ///
    /// Kernels use the monomorphized functors instead; this is the reference
    /// semantics they must agree with.
    #[inline]
    pub fn apply<T: Element>(self, lhs: T, rhs: T) -> T {
        match self {
            SpmmOp::Add => AddFn::call(lhs, rhs),
            SpmmOp::Sub => SubFn::call(lhs, rhs),
            SpmmOp::Mul => MulFn::call(lhs, rhs),
            SpmmOp::Div => DivFn::call(lhs, rhs),
            SpmmOp::CopyLhs => CopyLhsFn::call(lhs, rhs),
            SpmmOp::CopyRhs => CopyRhsFn::call(lhs, rhs),
        }
    }
}

impl FromStr for SpmmOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(SpmmOp::Add),
            "sub" => Ok(SpmmOp::Sub),
            "mul" => Ok(SpmmOp::Mul),
            "div" => Ok(SpmmOp::Div),
            "copy_lhs" => Ok(SpmmOp::CopyLhs),
            "copy_rhs" => Ok(SpmmOp::CopyRhs),
            other => Err(Error::UnsupportedOperator(other.to_string())),
        }
    }
}

impl fmt::Display for SpmmOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile-time binary operator used inside traversal kernels
pub trait BinaryFunctor: Send + Sync + 'static {
    /// The runtime tag of this functor
    const OP: SpmmOp;
    /// Reads `ufeat`
    const USE_LHS: bool = Self::OP.uses_lhs();
    /// Reads `efeat`
    const USE_RHS: bool = Self::OP.uses_rhs();

    /// Combine one scalar of each operand
    fn call<T: Element>(lhs: T, rhs: T) -> T;
}

/// `u + e`
pub struct AddFn;
/// `u - e`
pub struct SubFn;
/// `u * e`
pub struct MulFn;
/// `u / e`
pub struct DivFn;
/// `u`
pub struct CopyLhsFn;
/// `e`
pub struct CopyRhsFn;

impl BinaryFunctor for AddFn {
    const OP: SpmmOp = SpmmOp::Add;

    #[inline(always)]
    fn call<T: Element>(lhs: T, rhs: T) -> T {
        lhs + rhs
    }
}

impl BinaryFunctor for SubFn {
    const OP: SpmmOp = SpmmOp::Sub;

    #[inline(always)]
    fn call<T: Element>(lhs: T, rhs: T) -> T {
        lhs - rhs
    }
}

impl BinaryFunctor for MulFn {
    const OP: SpmmOp = SpmmOp::Mul;

    #[inline(always)]
    fn call<T: Element>(lhs: T, rhs: T) -> T {
        lhs * rhs
    }
}

impl BinaryFunctor for DivFn {
    const OP: SpmmOp = SpmmOp::Div;

    #[inline(always)]
    fn call<T: Element>(lhs: T, rhs: T) -> T {
        lhs / rhs
    }
}

impl BinaryFunctor for CopyLhsFn {
    const OP: SpmmOp = SpmmOp::CopyLhs;

    #[inline(always)]
    fn call<T: Element>(lhs: T, _rhs: T) -> T {
        lhs
    }
}

impl BinaryFunctor for CopyRhsFn {
    const OP: SpmmOp = SpmmOp::CopyRhs;

    #[inline(always)]
    fn call<T: Element>(_lhs: T, rhs: T) -> T {
        rhs
    }
}

/// Bind `$F` to the functor type for an [`SpmmOp`] value and run `$body`.
///
/// ```ignore
/// dispatch_spmm_op!(op, F => {
///     kernel::<I, T, F>(...)
/// })
/// ```
#[macro_export]
macro_rules! dispatch_spmm_op {
    ($op:expr, $F:ident => $body:block) => {
        match $op {
            $crate::ops::SpmmOp::Add => {
                type $F = $crate::ops::AddFn;
                $body
            }
            $crate::ops::SpmmOp::Sub => {
                type $F = $crate::ops::SubFn;
                $body
            }
            $crate::ops::SpmmOp::Mul => {
                type $F = $crate::ops::MulFn;
                $body
            }
            $crate::ops::SpmmOp::Div => {
                type $F = $crate::ops::DivFn;
                $body
            }
            $crate::ops::SpmmOp::CopyLhs => {
                type $F = $crate::ops::CopyLhsFn;
                $body
            }
            $crate::ops::SpmmOp::CopyRhs => {
                type $F = $crate::ops::CopyRhsFn;
                $body
            }
        }
    };
}
