//! SpMM operator algebra
//!
//! A generalized SpMM computes, for every destination `d`,
//!
//! ```text
//! out[d] = ⊕_{(src, e) → d}  ufeat[src] ⊗ efeat[e]
//! ```
//!
//! where ⊗ is a [`SpmmOp`] and ⊕ is a [`ReduceOp`]. Both are closed
//! enumerations resolved once per call to monomorphized functor types
//! ([`BinaryFunctor`], [`CmpReducer`]); the two feature operands are aligned
//! by a [`BroadcastPlan`].
//!
//! The operation itself is exposed through the [`SpmmOps`] trait, implemented
//! by backend clients (see `runtime::cpu::CpuClient`).

mod binary;
mod broadcast;
mod reduce;
pub mod traits;

pub use binary::{
    AddFn, BinaryFunctor, CopyLhsFn, CopyRhsFn, DivFn, MulFn, SpmmOp, SubFn,
};
pub use broadcast::{BroadcastPlan, broadcast_shapes};
pub use reduce::{CmpReducer, MaxReducer, MinReducer, ReduceOp};
pub use traits::SpmmOps;
