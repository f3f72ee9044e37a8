//! CPU runtime implementation
//!
//! Kernels run row-parallel on rayon when the `rayon` feature is enabled
//! (the default) and sequentially otherwise. Every destination row is
//! computed by a single task in a fixed order, so results are identical
//! for any thread count.

mod client;
pub(crate) mod kernels;
mod spmm;

pub use client::{CpuClient, ParallelismConfig};
