//! Operation traits.
//!
//! Implementations are in the backend-specific modules (see `runtime::cpu`).

mod spmm;

pub use spmm::SpmmOps;
