//! Runtime backends for SpMM computation
//!
//! ```text
//! SpmmOps (ops::traits)
//! └── CpuClient (dispatch, validation, thread pool)
//!     └── kernels (monomorphized row-parallel traversal)
//! ```

pub mod cpu;
