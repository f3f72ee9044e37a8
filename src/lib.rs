//! # gspmm
//!
//! **Generalized sparse-dense matrix multiplication (SpMM) for graph message passing.**
//!
//! For every destination node `d` of a sparse graph, gspmm computes
//!
//! ```text
//! out[d] = reduce over edges (src, e) into d of  op(ufeat[src], efeat[e])
//! ```
//!
//! where `op` is one of `add`, `sub`, `mul`, `div`, `copy_lhs`, `copy_rhs` and
//! `reduce` is one of `sum`, `max`, `min`. Max/min additionally record which
//! source node and which edge produced each winning value, for use by a
//! backward pass.
//!
//! ## Features
//!
//! - **Sparse formats**: CSR (aggregates into rows) and COO (aggregates into columns)
//! - **Broadcasting**: NumPy-style broadcasting between node and edge feature shapes
//! - **Index provenance**: `arg_u` / `arg_e` for max/min with first-wins ties
//! - **Multiple dtypes**: `i32`/`i64` indices × `f32`/`f64` values
//! - **Deterministic parallelism**: row-parallel on rayon, identical results for any thread count
//!
//! ## Quick Start
//!
//! ```rust
//! use gspmm::prelude::*;
//!
//! // Row r aggregates over its column indices:
//! // row 0 <- (none), row 1 <- cols 0 and 1, row 2 <- col 0
//! let csr = CsrGraph::new(vec![0i64, 0, 2, 3], vec![0i64, 1, 0], [3, 3])?;
//!
//! let u = [1.0f32, 2.0, 3.0];
//! let e = [1.0f32, 1.0, 1.0];
//! let ufeat = TensorView::new(&u, &[3, 1])?;
//! let efeat = TensorView::new(&e, &[3])?;
//!
//! let mut o = [0.0f32; 3];
//! let mut out = TensorViewMut::new(&mut o, &[3, 1])?;
//!
//! let client = CpuClient::new();
//! client.spmm_csr("mul", "sum", &csr, Some(&ufeat), Some(&efeat), &mut out, &mut [])?;
//! assert_eq!(o, [0.0, 3.0, 1.0]);
//! # Ok::<(), gspmm::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): Multi-threaded CPU kernels

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod sparse;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element, IndexElement};
    pub use crate::error::{Error, Result};
    pub use crate::ops::{BroadcastPlan, ReduceOp, SpmmOp, SpmmOps};
    pub use crate::runtime::cpu::{CpuClient, ParallelismConfig};
    pub use crate::sparse::{CooGraph, CsrGraph, SparseFormat, SparseStorage};
    pub use crate::tensor::{TensorView, TensorViewMut};
}
