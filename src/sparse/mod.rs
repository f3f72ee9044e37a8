//! Sparse adjacency structures for SpMM
//!
//! Two formats are supported, and each has its own destination axis:
//!
//! - **CSR** (Compressed Sparse Row): row pointers + column indices. SpMM
//!   aggregates into rows; `ufeat` is indexed by column.
//!
//! - **COO** (Coordinate): parallel row/column id arrays in arbitrary order.
//!   SpMM aggregates into columns; `ufeat` is indexed by row.
//!
//! The asymmetry is a contract with the graph layer above, which picks the
//! format whose destination axis matches the message direction.
//!
//! Both formats optionally carry an edge-id mapping from storage position to
//! edge id, which selects `efeat` rows and is what `arg_e` records.
//!
//! # Usage
//!
//! ```
//! use gspmm::sparse::{CooGraph, CsrGraph, SparseStorage};
//!
//! // 3 destinations, 2 sources; row 0 has no incoming edges
//! let row_ptrs = [0i64, 0, 2, 3];
//! let col_indices = [0i64, 1, 0];
//! let csr = CsrGraph::new(&row_ptrs[..], &col_indices[..], [3, 2])?;
//! assert_eq!(csr.nnz(), 3);
//!
//! let coo = CooGraph::new(vec![1i32, 0], vec![0i32, 0], [2, 1])?;
//! let grouped = coo.segment_by_col();
//! assert_eq!(grouped.row_ptrs(), &[0, 2]);
//! # Ok::<(), gspmm::error::Error>(())
//! ```

mod coo;
mod csr;
mod format;
pub(crate) mod validate;

pub use coo::CooGraph;
pub use csr::CsrGraph;
pub use format::{SparseFormat, SparseStorage};
