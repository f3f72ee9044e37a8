//! Sparse format definitions and traits

use crate::dtype::DType;

/// Sparse adjacency storage format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    /// Coordinate format (COO)
    ///
    /// Stores explicit (row, col) pairs in arbitrary order.
    /// SpMM destination axis: columns.
    Coo,

    /// Compressed Sparse Row (CSR)
    ///
    /// Row pointers + column indices.
    /// SpMM destination axis: rows.
    Csr,
}

impl SparseFormat {
    /// Returns the format name as a string
    pub fn name(&self) -> &'static str {
        match self {
            SparseFormat::Coo => "COO",
            SparseFormat::Csr => "CSR",
        }
    }
}

impl std::fmt::Display for SparseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trait for sparse adjacency structures
///
/// Common interface of [`CsrGraph`](super::CsrGraph) and
/// [`CooGraph`](super::CooGraph).
pub trait SparseStorage {
    /// Returns the sparse format type
    fn format(&self) -> SparseFormat;

    /// Returns the shape as [nrows, ncols]
    fn shape(&self) -> [usize; 2];

    /// Returns the number of rows
    #[inline]
    fn nrows(&self) -> usize {
        self.shape()[0]
    }

    /// Returns the number of columns
    #[inline]
    fn ncols(&self) -> usize {
        self.shape()[1]
    }

    /// Returns the number of stored entries (edges)
    fn nnz(&self) -> usize;

    /// Returns the data type of the index arrays
    fn index_dtype(&self) -> DType;

    /// Returns true if an explicit edge-id mapping is stored
    fn has_edge_ids(&self) -> bool;

    /// Returns true if there are no edges
    #[inline]
    fn is_empty(&self) -> bool {
        self.nnz() == 0
    }
}
