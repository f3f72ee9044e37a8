//! Core CSR implementation: struct, creation, getters

use std::borrow::Cow;
use std::ops::Range;

use crate::dtype::{DType, IndexElement};
use crate::error::{Error, Result};
use crate::sparse::validate::{check_edge_ids, check_index_bounds, check_representable};

use super::super::format::{SparseFormat, SparseStorage};

/// CSR (Compressed Sparse Row) adjacency structure
///
/// Entry `p` in `[row_ptrs[r], row_ptrs[r+1])` is an edge from column
/// `col_indices[p]` into row `r`. Its edge id is `edge_ids[p]` when an
/// edge-id mapping is present, otherwise `p`.
///
/// Index arrays are borrowed when built from caller slices and owned when
/// produced by a conversion.
#[derive(Debug, Clone)]
pub struct CsrGraph<'a, I: IndexElement> {
    pub(crate) row_ptrs: Cow<'a, [I]>,
    pub(crate) col_indices: Cow<'a, [I]>,
    pub(crate) edge_ids: Option<Cow<'a, [I]>>,
    pub(crate) shape: [usize; 2],
}

impl<'a, I: IndexElement> CsrGraph<'a, I> {
    /// Create a new CSR structure from components
    ///
    /// # Arguments
    ///
    /// * `row_ptrs` - Row pointers (length: nrows + 1)
    /// * `col_indices` - Column index of each entry (length: nnz)
    /// * `shape` - Matrix shape [nrows, ncols]
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - row_ptrs length != nrows + 1
    /// - row_ptrs does not start at 0, decreases, or does not end at nnz
    /// - any column index is outside `[0, ncols)`
    pub fn new(
        row_ptrs: impl Into<Cow<'a, [I]>>,
        col_indices: impl Into<Cow<'a, [I]>>,
        shape: [usize; 2],
    ) -> Result<Self> {
        let row_ptrs = row_ptrs.into();
        let col_indices = col_indices.into();
        let [nrows, ncols] = shape;
        let nnz = col_indices.len();

        if row_ptrs.len() != nrows + 1 {
            return Err(Error::shape_mismatch(&[nrows + 1], &[row_ptrs.len()]));
        }
        check_representable::<I>("nnz", nnz)?;
        check_representable::<I>("ncols", ncols)?;

        let mut prev = 0usize;
        for (r, &ptr) in row_ptrs.iter().enumerate() {
            let ptr = ptr.to_usize().ok_or_else(|| {
                Error::invalid_argument("row_ptrs", format!("negative offset at row {}", r))
            })?;
            if r == 0 && ptr != 0 {
                return Err(Error::invalid_argument(
                    "row_ptrs",
                    format!("must start at 0, got {}", ptr),
                ));
            }
            if ptr < prev {
                return Err(Error::invalid_argument(
                    "row_ptrs",
                    format!("offsets decrease at row {} ({} < {})", r, ptr, prev),
                ));
            }
            prev = ptr;
        }
        if prev != nnz {
            return Err(Error::invalid_argument(
                "row_ptrs",
                format!("last offset {} != nnz {}", prev, nnz),
            ));
        }

        check_index_bounds(&col_indices, ncols)?;

        Ok(Self {
            row_ptrs,
            col_indices,
            edge_ids: None,
            shape,
        })
    }

    /// Attach an edge-id mapping (storage position → edge id)
    ///
    /// Edge ids select the `efeat` row of each entry and are what `arg_e`
    /// records.
    ///
    /// # Errors
    ///
    /// Returns error if the mapping length differs from nnz or an id is
    /// outside `[0, nnz)`.
    pub fn with_edge_ids(mut self, edge_ids: impl Into<Cow<'a, [I]>>) -> Result<Self> {
        let edge_ids = edge_ids.into();
        check_edge_ids(&edge_ids, self.nnz())?;
        self.edge_ids = Some(edge_ids);
        Ok(self)
    }

    /// Create a CSR structure with no entries
    pub fn empty(shape: [usize; 2]) -> Self {
        let [nrows, _ncols] = shape;
        Self {
            row_ptrs: Cow::Owned(vec![I::from_usize(0); nrows + 1]),
            col_indices: Cow::Owned(Vec::new()),
            edge_ids: None,
            shape,
        }
    }

    /// Returns the row pointers
    pub fn row_ptrs(&self) -> &[I] {
        &self.row_ptrs
    }

    /// Returns the column indices
    pub fn col_indices(&self) -> &[I] {
        &self.col_indices
    }

    /// Returns the edge-id mapping, if any
    pub fn edge_ids(&self) -> Option<&[I]> {
        self.edge_ids.as_deref()
    }

    /// Returns the number of entries in a specific row
    ///
    /// # Panics
    ///
    /// Panics if row >= nrows
    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_range(row).len()
    }

    /// Storage positions of the entries of `row`
    #[inline(always)]
    pub(crate) fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row].as_usize()..self.row_ptrs[row + 1].as_usize()
    }

    /// Edge id of the entry at storage position `pos`
    #[inline(always)]
    pub(crate) fn edge_id(&self, pos: usize) -> usize {
        match &self.edge_ids {
            Some(ids) => ids[pos].as_usize(),
            None => pos,
        }
    }
}

impl<I: IndexElement> SparseStorage for CsrGraph<'_, I> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Csr
    }

    fn shape(&self) -> [usize; 2] {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    fn index_dtype(&self) -> DType {
        I::DTYPE
    }

    fn has_edge_ids(&self) -> bool {
        self.edge_ids.is_some()
    }
}
