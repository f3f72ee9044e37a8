//! Core COO implementation: struct, creation, getters

use std::borrow::Cow;

use crate::dtype::{DType, IndexElement};
use crate::error::{Error, Result};
use crate::sparse::validate::{check_edge_ids, check_index_bounds, check_representable};

use super::super::format::{SparseFormat, SparseStorage};

/// COO (Coordinate) adjacency structure
///
/// Entry `k` is an edge `row_ids[k] → col_ids[k]` with edge id
/// `edge_ids[k]` (or `k` when no mapping is stored). Entries are in no
/// particular order and may repeat.
#[derive(Debug, Clone)]
pub struct CooGraph<'a, I: IndexElement> {
    pub(crate) row_ids: Cow<'a, [I]>,
    pub(crate) col_ids: Cow<'a, [I]>,
    pub(crate) edge_ids: Option<Cow<'a, [I]>>,
    pub(crate) shape: [usize; 2],
}

impl<'a, I: IndexElement> CooGraph<'a, I> {
    /// Create a new COO structure from components
    ///
    /// # Arguments
    ///
    /// * `row_ids` - Row id of each entry
    /// * `col_ids` - Column id of each entry
    /// * `shape` - Matrix shape [nrows, ncols]
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Arrays have different lengths
    /// - Ids are out of bounds
    pub fn new(
        row_ids: impl Into<Cow<'a, [I]>>,
        col_ids: impl Into<Cow<'a, [I]>>,
        shape: [usize; 2],
    ) -> Result<Self> {
        let row_ids = row_ids.into();
        let col_ids = col_ids.into();
        let [nrows, ncols] = shape;

        if row_ids.len() != col_ids.len() {
            return Err(Error::shape_mismatch(&[row_ids.len()], &[col_ids.len()]));
        }
        check_representable::<I>("nnz", row_ids.len())?;
        check_index_bounds(&row_ids, nrows)?;
        check_index_bounds(&col_ids, ncols)?;

        Ok(Self {
            row_ids,
            col_ids,
            edge_ids: None,
            shape,
        })
    }

    /// Attach an edge-id mapping (entry position → edge id)
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

    /// Create a COO structure with no entries
    pub fn empty(shape: [usize; 2]) -> Self {
        Self {
            row_ids: Cow::Owned(Vec::new()),
            col_ids: Cow::Owned(Vec::new()),
            edge_ids: None,
            shape,
        }
    }

    /// Returns the row ids
    pub fn row_ids(&self) -> &[I] {
        &self.row_ids
    }

    /// Returns the column ids
    pub fn col_ids(&self) -> &[I] {
        &self.col_ids
    }

    /// Returns the edge-id mapping, if any
    pub fn edge_ids(&self) -> Option<&[I]> {
        self.edge_ids.as_deref()
    }

    /// Edge id of the entry at position `pos`
    #[inline(always)]
    pub(crate) fn edge_id(&self, pos: usize) -> usize {
        match &self.edge_ids {
            Some(ids) => ids[pos].as_usize(),
            None => pos,
        }
    }
}

impl<I: IndexElement> SparseStorage for CooGraph<'_, I> {
    fn format(&self) -> SparseFormat {
        SparseFormat::Coo
    }

    fn shape(&self) -> [usize; 2] {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.row_ids.len()
    }

    fn index_dtype(&self) -> DType {
        I::DTYPE
    }

    fn has_edge_ids(&self) -> bool {
        self.edge_ids.is_some()
    }
}
