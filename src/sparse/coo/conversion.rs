//! COO format conversion: to_csr, segment_by_col
//!
//! Both conversions are a stable counting sort on one key, O(nnz + n):
//! entries that share a key keep their original relative order, and the
//! original edge id of every entry travels along as the CSR edge-id mapping.
//! Duplicate entries are kept, not summed.

use std::borrow::Cow;

use super::CooGraph;
use crate::dtype::IndexElement;
use crate::sparse::{CsrGraph, SparseStorage};

/// Group entries by `keys`, returning (pointers, permutation)
///
/// `ptrs[k]..ptrs[k+1]` indexes into `perm`, which lists the original
/// positions carrying key `k` in ascending order.
fn stable_group<I: IndexElement>(keys: &[I], num_keys: usize) -> (Vec<I>, Vec<usize>) {
    let mut counts = vec![0usize; num_keys + 1];
    for &key in keys {
        counts[key.as_usize() + 1] += 1;
    }
    for k in 1..=num_keys {
        counts[k] += counts[k - 1];
    }
    let ptrs: Vec<I> = counts.iter().map(|&c| I::from_usize(c)).collect();

    let mut cursor = counts;
    let mut perm = vec![0usize; keys.len()];
    for (pos, &key) in keys.iter().enumerate() {
        let slot = &mut cursor[key.as_usize()];
        perm[*slot] = pos;
        *slot += 1;
    }
    (ptrs, perm)
}

impl<I: IndexElement> CooGraph<'_, I> {
    /// Convert to CSR keyed by row
    ///
    /// Entries within a row stay in original list order. The result always
    /// carries an edge-id mapping back to the COO edge ids.
    pub fn to_csr(&self) -> CsrGraph<'static, I> {
        let [nrows, _ncols] = self.shape;
        self.group_into_csr(&self.row_ids, &self.col_ids, nrows, self.shape)
    }

    /// Convert to a destination-major CSR keyed by column
    ///
    /// Row `c` of the result lists the entries whose column id is `c`, with
    /// the entry's row id as the CSR column index, in original list order.
    /// The result has shape [ncols, nrows]. This is the segmentation step
    /// of the COO SpMM engine, which aggregates by column.
    pub fn segment_by_col(&self) -> CsrGraph<'static, I> {
        let [nrows, ncols] = self.shape;
        self.group_into_csr(&self.col_ids, &self.row_ids, ncols, [ncols, nrows])
    }

    fn group_into_csr(
        &self,
        keys: &[I],
        others: &[I],
        num_keys: usize,
        shape: [usize; 2],
    ) -> CsrGraph<'static, I> {
        let (ptrs, perm) = stable_group(keys, num_keys);
        let indices: Vec<I> = perm.iter().map(|&pos| others[pos]).collect();
        let edge_ids: Vec<I> = perm
            .iter()
            .map(|&pos| I::from_usize(self.edge_id(pos)))
            .collect();

        log::trace!(
            "grouped {} COO entries into {} segments (shape {:?})",
            self.nnz(),
            num_keys,
            shape
        );

        CsrGraph {
            row_ptrs: Cow::Owned(ptrs),
            col_indices: Cow::Owned(indices),
            edge_ids: Some(Cow::Owned(edge_ids)),
            shape,
        }
    }
}
