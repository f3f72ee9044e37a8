//! Structural validation shared by the sparse formats

use crate::dtype::IndexElement;
use crate::error::{Error, Result};

/// Check every index lies in `[0, bound)`
pub(crate) fn check_index_bounds<I: IndexElement>(indices: &[I], bound: usize) -> Result<()> {
    for &idx in indices {
        match idx.to_usize() {
            Some(v) if v < bound => {}
            _ => {
                return Err(Error::IndexOutOfBounds {
                    index: idx.to_i64(),
                    size: bound,
                });
            }
        }
    }
    Ok(())
}

/// Check an edge-id mapping has one in-range id per stored entry
pub(crate) fn check_edge_ids<I: IndexElement>(edge_ids: &[I], nnz: usize) -> Result<()> {
    if edge_ids.len() != nnz {
        return Err(Error::shape_mismatch(&[nnz], &[edge_ids.len()]));
    }
    check_index_bounds(edge_ids, nnz)
}

/// Check a dimension and an entry count are representable by the index type
pub(crate) fn check_representable<I: IndexElement>(
    arg: &'static str,
    value: usize,
) -> Result<()> {
    if value > I::MAX_USIZE {
        return Err(Error::invalid_argument(
            arg,
            format!("{} does not fit in {} indices", value, I::DTYPE),
        ));
    }
    Ok(())
}
