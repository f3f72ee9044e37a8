//! Generalized SpMM operations trait.

use crate::dtype::{Element, IndexElement};
use crate::error::Result;
use crate::ops::{ReduceOp, SpmmOp};
use crate::sparse::{CooGraph, CsrGraph};
use crate::tensor::{TensorView, TensorViewMut};

/// Generalized sparse-dense matrix multiplication
///
/// For every destination `d`, computes
///
/// ```text
/// out[d] = reduce over edges (src, e) into d of  op(ufeat[src], efeat[e])
/// ```
///
/// The destination axis depends on the format: CSR aggregates into rows
/// (`ufeat` is indexed by column), COO aggregates into columns (`ufeat` is
/// indexed by row).
///
/// # Operands
///
/// * `ufeat` - Source-node features, leading dim = number of sources.
///   Required unless `op` is `copy_rhs`.
/// * `efeat` - Edge features, leading dim = nnz, indexed by edge id.
///   Required unless `op` is `copy_lhs`.
/// * `out` - Destination features, leading dim = number of destinations,
///   trailing shape = broadcast of the used operands' feature shapes.
///   Fully overwritten.
/// * `out_aux` - For `max`/`min`: exactly two views shaped like `out`,
///   `[arg_u, arg_e]`. Each slot receives the source id and edge id of the
///   winning contribution; slots with no contribution keep their prior
///   contents. Ignored for `sum`.
///
/// Ties go to the first contribution in traversal order. Destinations with
/// no incoming edges receive 0 for `sum` and ∓∞ for `max`/`min`.
///
/// # Errors
///
/// All validation happens before any output is written:
///
/// - [`Error::UnsupportedReducer`] / [`Error::UnsupportedOperator`] for
///   unknown names
/// - [`Error::MissingOperand`] if a required operand is absent
/// - [`Error::ShapeMismatch`] for wrong leading dims, output shape, or aux
///   count/shape
/// - [`Error::BroadcastError`] if the feature shapes do not broadcast
///
/// [`Error::UnsupportedReducer`]: crate::error::Error::UnsupportedReducer
/// [`Error::UnsupportedOperator`]: crate::error::Error::UnsupportedOperator
/// [`Error::MissingOperand`]: crate::error::Error::MissingOperand
/// [`Error::ShapeMismatch`]: crate::error::Error::ShapeMismatch
/// [`Error::BroadcastError`]: crate::error::Error::BroadcastError
///
/// # Example
///
/// ```
/// use gspmm::prelude::*;
///
/// let client = CpuClient::new();
/// // 3 destinations, 2 sources: row 0 ← col 0, row 1 ← cols 0 and 1
/// let csr = CsrGraph::new(vec![0i64, 1, 3, 3], vec![0i64, 0, 1], [3, 2])?;
/// let ufeat_data = [1.0f32, 2.0];
/// let ufeat = TensorView::new(&ufeat_data, &[2, 1])?;
///
/// let mut out_data = [0.0f32; 3];
/// let mut out = TensorViewMut::new(&mut out_data, &[3, 1])?;
/// client.spmm_csr("copy_lhs", "sum", &csr, Some(&ufeat), None, &mut out, &mut [])?;
///
/// assert_eq!(out_data, [1.0, 3.0, 0.0]);
/// # Ok::<(), gspmm::error::Error>(())
/// ```
pub trait SpmmOps {
    /// SpMM over a CSR graph, with operator and reducer given by name
    #[allow(clippy::too_many_arguments)]
    fn spmm_csr<I: IndexElement, T: Element>(
        &self,
        op: &str,
        reduce: &str,
        csr: &CsrGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()> {
        let reduce: ReduceOp = reduce.parse()?;
        let op: SpmmOp = op.parse()?;
        self.spmm_csr_with(op, reduce, csr, ufeat, efeat, out, out_aux)
    }

    /// SpMM over a COO graph, with operator and reducer given by name
    #[allow(clippy::too_many_arguments)]
    fn spmm_coo<I: IndexElement, T: Element>(
        &self,
        op: &str,
        reduce: &str,
        coo: &CooGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()> {
        let reduce: ReduceOp = reduce.parse()?;
        let op: SpmmOp = op.parse()?;
        self.spmm_coo_with(op, reduce, coo, ufeat, efeat, out, out_aux)
    }

    /// SpMM over a CSR graph with an already-resolved operator and reducer
    #[allow(clippy::too_many_arguments)]
    fn spmm_csr_with<I: IndexElement, T: Element>(
        &self,
        op: SpmmOp,
        reduce: ReduceOp,
        csr: &CsrGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()>;

    /// SpMM over a COO graph with an already-resolved operator and reducer
    #[allow(clippy::too_many_arguments)]
    fn spmm_coo_with<I: IndexElement, T: Element>(
        &self,
        op: SpmmOp,
        reduce: ReduceOp,
        coo: &CooGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()>;
}
