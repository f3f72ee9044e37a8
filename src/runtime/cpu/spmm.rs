//! CPU implementation of SpMM operations
//!
//! Validation is complete before any output is touched; once a kernel is
//! launched the call cannot fail. COO inputs are segmented by destination
//! column into a CSR-shaped index (stable, so list order is kept within a
//! destination) and then reduced by the same kernels as CSR.

use super::CpuClient;
use super::kernels::{spmm_cmp_csr_kernel, spmm_sum_csr_kernel};
use crate::dispatch_spmm_op;
use crate::dtype::{Element, IndexElement};
use crate::error::{Error, Result};
use crate::ops::{BroadcastPlan, MaxReducer, MinReducer, ReduceOp, SpmmOp, SpmmOps};
use crate::sparse::{CooGraph, CsrGraph, SparseFormat, SparseStorage};
use crate::tensor::{TensorView, TensorViewMut};

/// Node and edge extents of one call
///
/// Sources index `ufeat`, destinations index `out`.
#[derive(Clone, Copy, Debug)]
struct Extents {
    format: SparseFormat,
    num_src: usize,
    num_dst: usize,
    nnz: usize,
}

impl Extents {
    fn of_csr<I: IndexElement>(csr: &CsrGraph<'_, I>) -> Self {
        let [nrows, ncols] = csr.shape();
        Self {
            format: SparseFormat::Csr,
            num_src: ncols,
            num_dst: nrows,
            nnz: csr.nnz(),
        }
    }

    fn of_coo<I: IndexElement>(coo: &CooGraph<'_, I>) -> Self {
        let [nrows, ncols] = coo.shape();
        Self {
            format: SparseFormat::Coo,
            num_src: nrows,
            num_dst: ncols,
            nnz: coo.nnz(),
        }
    }
}

/// Full expected shape `[leading, feature...]`
fn full_shape(leading: usize, feature: &[usize]) -> Vec<usize> {
    std::iter::once(leading).chain(feature.iter().copied()).collect()
}

fn check_leading_dim<T: Copy>(view: &TensorView<'_, T>, expected: usize) -> Result<()> {
    if view.leading_dim() != expected {
        return Err(Error::shape_mismatch(
            &full_shape(expected, view.feature_shape()),
            view.shape(),
        ));
    }
    Ok(())
}

/// Validate every operand of a call and plan its broadcast
fn validate_spmm<I: IndexElement, T: Element>(
    ext: Extents,
    op: SpmmOp,
    reduce: ReduceOp,
    ufeat: Option<&TensorView<'_, T>>,
    efeat: Option<&TensorView<'_, T>>,
    out: &TensorViewMut<'_, T>,
    out_aux: &[TensorViewMut<'_, I>],
) -> Result<BroadcastPlan> {
    if op.uses_lhs() && ufeat.is_none() {
        return Err(Error::MissingOperand {
            op: op.name(),
            operand: "ufeat",
        });
    }
    if op.uses_rhs() && efeat.is_none() {
        return Err(Error::MissingOperand {
            op: op.name(),
            operand: "efeat",
        });
    }

    if let Some(ufeat) = ufeat {
        check_leading_dim(ufeat, ext.num_src)?;
    }
    if let Some(efeat) = efeat {
        check_leading_dim(efeat, ext.nnz)?;
    }

    let lhs_shape = ufeat.map_or(&[][..], |t| t.feature_shape());
    let rhs_shape = efeat.map_or(&[][..], |t| t.feature_shape());
    let plan = BroadcastPlan::new(op, lhs_shape, rhs_shape)?;

    let expected_out = full_shape(ext.num_dst, plan.out_shape());
    if out.leading_dim() != ext.num_dst || out.row_len() != plan.out_len() {
        return Err(Error::shape_mismatch(&expected_out, out.shape()));
    }

    if reduce.tracks_args() {
        if out_aux.len() != 2 {
            return Err(Error::invalid_argument(
                "out_aux",
                format!(
                    "{reduce} needs exactly 2 aux tensors (arg_u, arg_e), got {}",
                    out_aux.len()
                ),
            ));
        }
        for aux in out_aux {
            if aux.shape() != out.shape() {
                return Err(Error::shape_mismatch(out.shape(), aux.shape()));
            }
        }
    }

    Ok(plan)
}

/// Split validated aux views into `(arg_u, arg_e)`
fn aux_pair<'s, I: IndexElement>(
    out_aux: &'s mut [TensorViewMut<'_, I>],
) -> Result<(&'s mut [I], &'s mut [I])> {
    let count = out_aux.len();
    match out_aux {
        [arg_u, arg_e] => Ok((arg_u.as_mut_slice(), arg_e.as_mut_slice())),
        _ => Err(Error::invalid_argument(
            "out_aux",
            format!("expected 2 aux tensors, got {count}"),
        )),
    }
}

/// Route a validated call to the kernel for `(op, reduce)`
#[allow(clippy::too_many_arguments)]
fn launch<I: IndexElement, T: Element>(
    client: &CpuClient,
    op: SpmmOp,
    reduce: ReduceOp,
    plan: &BroadcastPlan,
    csr: &CsrGraph<'_, I>,
    ufeat: Option<&TensorView<'_, T>>,
    efeat: Option<&TensorView<'_, T>>,
    out: &mut TensorViewMut<'_, T>,
    out_aux: &mut [TensorViewMut<'_, I>],
) -> Result<()> {
    let lhs = ufeat.map_or(&[][..], |t| t.as_slice());
    let rhs = efeat.map_or(&[][..], |t| t.as_slice());
    let out = out.as_mut_slice();

    match reduce {
        ReduceOp::Sum => dispatch_spmm_op!(op, F => {
            spmm_sum_csr_kernel::<I, T, F>(client, plan, csr, lhs, rhs, out);
        }),
        ReduceOp::Max => {
            let (arg_u, arg_e) = aux_pair(out_aux)?;
            dispatch_spmm_op!(op, F => {
                spmm_cmp_csr_kernel::<I, T, F, MaxReducer>(
                    client, plan, csr, lhs, rhs, out, arg_u, arg_e,
                );
            })
        }
        ReduceOp::Min => {
            let (arg_u, arg_e) = aux_pair(out_aux)?;
            dispatch_spmm_op!(op, F => {
                spmm_cmp_csr_kernel::<I, T, F, MinReducer>(
                    client, plan, csr, lhs, rhs, out, arg_u, arg_e,
                );
            })
        }
    }
    Ok(())
}

fn log_dispatch<I: IndexElement, T: Element>(
    ext: Extents,
    op: SpmmOp,
    reduce: ReduceOp,
    plan: &BroadcastPlan,
) {
    log::debug!(
        "spmm {}: op={} reduce={} index={} value={} src={} dst={} nnz={} out_feat={:?} bcast={}",
        ext.format,
        op,
        reduce,
        I::DTYPE,
        T::DTYPE,
        ext.num_src,
        ext.num_dst,
        ext.nnz,
        plan.out_shape(),
        plan.use_bcast(),
    );
}

impl SpmmOps for CpuClient {
    fn spmm_csr_with<I: IndexElement, T: Element>(
        &self,
        op: SpmmOp,
        reduce: ReduceOp,
        csr: &CsrGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()> {
        let ext = Extents::of_csr(csr);
        let plan = validate_spmm(ext, op, reduce, ufeat, efeat, out, out_aux)?;
        log_dispatch::<I, T>(ext, op, reduce, &plan);
        launch(self, op, reduce, &plan, csr, ufeat, efeat, out, out_aux)
    }

    fn spmm_coo_with<I: IndexElement, T: Element>(
        &self,
        op: SpmmOp,
        reduce: ReduceOp,
        coo: &CooGraph<'_, I>,
        ufeat: Option<&TensorView<'_, T>>,
        efeat: Option<&TensorView<'_, T>>,
        out: &mut TensorViewMut<'_, T>,
        out_aux: &mut [TensorViewMut<'_, I>],
    ) -> Result<()> {
        let ext = Extents::of_coo(coo);
        let plan = validate_spmm(ext, op, reduce, ufeat, efeat, out, out_aux)?;
        log_dispatch::<I, T>(ext, op, reduce, &plan);

        // Destination-major view: row c lists the entries with col_ids == c,
        // with the entry's row id as the source.
        let segments = coo.segment_by_col();
        launch(self, op, reduce, &plan, &segments, ufeat, efeat, out, out_aux)
    }
}
