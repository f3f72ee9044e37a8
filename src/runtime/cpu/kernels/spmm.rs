//! SpMM kernels over a destination-major CSR
//!
//! Row `r` of the CSR lists the contributions to destination `r`: position
//! `p` in `row_range(r)` pairs source `col_indices[p]` with edge `edge_id(p)`.
//! Each destination row is owned by exactly one task, so kernels write
//! without synchronization and results do not depend on scheduling.
//!
//! Operands are passed as flat row-major slices. A slice the functor does
//! not read may be empty.

use crate::dtype::{Element, IndexElement};
use crate::ops::{BinaryFunctor, BroadcastPlan, CmpReducer};
use crate::runtime::cpu::CpuClient;
use crate::sparse::CsrGraph;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Feature row `row` of `data`, or nothing if the operand is unused
#[inline(always)]
fn feature_row<T>(data: &[T], row: usize, len: usize, used: bool) -> &[T] {
    if used {
        &data[row * len..(row + 1) * len]
    } else {
        &[]
    }
}

/// Apply `F` at output position `k` through the broadcast plan
#[inline(always)]
fn combine_at<T: Element, F: BinaryFunctor>(
    plan: &BroadcastPlan,
    lhs_row: &[T],
    rhs_row: &[T],
    k: usize,
) -> T {
    let lhs = if F::USE_LHS {
        lhs_row[plan.lhs_offset(k)]
    } else {
        T::zero()
    };
    let rhs = if F::USE_RHS {
        rhs_row[plan.rhs_offset(k)]
    } else {
        T::zero()
    };
    F::call(lhs, rhs)
}

/// Sum-reduce SpMM: `out[r] = Σ_{p ∈ row r} F(ufeat[src(p)], efeat[eid(p)])`
///
/// # Arguments
/// * `plan` - Broadcast plan of the call; `out.len()` must be
///   `csr.nrows() * plan.out_len()`
/// * `ufeat` - Source features, `plan.lhs_len()` values per source
/// * `efeat` - Edge features, `plan.rhs_len()` values per edge id
/// * `out` - Destination features, fully overwritten (0 for empty rows)
pub fn spmm_sum_csr_kernel<I, T, F>(
    client: &CpuClient,
    plan: &BroadcastPlan,
    csr: &CsrGraph<'_, I>,
    ufeat: &[T],
    efeat: &[T],
    out: &mut [T],
) where
    I: IndexElement,
    T: Element,
    F: BinaryFunctor,
{
    let out_len = plan.out_len();
    if out_len == 0 {
        return;
    }

    let row_task = |(row, out_row): (usize, &mut [T])| {
        sum_row::<I, T, F>(plan, csr, ufeat, efeat, row, out_row);
    };

    #[cfg(feature = "rayon")]
    {
        let min_len = client.rayon_min_len();
        client.install_parallelism(|| {
            out.par_chunks_mut(out_len)
                .enumerate()
                .with_min_len(min_len)
                .for_each(row_task);
        });
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = client;
        out.chunks_mut(out_len).enumerate().for_each(row_task);
    }
}

#[inline]
fn sum_row<I, T, F>(
    plan: &BroadcastPlan,
    csr: &CsrGraph<'_, I>,
    ufeat: &[T],
    efeat: &[T],
    row: usize,
    out_row: &mut [T],
) where
    I: IndexElement,
    T: Element,
    F: BinaryFunctor,
{
    out_row.fill(T::zero());
    for pos in csr.row_range(row) {
        let src = csr.col_indices[pos].as_usize();
        let eid = csr.edge_id(pos);
        let lhs_row = feature_row(ufeat, src, plan.lhs_len(), F::USE_LHS);
        let rhs_row = feature_row(efeat, eid, plan.rhs_len(), F::USE_RHS);
        for (k, acc) in out_row.iter_mut().enumerate() {
            *acc = *acc + combine_at::<T, F>(plan, lhs_row, rhs_row, k);
        }
    }
}

/// Compare-reduce SpMM (max/min) with argument tracking
///
/// Every output slot starts at `C::identity()`. A contribution replaces the
/// running value only if it strictly improves it, so ties keep the first
/// contribution in row order and NaN never wins. On replacement `arg_u`
/// receives the source id and `arg_e` the edge id; slots that are never
/// replaced leave `arg_u`/`arg_e` untouched.
///
/// `arg_u` and `arg_e` must have the same length as `out`.
#[allow(clippy::too_many_arguments)]
pub fn spmm_cmp_csr_kernel<I, T, F, C>(
    client: &CpuClient,
    plan: &BroadcastPlan,
    csr: &CsrGraph<'_, I>,
    ufeat: &[T],
    efeat: &[T],
    out: &mut [T],
    arg_u: &mut [I],
    arg_e: &mut [I],
) where
    I: IndexElement,
    T: Element,
    F: BinaryFunctor,
    C: CmpReducer,
{
    let out_len = plan.out_len();
    if out_len == 0 {
        return;
    }

    let row_task =
        |(row, ((out_row, arg_u_row), arg_e_row)): (usize, ((&mut [T], &mut [I]), &mut [I]))| {
            cmp_row::<I, T, F, C>(plan, csr, ufeat, efeat, row, out_row, arg_u_row, arg_e_row);
        };

    #[cfg(feature = "rayon")]
    {
        let min_len = client.rayon_min_len();
        client.install_parallelism(|| {
            out.par_chunks_mut(out_len)
                .zip(arg_u.par_chunks_mut(out_len))
                .zip(arg_e.par_chunks_mut(out_len))
                .enumerate()
                .with_min_len(min_len)
                .for_each(row_task);
        });
    }

    #[cfg(not(feature = "rayon"))]
    {
        let _ = client;
        out.chunks_mut(out_len)
            .zip(arg_u.chunks_mut(out_len))
            .zip(arg_e.chunks_mut(out_len))
            .enumerate()
            .for_each(row_task);
    }
}

#[inline]
#[allow(clippy::too_many_arguments)]
fn cmp_row<I, T, F, C>(
    plan: &BroadcastPlan,
    csr: &CsrGraph<'_, I>,
    ufeat: &[T],
    efeat: &[T],
    row: usize,
    out_row: &mut [T],
    arg_u_row: &mut [I],
    arg_e_row: &mut [I],
) where
    I: IndexElement,
    T: Element,
    F: BinaryFunctor,
    C: CmpReducer,
{
    out_row.fill(C::identity());
    for pos in csr.row_range(row) {
        let src = csr.col_indices[pos];
        let eid = csr.edge_id(pos);
        let lhs_row = feature_row(ufeat, src.as_usize(), plan.lhs_len(), F::USE_LHS);
        let rhs_row = feature_row(efeat, eid, plan.rhs_len(), F::USE_RHS);
        for (k, acc) in out_row.iter_mut().enumerate() {
            let val = combine_at::<T, F>(plan, lhs_row, rhs_row, k);
            if C::improves(*acc, val) {
                *acc = val;
                arg_u_row[k] = src;
                arg_e_row[k] = I::from_usize(eid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{AddFn, CopyLhsFn, MaxReducer, MinReducer, MulFn, SpmmOp};

    // 3 destinations, 2 sources
    // row 0 <- col 0 (e0), col 1 (e1)
    // row 1 <- (none)
    // row 2 <- col 1 (e2)
    fn graph() -> CsrGraph<'static, i64> {
        CsrGraph::new(vec![0i64, 2, 2, 3], vec![0i64, 1, 1], [3, 2]).unwrap()
    }

    #[test]
    fn test_sum_copy_lhs() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::CopyLhs, &[2], &[]).unwrap();
        let ufeat = [1.0f32, 10.0, 2.0, 20.0];
        let mut out = [f32::NAN; 6];
        spmm_sum_csr_kernel::<_, _, CopyLhsFn>(&client, &plan, &graph(), &ufeat, &[], &mut out);
        assert_eq!(out, [3.0, 30.0, 0.0, 0.0, 2.0, 20.0]);
    }

    #[test]
    fn test_sum_mul_broadcast_edge_scalar() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::Mul, &[2], &[1]).unwrap();
        let ufeat = [1.0f64, 2.0, 3.0, 4.0];
        let efeat = [1.0f64, 10.0, 100.0];
        let mut out = [0.0f64; 6];
        spmm_sum_csr_kernel::<_, _, MulFn>(&client, &plan, &graph(), &ufeat, &efeat, &mut out);
        assert_eq!(out, [31.0, 42.0, 0.0, 0.0, 300.0, 400.0]);
    }

    #[test]
    fn test_max_tracks_args() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::Add, &[1], &[1]).unwrap();
        let ufeat = [1.0f32, 5.0];
        let efeat = [0.0f32, -3.0, 1.0];
        let mut out = [0.0f32; 3];
        let mut arg_u = [-1i64; 3];
        let mut arg_e = [-1i64; 3];
        spmm_cmp_csr_kernel::<_, _, AddFn, MaxReducer>(
            &client, &plan, &graph(), &ufeat, &efeat, &mut out, &mut arg_u, &mut arg_e,
        );
        // row 0: candidates 1+0=1 (u0,e0), 5-3=2 (u1,e1)
        assert_eq!(out, [2.0, f32::NEG_INFINITY, 6.0]);
        assert_eq!(arg_u, [1, -1, 1]);
        assert_eq!(arg_e, [1, -1, 2]);
    }

    #[test]
    fn test_min_tie_keeps_first() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::CopyLhs, &[1], &[]).unwrap();
        let ufeat = [4.0f64, 4.0];
        let mut out = [0.0f64; 3];
        let mut arg_u = [7i64; 3];
        let mut arg_e = [7i64; 3];
        spmm_cmp_csr_kernel::<_, _, CopyLhsFn, MinReducer>(
            &client, &plan, &graph(), &ufeat, &[], &mut out, &mut arg_u, &mut arg_e,
        );
        assert_eq!(out, [4.0, f64::INFINITY, 4.0]);
        assert_eq!(arg_u, [0, 7, 1]);
        assert_eq!(arg_e, [0, 7, 2]);
    }

    #[test]
    fn test_nan_never_wins() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::CopyLhs, &[1], &[]).unwrap();
        let ufeat = [f32::NAN, 1.0];
        let mut out = [0.0f32; 3];
        let mut arg_u = [-1i64; 3];
        let mut arg_e = [-1i64; 3];
        spmm_cmp_csr_kernel::<_, _, CopyLhsFn, MaxReducer>(
            &client, &plan, &graph(), &ufeat, &[], &mut out, &mut arg_u, &mut arg_e,
        );
        assert_eq!(out[0], 1.0);
        assert_eq!(arg_u[0], 1);
    }

    #[test]
    fn test_empty_feature_row() {
        let client = CpuClient::new();
        let plan = BroadcastPlan::new(SpmmOp::CopyLhs, &[0], &[]).unwrap();
        let mut out: [f32; 0] = [];
        spmm_sum_csr_kernel::<_, _, CopyLhsFn>(&client, &plan, &graph(), &[], &[], &mut out);
    }
}
