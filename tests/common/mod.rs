//! Common test utilities
#![allow(dead_code)]

use gspmm::dtype::{Element, IndexElement};
use gspmm::error::Result;
use gspmm::ops::SpmmOps;
use gspmm::runtime::cpu::{CpuClient, ParallelismConfig};
use gspmm::sparse::{CooGraph, CsrGraph};
use gspmm::tensor::{TensorView, TensorViewMut};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Install a test logger (idempotent)
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a CPU client on the global pool for testing
pub fn create_cpu_client() -> CpuClient {
    init_logger();
    CpuClient::new()
}

/// Create a CPU client with a private pool of `threads` workers
pub fn create_cpu_client_with_threads(threads: usize) -> CpuClient {
    init_logger();
    let config = ParallelismConfig::new()
        .with_max_num_threads(Some(threads))
        .with_min_rows_per_task(1);
    CpuClient::with_parallelism(config).unwrap()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_infinite() || y.is_infinite() {
            assert_eq!(x, y, "{}: element {} differs", msg, i);
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Assert two f32 slices are close within tolerance
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_infinite() || y.is_infinite() {
            assert_eq!(x, y, "{}: element {} differs", msg, i);
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Random edge list `(src, dst)` over `num_src × num_dst`, duplicates allowed
pub fn random_edges(
    rng: &mut StdRng,
    num_src: usize,
    num_dst: usize,
    nnz: usize,
) -> Vec<(usize, usize)> {
    (0..nnz)
        .map(|_| (rng.random_range(0..num_src), rng.random_range(0..num_dst)))
        .collect()
}

/// Random values in [-1, 1)
pub fn random_values(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Random small integers as floats, so that max/min produce frequent ties
pub fn random_tied_values(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| f64::from(rng.random_range(0..3u8))).collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// COO graph whose entry `k` is the edge `src → dst` of `edges[k]`
///
/// COO aggregates into columns, so sources are row ids.
pub fn coo_from_edges<I: IndexElement>(
    edges: &[(usize, usize)],
    num_src: usize,
    num_dst: usize,
) -> CooGraph<'static, I> {
    let rows: Vec<I> = edges.iter().map(|&(s, _)| I::from_usize(s)).collect();
    let cols: Vec<I> = edges.iter().map(|&(_, d)| I::from_usize(d)).collect();
    CooGraph::new(rows, cols, [num_src, num_dst]).unwrap()
}

/// CSR graph over the same edges, with edge ids preserving list order
///
/// CSR aggregates into rows, so row = destination and column = source.
/// Within a destination, entries keep their order in `edges`.
pub fn csr_from_edges<I: IndexElement>(
    edges: &[(usize, usize)],
    num_src: usize,
    num_dst: usize,
) -> CsrGraph<'static, I> {
    let mut order: Vec<usize> = (0..edges.len()).collect();
    order.sort_by_key(|&k| edges[k].1);

    let mut row_ptrs = vec![I::from_usize(0); num_dst + 1];
    let mut counts = vec![0usize; num_dst + 1];
    for &(_, d) in edges {
        counts[d + 1] += 1;
    }
    for d in 0..num_dst {
        counts[d + 1] += counts[d];
        row_ptrs[d + 1] = I::from_usize(counts[d + 1]);
    }

    let col_indices: Vec<I> = order.iter().map(|&k| I::from_usize(edges[k].0)).collect();
    let edge_ids: Vec<I> = order.iter().map(|&k| I::from_usize(k)).collect();
    CsrGraph::new(row_ptrs, col_indices, [num_dst, num_src])
        .unwrap()
        .with_edge_ids(edge_ids)
        .unwrap()
}

/// Sparse input of a test run
pub enum Graph<'a, I: IndexElement> {
    Csr(&'a CsrGraph<'a, I>),
    Coo(&'a CooGraph<'a, I>),
}

/// Owned results of a test run
#[derive(Debug, Clone, PartialEq)]
pub struct SpmmResult<I, T> {
    pub out: Vec<T>,
    pub arg_u: Vec<I>,
    pub arg_e: Vec<I>,
}

/// Value the output buffer holds before a run, to catch unwritten slots
pub const OUT_GARBAGE: f64 = 42.0;

/// Run one SpMM call into freshly allocated buffers
///
/// `out` is pre-filled with [`OUT_GARBAGE`], both aux buffers with
/// `aux_default`. Two aux views are always passed; sum ignores them.
#[allow(clippy::too_many_arguments)]
pub fn run_spmm<I: IndexElement, T: Element>(
    client: &CpuClient,
    op: &str,
    reduce: &str,
    graph: Graph<'_, I>,
    ufeat: Option<(&[T], &[usize])>,
    efeat: Option<(&[T], &[usize])>,
    out_shape: &[usize],
    aux_default: I,
) -> Result<SpmmResult<I, T>> {
    let numel: usize = out_shape.iter().product();
    let mut out = vec![T::from_f64(OUT_GARBAGE); numel];
    let mut arg_u = vec![aux_default; numel];
    let mut arg_e = vec![aux_default; numel];

    let ufeat = ufeat.map(|(data, shape)| TensorView::new(data, shape)).transpose()?;
    let efeat = efeat.map(|(data, shape)| TensorView::new(data, shape)).transpose()?;
    {
        let mut out_view = TensorViewMut::new(&mut out, out_shape)?;
        let mut aux = [
            TensorViewMut::new(&mut arg_u, out_shape)?,
            TensorViewMut::new(&mut arg_e, out_shape)?,
        ];
        match graph {
            Graph::Csr(csr) => client.spmm_csr(
                op,
                reduce,
                csr,
                ufeat.as_ref(),
                efeat.as_ref(),
                &mut out_view,
                &mut aux,
            )?,
            Graph::Coo(coo) => client.spmm_coo(
                op,
                reduce,
                coo,
                ufeat.as_ref(),
                efeat.as_ref(),
                &mut out_view,
                &mut aux,
            )?,
        }
    }
    Ok(SpmmResult { out, arg_u, arg_e })
}
