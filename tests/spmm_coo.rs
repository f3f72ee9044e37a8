//! Integration tests for SpMM over COO graphs
//!
//! COO aggregates into columns: entry `k` contributes
//! `op(ufeat[row_ids[k]], efeat[k])` to destination `col_ids[k]`. Includes
//! CSR/COO parity over random graphs and thread-count independence.

mod common;

use common::{
    Graph, assert_allclose_f64, coo_from_edges, create_cpu_client, create_cpu_client_with_threads,
    csr_from_edges, random_edges, random_tied_values, random_values, run_spmm, seeded_rng,
};
use gspmm::error::Error;
use gspmm::ops::{ReduceOp, SpmmOp};
use gspmm::sparse::{CooGraph, SparseStorage};

#[test]
fn test_concrete_scenario() {
    let client = create_cpu_client();
    // src -> dst: 0 -> 1, 1 -> 1, 0 -> 2
    let coo = CooGraph::new(vec![0i64, 1, 0], vec![1i64, 1, 2], [3, 3]).unwrap();
    let ufeat = [1.0f32, 2.0, 3.0];
    let efeat = [1.0f32; 3];

    let result = run_spmm(
        &client,
        "mul",
        "sum",
        Graph::Coo(&coo),
        Some((&ufeat, &[3, 1])),
        Some((&efeat, &[3])),
        &[3, 1],
        0i64,
    )
    .unwrap();

    assert_eq!(result.out, vec![0.0, 3.0, 1.0]);
}

#[test]
fn test_ties_follow_list_order() {
    let client = create_cpu_client();
    // three entries into destination 0, unsorted sources, equal values
    let coo = CooGraph::new(vec![2i32, 1, 0], vec![0i32, 0, 0], [3, 1]).unwrap();
    let ufeat = [4.0f64, 4.0, 4.0];

    for reduce in ["max", "min"] {
        let result = run_spmm(
            &client,
            "copy_lhs",
            reduce,
            Graph::Coo(&coo),
            Some((&ufeat, &[3])),
            None,
            &[1],
            -1i32,
        )
        .unwrap();
        assert_eq!(result.out, vec![4.0], "{reduce}");
        assert_eq!(result.arg_u, vec![2], "{reduce}");
        assert_eq!(result.arg_e, vec![0], "{reduce}");
    }
}

#[test]
fn test_duplicates_accumulate() {
    let client = create_cpu_client();
    let coo = CooGraph::new(vec![0i64, 0, 0], vec![1i64, 1, 1], [1, 2]).unwrap();
    let ufeat = [2.0f32];
    let efeat = [1.0f32, 2.0, 3.0];

    let sum = run_spmm(
        &client,
        "mul",
        "sum",
        Graph::Coo(&coo),
        Some((&ufeat, &[1])),
        Some((&efeat, &[3])),
        &[2],
        -1i64,
    )
    .unwrap();
    assert_eq!(sum.out, vec![0.0, 12.0]);

    let max = run_spmm(
        &client,
        "mul",
        "max",
        Graph::Coo(&coo),
        Some((&ufeat, &[1])),
        Some((&efeat, &[3])),
        &[2],
        -1i64,
    )
    .unwrap();
    assert_eq!(max.out, vec![f32::NEG_INFINITY, 6.0]);
    assert_eq!(max.arg_u, vec![-1, 0]);
    assert_eq!(max.arg_e, vec![-1, 2]);
}

#[test]
fn test_edge_ids_reported() {
    let client = create_cpu_client();
    let coo = CooGraph::new(vec![0i64, 1], vec![0i64, 0], [2, 1])
        .unwrap()
        .with_edge_ids(vec![1i64, 0])
        .unwrap();
    // efeat is indexed by edge id, not by entry position
    let efeat = [5.0f32, -5.0];

    let result = run_spmm(
        &client,
        "copy_rhs",
        "max",
        Graph::Coo(&coo),
        None,
        Some((&efeat, &[2])),
        &[1],
        -1i64,
    )
    .unwrap();
    // entry 1 (row 1) has edge id 0 -> 5.0
    assert_eq!(result.out, vec![5.0]);
    assert_eq!(result.arg_u, vec![1]);
    assert_eq!(result.arg_e, vec![0]);
}

#[test]
fn test_leading_dims_use_coo_axes() {
    let client = create_cpu_client();
    // 2 sources (rows), 4 destinations (cols)
    let coo = CooGraph::new(vec![1i64], vec![3i64], [2, 4]).unwrap();
    let ufeat = [1.0f32, 2.0];

    let result = run_spmm(
        &client,
        "copy_lhs",
        "sum",
        Graph::Coo(&coo),
        Some((&ufeat, &[2])),
        None,
        &[4],
        0i64,
    )
    .unwrap();
    assert_eq!(result.out, vec![0.0, 0.0, 0.0, 2.0]);

    // indexing ufeat by destination count is a mismatch
    let ufeat = [1.0f32; 4];
    let err = run_spmm(
        &client,
        "copy_lhs",
        "sum",
        Graph::Coo(&coo),
        Some((&ufeat, &[4])),
        None,
        &[4],
        0i64,
    )
    .unwrap_err();
    assert_eq!(err, Error::shape_mismatch(&[2], &[4]));
}

#[test]
fn test_segmented_csr_matches_coo() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(7);
    let edges = random_edges(&mut rng, 6, 5, 20);
    let coo = coo_from_edges::<i64>(&edges, 6, 5);
    let segments = coo.segment_by_col();
    assert_eq!(segments.nnz(), coo.nnz());

    let ufeat = random_tied_values(&mut rng, 6 * 2);
    let efeat = random_tied_values(&mut rng, 20);
    let via_coo = run_spmm(
        &client,
        "add",
        "max",
        Graph::Coo(&coo),
        Some((&ufeat, &[6, 2])),
        Some((&efeat, &[20, 1])),
        &[5, 2],
        -1i64,
    )
    .unwrap();
    let via_csr = run_spmm(
        &client,
        "add",
        "max",
        Graph::Csr(&segments),
        Some((&ufeat, &[6, 2])),
        Some((&efeat, &[20, 1])),
        &[5, 2],
        -1i64,
    )
    .unwrap();
    assert_eq!(via_coo, via_csr);
}

#[test]
fn test_csr_coo_parity_random() {
    let client = create_cpu_client();
    let mut rng = seeded_rng(0x5eed);
    let (num_src, num_dst, nnz) = (23, 17, 150);
    let edges = random_edges(&mut rng, num_src, num_dst, nnz);
    let coo = coo_from_edges::<i64>(&edges, num_src, num_dst);
    let csr = csr_from_edges::<i64>(&edges, num_src, num_dst);

    let ufeat = random_values(&mut rng, num_src * 4);
    let efeat = random_values(&mut rng, nnz * 4);
    let tied_ufeat = random_tied_values(&mut rng, num_src * 4);
    let tied_efeat = random_tied_values(&mut rng, nnz * 4);
    let u_shape = [num_src, 4];
    let e_shape = [nnz, 4];
    let out_shape = [num_dst, 4];

    for op in SpmmOp::ALL {
        let sum_coo = run_spmm(
            &client,
            op.name(),
            "sum",
            Graph::Coo(&coo),
            Some((&ufeat, &u_shape)),
            Some((&efeat, &e_shape)),
            &out_shape,
            0i64,
        )
        .unwrap();
        let sum_csr = run_spmm(
            &client,
            op.name(),
            "sum",
            Graph::Csr(&csr),
            Some((&ufeat, &u_shape)),
            Some((&efeat, &e_shape)),
            &out_shape,
            0i64,
        )
        .unwrap();
        assert_allclose_f64(&sum_coo.out, &sum_csr.out, 1e-12, 1e-12, op.name());

        for reduce in [ReduceOp::Max, ReduceOp::Min] {
            let cmp_coo = run_spmm(
                &client,
                op.name(),
                reduce.name(),
                Graph::Coo(&coo),
                Some((&tied_ufeat, &u_shape)),
                Some((&tied_efeat, &e_shape)),
                &out_shape,
                -1i64,
            )
            .unwrap();
            let cmp_csr = run_spmm(
                &client,
                op.name(),
                reduce.name(),
                Graph::Csr(&csr),
                Some((&tied_ufeat, &u_shape)),
                Some((&tied_efeat, &e_shape)),
                &out_shape,
                -1i64,
            )
            .unwrap();
            assert_eq!(cmp_coo, cmp_csr, "{op} {reduce}");
        }
    }
}

#[test]
fn test_results_independent_of_thread_count() {
    let mut rng = seeded_rng(42);
    let (num_src, num_dst, nnz) = (200, 300, 4000);
    let edges = random_edges(&mut rng, num_src, num_dst, nnz);
    let coo = coo_from_edges::<i32>(&edges, num_src, num_dst);
    let ufeat = random_values(&mut rng, num_src * 3);
    let efeat = random_values(&mut rng, nnz);

    let run = |threads: usize, reduce: &str| {
        let client = create_cpu_client_with_threads(threads);
        run_spmm(
            &client,
            "mul",
            reduce,
            Graph::Coo(&coo),
            Some((&ufeat, &[num_src, 3])),
            Some((&efeat, &[nnz, 1])),
            &[num_dst, 3],
            -1i32,
        )
        .unwrap()
    };

    for reduce in ["sum", "max", "min"] {
        let single = run(1, reduce);
        for threads in [2, 4] {
            // bitwise equal: each destination is reduced in a fixed order
            assert_eq!(single, run(threads, reduce), "{reduce} with {threads} threads");
        }
    }
}

#[test]
fn test_to_csr_keeps_row_grouping() {
    let mut rng = seeded_rng(3);
    let edges = random_edges(&mut rng, 4, 6, 30);
    let coo = coo_from_edges::<i64>(&edges, 4, 6);
    let csr = coo.to_csr();

    assert_eq!(csr.shape(), coo.shape());
    assert_eq!(csr.nnz(), coo.nnz());
    let edge_ids = csr.edge_ids().unwrap();
    let row_ptrs = csr.row_ptrs();
    for row in 0..4 {
        let (start, end) = (row_ptrs[row] as usize, row_ptrs[row + 1] as usize);
        let ids = &edge_ids[start..end];
        // original order within a row
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for (pos, &id) in ids.iter().enumerate() {
            assert_eq!(coo.row_ids()[id as usize], row as i64);
            assert_eq!(csr.col_indices()[start + pos], coo.col_ids()[id as usize]);
        }
    }
}
