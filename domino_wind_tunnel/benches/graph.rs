// Copyright 2026 the Domino Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use domino_graph::{stitch, BoundaryEndpoint, Graph};
use domino_types::{EdgeId, NodeId, PartId};

/// Entry point for `domino_graph` wind-tunnel benchmarks.
///
/// Registers scenarios that highlight how canonical-order maintenance
/// costs scale with graph size: chain construction, the two
/// traversals, and boundary stitching across a partitioned node set.
fn bench_graph(c: &mut Criterion) {
    bench_chain_construction(c);
    bench_bfs_traversal(c);
    bench_dfs_traversal(c);
    bench_boundary_stitch(c);
}

fn build_chain(len: u32) -> Graph {
    let mut g = Graph::new();
    for i in 1..=len {
        g.add_node(NodeId::new(i)).unwrap();
    }
    for i in 1..len {
        g.add_edge(EdgeId::INVALID, NodeId::new(i), NodeId::new(i + 1), false)
            .unwrap();
    }
    g
}

/// Linear chain of `len` nodes, each connected to the next.
///
/// Measures the cost of maintaining canonical sorted adjacency as
/// nodes and edges are inserted one at a time.
fn bench_chain_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_construction");
    for &len in &[10_u32, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| black_box(build_chain(len)));
        });
    }
    group.finish();
}

/// Measures full-graph BFS traversal cost over a chain, where every
/// node's adjacency must be resolved through a binary search.
fn bench_bfs_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("bfs_traversal");
    for &len in &[10_u32, 100, 1_000] {
        let g = build_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &g, |b, g| {
            b.iter(|| {
                let mut count = 0usize;
                g.bfs(NodeId::new(1), |_| count += 1).unwrap();
                black_box(count)
            });
        });
    }
    group.finish();
}

/// Measures full-graph DFS traversal cost over the same chain shape.
fn bench_dfs_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("dfs_traversal");
    for &len in &[10_u32, 100, 1_000] {
        let g = build_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &g, |b, g| {
            b.iter(|| {
                let mut count = 0usize;
                g.dfs(NodeId::new(1), |_| count += 1).unwrap();
                black_box(count)
            });
        });
    }
    group.finish();
}

fn boundary_endpoints(pairs: u32) -> (Graph, Vec<BoundaryEndpoint>) {
    let mut g = Graph::new();
    let mut endpoints = Vec::with_capacity(pairs as usize * 2);
    for i in 0..pairs {
        let a = g.add_node(NodeId::INVALID).unwrap();
        let b = g.add_node(NodeId::INVALID).unwrap();
        endpoints.push(BoundaryEndpoint {
            boundary_key: u64::from(i),
            part_id: PartId::new(1),
            node_id: a,
        });
        endpoints.push(BoundaryEndpoint {
            boundary_key: u64::from(i),
            part_id: PartId::new(2),
            node_id: b,
        });
    }
    (g, endpoints)
}

/// Stitches `pairs` cross-partition boundary endpoints into edges.
///
/// Dominated by the endpoint sort; this is the one place in
/// `domino_graph` that pays an `O(n log n)` cost up front rather than
/// amortizing it across incremental inserts.
fn bench_boundary_stitch(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundary_stitch");
    for &pairs in &[10_u32, 100, 1_000] {
        let (g, endpoints) = boundary_endpoints(pairs);
        group.bench_with_input(BenchmarkId::from_parameter(pairs), &(g, endpoints), |b, (g, endpoints)| {
            b.iter(|| {
                let mut g = g.clone();
                stitch(&mut g, endpoints).unwrap();
                black_box(g.edge_count())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph);
criterion_main!(benches);
