use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csr::CsrBuilder;
use graph::{GraphBuilder, ViewKind};

fn grid_graph(side: u32) -> graph::Graph {
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            let v = row * side + col;
            if col + 1 < side {
                let right = v + 1;
                edges.push((v, right));
                edges.push((right, v));
            }
            if row + 1 < side {
                let down = v + side;
                edges.push((v, down));
                edges.push((down, v));
            }
        }
    }
    let csr = CsrBuilder::from_edge_list(side * side, &edges).unwrap();
    GraphBuilder::new(csr.out_indices().to_vec(), csr.out_dests().to_vec())
        .build()
        .unwrap()
}

fn bench_transposed_view(c: &mut Criterion) {
    let graph = grid_graph(200);
    c.bench_function("view_transposed_200x200_grid", |b| {
        b.iter(|| {
            graph.drop_all_topologies();
            black_box(graph.view(ViewKind::Transposed).unwrap());
        });
    });
}

fn bench_edges_sorted_by_dest_id(c: &mut Criterion) {
    let graph = grid_graph(200);
    c.bench_function("view_edges_sorted_by_dest_id_200x200_grid", |b| {
        b.iter(|| {
            graph.drop_all_topologies();
            black_box(graph.view(ViewKind::EdgesSortedByDestID).unwrap());
        });
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let graph = grid_graph(200);
    let _ = graph.view(ViewKind::NodesSortedByDegree).unwrap();
    c.bench_function("view_cache_hit_200x200_grid", |b| {
        b.iter(|| {
            black_box(graph.view(ViewKind::NodesSortedByDegree).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_transposed_view,
    bench_edges_sorted_by_dest_id,
    bench_cache_hit
);
criterion_main!(benches);
