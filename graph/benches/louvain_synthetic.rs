use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csr::CsrBuilder;
use graph::{GraphBuilder, LouvainPlan};
use shared::get_thread_pool;

/// `num_cliques` disjoint 8-cliques, each bridged to the next by a single
/// edge, so Louvain has real community structure to discover rather than
/// uniform noise.
fn chained_cliques(num_cliques: u32, clique_size: u32) -> graph::Graph {
    let mut edges = Vec::new();
    for c in 0..num_cliques {
        let base = c * clique_size;
        for i in 0..clique_size {
            for j in (i + 1)..clique_size {
                edges.push((base + i, base + j));
                edges.push((base + j, base + i));
            }
        }
        if c + 1 < num_cliques {
            let bridge_a = base + clique_size - 1;
            let bridge_b = base + clique_size;
            edges.push((bridge_a, bridge_b));
            edges.push((bridge_b, bridge_a));
        }
    }
    let csr = CsrBuilder::from_edge_list(num_cliques * clique_size, &edges).unwrap();
    GraphBuilder::new(csr.out_indices().to_vec(), csr.out_dests().to_vec())
        .build()
        .unwrap()
}

fn bench_do_all(c: &mut Criterion) {
    let (_, pool) = get_thread_pool().unwrap();
    c.bench_function("louvain_do_all_200_cliques", |b| {
        b.iter(|| {
            pool.install(|| {
                let mut graph = chained_cliques(200, 8);
                let plan = LouvainPlan::do_all();
                black_box(graph.run_louvain(None, &plan, "community").unwrap());
            });
        });
    });
}

fn bench_deterministic(c: &mut Criterion) {
    let (_, pool) = get_thread_pool().unwrap();
    c.bench_function("louvain_deterministic_200_cliques", |b| {
        b.iter(|| {
            pool.install(|| {
                let mut graph = chained_cliques(200, 8);
                let plan = LouvainPlan::deterministic();
                black_box(graph.run_louvain(None, &plan, "community").unwrap());
            });
        });
    });
}

criterion_group!(benches, bench_do_all, bench_deterministic);
criterion_main!(benches);
