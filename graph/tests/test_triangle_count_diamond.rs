//! End-to-end scenario: a tiny symmetric diamond, triangle count.
//! Nodes `{0,1,2,3}`, undirected edges `{(0,1),(1,2),(2,3),(3,0),(0,2),(1,3)}`.

extern crate csr;
extern crate graph;

use csr::CsrBuilder;
use graph::{GraphBuilder, Relabeling, TriangleCountPlan};

fn diamond() -> graph::Graph {
    let undirected = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)];
    let mut edges = Vec::new();
    for &(a, b) in &undirected {
        edges.push((a, b));
        edges.push((b, a));
    }
    let csr = CsrBuilder::from_edge_list(4, &edges).unwrap();
    GraphBuilder::new(csr.out_indices().to_vec(), csr.out_dests().to_vec())
        .build()
        .unwrap()
}

#[test]
fn all_three_algorithms_agree_on_four_triangles() {
    let _ = env_logger::try_init();
    let graph = diamond();
    for plan in [
        TriangleCountPlan::ordered_count(),
        TriangleCountPlan::node_iteration(),
        TriangleCountPlan::edge_iteration(),
    ] {
        let plan = plan.with_relabeling(Relabeling::NoRelabel);
        assert_eq!(graph.count_triangles(&plan).unwrap(), 4);
    }
}

#[test]
fn relabeling_auto_still_finds_four_triangles() {
    let graph = diamond();
    let plan = TriangleCountPlan::ordered_count().with_relabeling(Relabeling::Auto);
    assert_eq!(graph.count_triangles(&plan).unwrap(), 4);
}
