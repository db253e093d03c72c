//! End-to-end scenario: Leiden on a ring of 5 triangles joined at a common
//! hub node. Refinement should prevent the degenerate "hub + everything"
//! community that plain Louvain occasionally returns.

extern crate csr;
extern crate graph;

use csr::CsrBuilder;
use graph::{GraphBuilder, LeidenPlan};

fn ring_of_triangles() -> graph::Graph {
    let hub = 0u32;
    let mut undirected = Vec::new();
    for t in 0..5u32 {
        let a = 1 + t * 2;
        let b = 2 + t * 2;
        undirected.push((hub, a));
        undirected.push((hub, b));
        undirected.push((a, b));
    }

    let mut edges = Vec::new();
    for &(a, b) in &undirected {
        edges.push((a, b));
        edges.push((b, a));
    }
    let csr = CsrBuilder::from_edge_list(11, &edges).unwrap();
    GraphBuilder::new(csr.out_indices().to_vec(), csr.out_dests().to_vec())
        .build()
        .unwrap()
}

#[test]
fn leiden_finds_five_communities_through_the_graph_api() {
    let _ = env_logger::try_init();
    let mut graph = ring_of_triangles();
    let plan = LeidenPlan::deterministic();
    let result = graph.run_leiden(None, &plan, "community").unwrap();

    for t in 0..5u32 {
        let a = (1 + t * 2) as usize;
        let b = (2 + t * 2) as usize;
        assert_eq!(
            result.community_of[a], result.community_of[b],
            "triangle {}'s private nodes should share a community",
            t
        );
    }

    let mut private_communities: Vec<u32> =
        (0..5u32).map(|t| result.community_of[(1 + t * 2) as usize]).collect();
    private_communities.sort();
    private_communities.dedup();
    assert_eq!(private_communities.len(), 5);

    let published = graph.node_properties().typed_column::<u32>("community").unwrap();
    assert_eq!(published.to_vec(), result.community_of);
}
