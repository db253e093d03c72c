//! End-to-end scenario: local clustering coefficient on the triangle
//! `(0,1,2)` with one isolated node `3`.

extern crate csr;
extern crate graph;

use csr::CsrBuilder;
use graph::GraphBuilder;

#[test]
fn triangle_nodes_are_fully_clustered_and_the_isolated_node_is_not() {
    let _ = env_logger::try_init();
    let edges = [(0, 1), (1, 0), (1, 2), (2, 1), (0, 2), (2, 0)];
    let csr = CsrBuilder::from_edge_list(4, &edges).unwrap();
    let mut graph = GraphBuilder::new(csr.out_indices().to_vec(), csr.out_dests().to_vec())
        .build()
        .unwrap();

    graph.compute_local_clustering_coefficient("lcc").unwrap();
    let lcc = graph.node_properties().typed_column::<f64>("lcc").unwrap();

    assert!((lcc[0] - 1.0).abs() < 1e-9);
    assert!((lcc[1] - 1.0).abs() < 1e-9);
    assert!((lcc[2] - 1.0).abs() < 1e-9);
    assert_eq!(lcc[3], 0.0);
}
