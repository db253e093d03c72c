use crate::Csr;
use shared::{Error, NodeT, Result};

/// Validates and packages the two raw arrays handed to us by an external
/// loader (spec.md §6: `out_indices: u64[N+1]`, `out_dests: u32[M]`) into a
/// [`Csr`]. This is the only place the invariants of §3/§8 are checked.
pub struct CsrBuilder {
    out_indices: Vec<shared::EdgeT>,
    out_dests: Vec<NodeT>,
}

impl CsrBuilder {
    /// `out_indices` must already include the leading implicit zero, i.e.
    /// have length `num_nodes + 1`.
    pub fn new(out_indices: Vec<shared::EdgeT>, out_dests: Vec<NodeT>) -> Self {
        CsrBuilder {
            out_indices,
            out_dests,
        }
    }

    pub fn build(self) -> Result<Csr> {
        let CsrBuilder {
            out_indices,
            out_dests,
        } = self;

        if out_indices.is_empty() {
            return Err(Error::invalid_argument(
                "out_indices must contain at least the implicit leading zero",
            ));
        }
        if out_indices[0] != 0 {
            return Err(Error::invalid_argument(format!(
                "out_indices[0] must be 0, got {}",
                out_indices[0]
            )));
        }
        if !out_indices.windows(2).all(|w| w[0] <= w[1]) {
            return Err(Error::invalid_argument(
                "out_indices must be non-decreasing",
            ));
        }
        let expected_edges = out_dests.len() as shared::EdgeT;
        if *out_indices.last().unwrap() != expected_edges {
            return Err(Error::invalid_argument(format!(
                "out_indices[N] = {} does not match out_dests.len() = {}",
                out_indices.last().unwrap(),
                expected_edges
            )));
        }
        let num_nodes = (out_indices.len() - 1) as NodeT;
        if let Some(&bad) = out_dests.iter().find(|&&dst| dst >= num_nodes) {
            return Err(Error::invalid_argument(format!(
                "out_dests contains destination {} but the graph only has {} nodes",
                bad, num_nodes
            )));
        }

        Ok(Csr {
            out_indices,
            out_dests,
        })
    }

    /// Builds directly from a node-count and an edge list, computing
    /// `out_indices` via a counting sort. `edges` need not be sorted by
    /// source; this performs the bucketing for the caller.
    pub fn from_edge_list(num_nodes: NodeT, edges: &[(NodeT, NodeT)]) -> Result<Csr> {
        let mut degrees = vec![0 as shared::EdgeT; num_nodes as usize + 1];
        for &(src, dst) in edges {
            if src >= num_nodes || dst >= num_nodes {
                return Err(Error::invalid_argument(format!(
                    "edge ({}, {}) references a node outside [0, {})",
                    src, dst, num_nodes
                )));
            }
            degrees[src as usize + 1] += 1;
        }
        for i in 0..num_nodes as usize {
            degrees[i + 1] += degrees[i];
        }
        let mut cursor = degrees.clone();
        let mut out_dests = vec![0 as NodeT; edges.len()];
        for &(src, dst) in edges {
            let slot = &mut cursor[src as usize];
            out_dests[*slot as usize] = dst;
            *slot += 1;
        }
        CsrBuilder::new(degrees, out_dests).build()
    }

    /// Builds a symmetric topology from an undirected edge list: every
    /// pair `(a, b)` contributes both directed entries `(a, b)` and
    /// `(b, a)`. A self-loop contributes two entries at its node, matching
    /// the symmetric weighted-degree convention.
    pub fn from_undirected_edge_list(num_nodes: NodeT, edges: &[(NodeT, NodeT)]) -> Result<Csr> {
        let mut directed = Vec::with_capacity(edges.len() * 2);
        for &(a, b) in edges {
            directed.push((a, b));
            directed.push((b, a));
        }
        CsrBuilder::from_edge_list(num_nodes, &directed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_an_edge_list() {
        let csr = CsrBuilder::from_edge_list(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        assert_eq!(csr.num_nodes(), 4);
        assert_eq!(csr.num_edges(), 4);
        assert_eq!(csr.out_degree(0), 2);
        assert_eq!(csr.out_degree(3), 0);
        assert_eq!(csr.out_indices()[0], 0);
        assert_eq!(*csr.out_indices().last().unwrap(), 4);
    }

    #[test]
    fn rejects_a_destination_outside_the_node_range() {
        let err = CsrBuilder::new(vec![0, 1], vec![5]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_a_decreasing_index_array() {
        let err = CsrBuilder::new(vec![0, 3, 1], vec![0, 0, 0]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_a_mismatched_edge_count() {
        let err = CsrBuilder::new(vec![0, 1], vec![0, 0]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_an_edge_list_with_an_out_of_range_node() {
        let err = CsrBuilder::from_edge_list(2, &[(0, 5)]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn undirected_builder_adds_both_directions() {
        let csr = CsrBuilder::from_undirected_edge_list(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(csr.num_edges(), 4);
        assert_eq!(csr.out_degree(1), 2);
        assert_eq!(csr.out_neighbours(0), &[1]);
        let mut from_one: Vec<_> = csr.out_neighbours(1).to_vec();
        from_one.sort();
        assert_eq!(from_one, vec![0, 2]);
    }

    #[test]
    fn undirected_builder_counts_a_self_loop_twice() {
        let csr = CsrBuilder::from_undirected_edge_list(1, &[(0, 0)]).unwrap();
        assert_eq!(csr.out_degree(0), 2);
    }
}
