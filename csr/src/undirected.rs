use crate::{Csr, CsrBuilder};
use shared::{EdgeT, NodeT};

/// A symmetrized topology: every directed edge of the base graph appears
/// once per endpoint, so `undirected_degree(v)` counts both `v`'s out-edges
/// and the out-edges of others that point at `v`. Each entry also carries
/// the id of the underlying directed edge it came from, so callers can
/// still look up that edge's properties.
#[derive(Debug, Clone)]
pub struct UndirectedCsr {
    csr: Csr,
    origin: Vec<EdgeT>,
}

impl UndirectedCsr {
    #[inline(always)]
    pub fn undirected_edges(&self, v: NodeT) -> std::ops::Range<EdgeT> {
        self.csr.out_edges(v)
    }

    #[inline(always)]
    pub fn undirected_degree(&self, v: NodeT) -> EdgeT {
        self.csr.out_degree(v)
    }

    #[inline(always)]
    pub fn undirected_edge_neighbor(&self, e: EdgeT) -> NodeT {
        self.csr.out_edge_dst(e)
    }

    /// The directed edge id of the base graph this undirected entry was
    /// derived from; a self-loop appears twice, once per pass below, both
    /// mapping back to the same original edge.
    #[inline(always)]
    pub fn origin_edge(&self, e: EdgeT) -> EdgeT {
        self.origin[e as usize]
    }

    #[inline(always)]
    pub fn csr(&self) -> &Csr {
        &self.csr
    }
}

/// Symmetrizes a directed [`Csr`]: for every edge `(u, v)` adds `v`'s
/// adjacency entry pointing back at `u` (a self-loop contributes to its
/// node's degree twice, matching the symmetric weighted-degree convention).
/// Two linear passes mirror [`crate::transpose`]: count combined degrees,
/// then scatter both the forward and the reverse half of each edge.
pub fn symmetrize(csr: &Csr) -> UndirectedCsr {
    let num_nodes = csr.num_nodes();
    let num_edges = csr.num_edges() as usize;

    let mut degrees = vec![0 as EdgeT; num_nodes as usize + 1];
    for v in 0..num_nodes {
        degrees[v as usize + 1] += csr.out_degree(v);
    }
    for e in 0..csr.num_edges() {
        let dst = csr.out_edge_dst(e);
        degrees[dst as usize + 1] += 1;
    }
    for v in 0..num_nodes as usize {
        degrees[v + 1] += degrees[v];
    }

    let mut cursor = degrees.clone();
    let mut out_dests = vec![0; num_edges * 2];
    let mut origin = vec![0 as EdgeT; num_edges * 2];
    for v in 0..num_nodes {
        for e in csr.out_edges(v) {
            let dst = csr.out_edge_dst(e);

            let forward_slot = &mut cursor[v as usize];
            out_dests[*forward_slot as usize] = dst;
            origin[*forward_slot as usize] = e;
            *forward_slot += 1;

            let backward_slot = &mut cursor[dst as usize];
            out_dests[*backward_slot as usize] = v;
            origin[*backward_slot as usize] = e;
            *backward_slot += 1;
        }
    }

    let csr = CsrBuilder::new(degrees, out_dests)
        .build()
        .expect("symmetrizing a valid Csr cannot violate Csr invariants");
    UndirectedCsr { csr, origin }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_edge_appears_at_both_endpoints() {
        let csr = CsrBuilder::from_edge_list(3, &[(0, 1), (1, 2)]).unwrap();
        let undirected = symmetrize(&csr);
        assert_eq!(undirected.undirected_degree(0), 1);
        assert_eq!(undirected.undirected_degree(1), 2);
        assert_eq!(undirected.undirected_degree(2), 1);
    }

    #[test]
    fn self_loop_counts_twice() {
        let csr = CsrBuilder::from_edge_list(1, &[(0, 0)]).unwrap();
        let undirected = symmetrize(&csr);
        assert_eq!(undirected.undirected_degree(0), 2);
    }
}
