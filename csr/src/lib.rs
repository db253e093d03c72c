//! Compressed-sparse-row topology primitive.
//!
//! A [`Csr`] is the base topology of a property graph: two flat arrays,
//! `out_indices` (a length `N + 1` prefix sum) and `out_dests` (a length
//! `M` array of destination node ids), adapted from the teacher's
//! `graph/csr` crate (there called `outbounds_degrees`/`destinations`).
//! The struct itself never changes once built; every derived ordering
//! (sorted-by-destination, transposed, degree-relabeled, symmetrized) is
//! produced by the free functions in this crate and owned by the caller
//! (the `graph` crate's view cache), never mutated in place.

use shared::{EdgeT, NodeT};

mod build;
mod degree_sort;
mod sorted;
mod transpose;
mod undirected;

pub use build::CsrBuilder;
pub use degree_sort::degree_sort_permutation;
pub use sorted::{find_edge, sort_adjacency_by_key};
pub use transpose::transpose;
pub use undirected::{symmetrize, UndirectedCsr};

/// Compressed-sparse-row adjacency. Immutable once constructed: the
/// invariants below are checked once, at construction time, and never
/// re-checked because nothing can mutate the arrays afterwards.
///
/// Invariants (checked by [`CsrBuilder::build`]):
/// * `out_indices` has length `num_nodes + 1`, is non-decreasing, and
///   `out_indices[0] == 0`.
/// * `out_indices[num_nodes] == out_dests.len()`.
/// * every entry of `out_dests` is `< num_nodes`.
#[derive(Debug, Clone)]
pub struct Csr {
    out_indices: Vec<EdgeT>,
    out_dests: Vec<NodeT>,
}

impl Csr {
    #[inline(always)]
    pub fn num_nodes(&self) -> NodeT {
        (self.out_indices.len() - 1) as NodeT
    }

    #[inline(always)]
    pub fn num_edges(&self) -> EdgeT {
        self.out_dests.len() as EdgeT
    }

    /// The half-open edge-id range `[out_indices[v-1], out_indices[v])` of
    /// node `v`'s out-edges, with the convention `out_indices[-1] = 0`.
    #[inline(always)]
    pub fn out_edges(&self, v: NodeT) -> std::ops::Range<EdgeT> {
        self.out_indices[v as usize]..self.out_indices[v as usize + 1]
    }

    #[inline(always)]
    pub fn out_degree(&self, v: NodeT) -> EdgeT {
        self.out_indices[v as usize + 1] - self.out_indices[v as usize]
    }

    #[inline(always)]
    pub fn out_edge_dst(&self, e: EdgeT) -> NodeT {
        self.out_dests[e as usize]
    }

    #[inline(always)]
    pub fn out_indices(&self) -> &[EdgeT] {
        &self.out_indices
    }

    #[inline(always)]
    pub fn out_dests(&self) -> &[NodeT] {
        &self.out_dests
    }

    /// Destination ids of `v`'s out-edges, as a contiguous slice. Only
    /// meaningful as "the neighbours of v in the order this Csr stores
    /// them"; the base topology makes no ordering guarantee.
    #[inline(always)]
    pub fn out_neighbours(&self, v: NodeT) -> &[NodeT] {
        let range = self.out_edges(v);
        &self.out_dests[range.start as usize..range.end as usize]
    }

    pub fn par_iter_node_ids(&self) -> impl rayon::iter::IndexedParallelIterator<Item = NodeT> {
        use rayon::iter::IntoParallelIterator;
        (0..self.num_nodes()).into_par_iter()
    }

    pub fn iter_node_ids(&self) -> std::ops::Range<NodeT> {
        0..self.num_nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_degree_matches_the_index_array_difference() {
        let csr = CsrBuilder::from_edge_list(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        for v in csr.iter_node_ids() {
            let range = csr.out_edges(v);
            assert_eq!(csr.out_degree(v), range.end - range.start);
        }
    }

    #[test]
    fn every_destination_is_in_range() {
        let csr = CsrBuilder::from_edge_list(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        for e in 0..csr.num_edges() {
            assert!(csr.out_edge_dst(e) < csr.num_nodes());
        }
    }

    #[test]
    fn par_iter_node_ids_visits_every_node_once() {
        use rayon::iter::ParallelIterator;
        let csr = CsrBuilder::from_edge_list(5, &[]).unwrap();
        let mut seen: Vec<NodeT> = csr.par_iter_node_ids().collect();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }
}
