use crate::{Csr, CsrBuilder};
use rayon::prelude::*;
use shared::{EdgeT, NodeT, ThreadDataRaceAware};

/// Sorts each node's adjacency by a caller-supplied key, returning the
/// resorted [`Csr`] together with a permutation such that
/// `permutation[new_edge_id] == old_edge_id`. Callers use the permutation
/// to reindex edge properties (edge ids double as property row indices, so
/// resorting the adjacency invalidates the old edge ids).
///
/// `key_fn(old_edge_id, dst) -> K` is evaluated once per edge; the sort
/// within each node is stable, so edges with equal keys keep their
/// original relative order (this is what lets
/// `EdgesSortedByProperty` fall back to destination order as a tie-break
/// simply by folding destination into the key).
pub fn sort_adjacency_by_key<K: Ord, F>(csr: &Csr, key_fn: F) -> (Csr, Vec<EdgeT>)
where
    F: Fn(EdgeT, NodeT) -> K + Sync,
{
    let mut out_dests = vec![0 as NodeT; csr.num_edges() as usize];
    let mut permutation = vec![0 as EdgeT; csr.num_edges() as usize];
    let shared_dests = ThreadDataRaceAware::new(&mut out_dests);
    let shared_permutation = ThreadDataRaceAware::new(&mut permutation);

    (0..csr.num_nodes()).into_par_iter().for_each(|v| {
        let range = csr.out_edges(v);
        let start = range.start as usize;
        let mut local: Vec<(EdgeT, NodeT)> = (range.start..range.end)
            .map(|e| (e, csr.out_edge_dst(e)))
            .collect();
        local.sort_by_key(|&(e, dst)| key_fn(e, dst));
        // SAFETY: each node owns the disjoint [start, end) window of both
        // output arrays matching its own out-edges, so concurrent writers
        // for different nodes never touch the same slot.
        for (i, (old_edge, dst)) in local.into_iter().enumerate() {
            unsafe {
                (&mut (*shared_dests.get()))[start + i] = dst;
                (&mut (*shared_permutation.get()))[start + i] = old_edge;
            }
        }
    });

    let csr = CsrBuilder::new(csr.out_indices().to_vec(), out_dests)
        .build()
        .expect("resorting adjacency cannot violate CSR invariants");
    (csr, permutation)
}

/// Binary-searches for the first edge from `src` to `dst` in a [`Csr`]
/// whose adjacency of `src` is sorted ascending by destination. Returns
/// `None` when no such edge exists.
///
/// # Panics
/// Debug builds assert the neighbourhood is actually sorted; release
/// builds trust the caller. This function is only meaningful against a
/// sorted-by-destination view; the type system does not enforce that,
/// the view layer does.
pub fn find_edge(csr: &Csr, src: NodeT, dst: NodeT) -> Option<EdgeT> {
    let range = csr.out_edges(src);
    let neighbours = csr.out_neighbours(src);
    debug_assert!(is_sorted::IsSorted::is_sorted(&mut neighbours.iter()));
    neighbours
        .binary_search(&dst)
        .ok()
        .map(|idx| range.start + idx as EdgeT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsrBuilder;

    #[test]
    fn sorts_each_nodes_adjacency_by_destination() {
        let csr =
            CsrBuilder::from_edge_list(4, &[(0, 3), (0, 1), (0, 2), (1, 0)]).unwrap();
        let (sorted, permutation) = sort_adjacency_by_key(&csr, |_e, dst| dst);
        assert_eq!(sorted.out_neighbours(0), &[1, 2, 3]);
        for v in sorted.iter_node_ids() {
            for e in sorted.out_edges(v) {
                assert_eq!(
                    sorted.out_edge_dst(e),
                    csr.out_edge_dst(permutation[e as usize])
                );
            }
        }
    }

    #[test]
    fn find_edge_locates_existing_and_missing_edges() {
        let csr = CsrBuilder::from_edge_list(4, &[(0, 3), (0, 1), (0, 2)]).unwrap();
        let (sorted, permutation) = sort_adjacency_by_key(&csr, |_e, dst| dst);
        let e = find_edge(&sorted, 0, 2).unwrap();
        assert_eq!(csr.out_edge_dst(permutation[e as usize]), 2);
        assert!(find_edge(&sorted, 0, 0).is_none());
        assert!(find_edge(&sorted, 3, 0).is_none());
    }
}
