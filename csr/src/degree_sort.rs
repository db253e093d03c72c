use crate::Csr;
use rayon::prelude::*;
use shared::NodeT;

/// Computes the permutation that relabels nodes in ascending order of
/// out-degree, tie-broken by original node id: `degree(perm[i]) <=
/// degree(perm[i + 1])`, and among nodes of equal degree the one with the
/// smaller original id comes first.
///
/// `perm[new_id] == old_id`. Callers rewrite the adjacency under this
/// permutation to materialize `NodesSortedByDegree`.
pub fn degree_sort_permutation(csr: &Csr) -> Vec<NodeT> {
    let mut by_degree: Vec<NodeT> = (0..csr.num_nodes()).collect();
    by_degree.par_sort_by_key(|&v| (csr.out_degree(v), v));
    by_degree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CsrBuilder;

    #[test]
    fn sorts_nodes_ascending_by_degree_tie_broken_by_id() {
        let csr = CsrBuilder::from_edge_list(4, &[(0, 1), (0, 2), (0, 3), (2, 3)]).unwrap();
        let perm = degree_sort_permutation(&csr);
        let degrees: Vec<_> = perm.iter().map(|&v| csr.out_degree(v)).collect();
        assert!(degrees.windows(2).all(|w| w[0] <= w[1]));
        // node 1 and node 3 are both degree-0; id order breaks the tie.
        let pos = |v: NodeT| perm.iter().position(|&x| x == v).unwrap();
        assert!(pos(1) < pos(3));
    }
}
