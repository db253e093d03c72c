//! Graph coarsening (§4.6): builds a quotient graph whose nodes are the
//! current level's communities and whose edges aggregate the weight
//! between them, with intra-community weight folded into a self-loop.

use super::WeightedAdjacency;
use hashbrown::HashMap;

/// Builds the coarsened graph for `community_of` (already renumbered to
/// `[0, num_communities)`). The weight of the directed entry from
/// community `a` to community `b` is the sum, over every node `v` in `a`,
/// of the weight of `v`'s edges into `b` — this is symmetric by
/// construction since the input adjacency already is, so the result is a
/// valid [`WeightedAdjacency`] without any extra symmetrization pass.
pub fn coarsen(adj: &WeightedAdjacency, community_of: &[u32], num_communities: u32) -> WeightedAdjacency {
    let mut pair_weight: HashMap<(u32, u32), f64> = HashMap::new();
    for v in 0..adj.num_nodes() {
        let c = community_of[v as usize];
        for (u, w) in adj.neighbours(v) {
            let c2 = community_of[u as usize];
            *pair_weight.entry((c, c2)).or_insert(0.0) += w;
        }
    }

    let mut by_row: Vec<Vec<(u32, f64)>> = vec![Vec::new(); num_communities as usize];
    for ((a, b), w) in pair_weight {
        by_row[a as usize].push((b, w));
    }
    for row in &mut by_row {
        row.sort_by_key(|&(b, _)| b);
    }

    let mut out_indices = Vec::with_capacity(num_communities as usize + 1);
    let mut out_dests = Vec::new();
    let mut out_weights = Vec::new();
    out_indices.push(0u64);
    for row in by_row {
        for (b, w) in row {
            out_dests.push(b);
            out_weights.push(w);
        }
        out_indices.push(out_dests.len() as u64);
    }

    WeightedAdjacency {
        out_indices,
        out_dests,
        out_weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csr::CsrBuilder;

    #[test]
    fn coarsening_two_cliques_yields_a_two_node_graph() {
        let mut edges = Vec::new();
        for &(a, b) in &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            edges.push((a, b));
        }
        for &(a, b) in &[(4, 5), (4, 6), (4, 7), (5, 6), (5, 7), (6, 7)] {
            edges.push((a, b));
        }
        edges.push((3, 4));
        let base = CsrBuilder::from_edge_list(8, &edges).unwrap();
        let adj = WeightedAdjacency::unweighted(&base);
        let community_of: Vec<u32> = (0..8).map(|v| if v < 4 { 0 } else { 1 }).collect();

        let coarse = coarsen(&adj, &community_of, 2);
        assert_eq!(coarse.num_nodes(), 2);
        // the bridge (3, 4) contributes weight 1 in each direction between
        // the two coarse nodes, and nothing else crosses communities.
        assert_eq!(coarse.neighbours(0).find(|&(b, _)| b == 1).unwrap().1, 1.0);
        assert_eq!(coarse.neighbours(1).find(|&(a, _)| a == 0).unwrap().1, 1.0);
    }

    #[test]
    fn coarsening_preserves_total_directed_weight() {
        let base = CsrBuilder::from_edge_list(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let adj = WeightedAdjacency::unweighted(&base);
        let community_of = vec![0u32, 0, 1, 1];
        let coarse = coarsen(&adj, &community_of, 2);
        assert_eq!(coarse.total_directed_weight(), adj.total_directed_weight());
    }
}
