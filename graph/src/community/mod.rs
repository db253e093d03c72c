//! Louvain and Leiden community detection (§4.6): both optimize modularity
//! on a weighted undirected graph via vertex-move rounds, coarsening, and
//! an optional deterministic schedule. Leiden adds a refinement phase.

pub mod coarsen;
pub mod leiden;
pub mod louvain;
pub mod modularity;
pub mod plan;
pub mod stats;

pub use plan::{CommunityAlgorithm, LeidenPlan, LouvainPlan};
pub use stats::CommunityStatistics;

use csr::Csr;
use shared::{EdgeT, NodeT, WeightT};
use shared::{Error, Result};

/// A symmetrized, weighted adjacency: every undirected edge appears once
/// per endpoint so that `Σ neighbours(v)` already gives the ordered-pair
/// sum the modularity formula of §4.6 is defined over. Built once from a
/// [`Csr`] and an edge-weight lookup; immutable thereafter, like the base
/// topology it is derived from.
#[derive(Debug, Clone)]
pub struct WeightedAdjacency {
    out_indices: Vec<EdgeT>,
    out_dests: Vec<NodeT>,
    out_weights: Vec<WeightT>,
}

impl WeightedAdjacency {
    /// Symmetrizes `base` and attaches a weight to every resulting
    /// directed entry via `edge_weight(original_edge_id)`. Fails with
    /// `InvalidArgument` on a non-finite weight.
    pub fn from_csr(base: &Csr, edge_weight: impl Fn(EdgeT) -> WeightT) -> Result<Self> {
        let undirected = csr::symmetrize(base);
        let csr = undirected.csr();
        let mut out_weights = Vec::with_capacity(csr.num_edges() as usize);
        for e in 0..csr.num_edges() {
            let w = edge_weight(undirected.origin_edge(e));
            if !w.is_finite() {
                return Err(Error::invalid_argument(format!(
                    "edge weight {} for edge {} is not finite",
                    w, e
                )));
            }
            out_weights.push(w);
        }
        Ok(WeightedAdjacency {
            out_indices: csr.out_indices().to_vec(),
            out_dests: csr.out_dests().to_vec(),
            out_weights,
        })
    }

    /// All weights default to `1.0`, for an unweighted graph.
    pub fn unweighted(base: &Csr) -> Self {
        WeightedAdjacency::from_csr(base, |_| 1.0).expect("a constant weight is always finite")
    }

    pub fn num_nodes(&self) -> NodeT {
        (self.out_indices.len() - 1) as NodeT
    }

    pub fn num_directed_entries(&self) -> EdgeT {
        self.out_dests.len() as EdgeT
    }

    #[inline(always)]
    pub fn neighbours(&self, v: NodeT) -> impl Iterator<Item = (NodeT, WeightT)> + '_ {
        let start = self.out_indices[v as usize] as usize;
        let end = self.out_indices[v as usize + 1] as usize;
        self.out_dests[start..end]
            .iter()
            .zip(self.out_weights[start..end].iter())
            .map(|(&dst, &w)| (dst, w))
    }

    pub fn weighted_degree(&self, v: NodeT) -> WeightT {
        self.neighbours(v).map(|(_, w)| w).sum()
    }

    /// `2m`: the sum of every directed entry's weight, i.e. twice the total
    /// undirected edge weight (§4.6's `m`).
    pub fn total_directed_weight(&self) -> WeightT {
        self.out_weights.iter().sum()
    }
}

/// The outcome of a completed Louvain or Leiden run: one community id per
/// original node, in `[0, num_communities)`.
#[derive(Debug, Clone)]
pub struct CommunityResult {
    pub community_of: Vec<u32>,
    pub num_communities: u32,
    pub modularity: f64,
}

/// Checks the invariant §4.6's output contract promises: every community
/// id lies in `[0, num_communities)`. `original_source`'s
/// `LouvainClusteringAssertValid`/`LeidenClusteringAssertValid` are no-op
/// stubs; this gives the signature a real body.
pub fn assert_valid(result: &CommunityResult) -> Result<()> {
    if let Some(&bad) = result
        .community_of
        .iter()
        .find(|&&c| c >= result.num_communities)
    {
        return Err(Error::assertion_failed(format!(
            "community id {} is outside [0, {})",
            bad, result.num_communities
        )));
    }
    Ok(())
}

/// Renumbers an arbitrary (possibly sparse) community labeling to a
/// contiguous `[0, K)`, preserving the relative order of first appearance.
pub(crate) fn renumber_contiguous(labels: &[u32]) -> Vec<u32> {
    let mut next_id = 0u32;
    let mut remap: hashbrown::HashMap<u32, u32> = hashbrown::HashMap::new();
    labels
        .iter()
        .map(|&label| {
            *remap.entry(label).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csr::CsrBuilder;

    #[test]
    fn unweighted_adjacency_symmetrizes_the_base_graph() {
        let base = CsrBuilder::from_edge_list(3, &[(0, 1), (1, 2)]).unwrap();
        let adj = WeightedAdjacency::unweighted(&base);
        assert_eq!(adj.weighted_degree(0), 1.0);
        assert_eq!(adj.weighted_degree(1), 2.0);
        assert_eq!(adj.total_directed_weight(), 4.0);
    }

    #[test]
    fn renumber_contiguous_preserves_first_appearance_order() {
        let labels = vec![7, 7, 3, 3, 9];
        assert_eq!(renumber_contiguous(&labels), vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn assert_valid_catches_an_out_of_range_community_id() {
        let result = CommunityResult {
            community_of: vec![0, 5],
            num_communities: 2,
            modularity: 0.0,
        };
        assert!(assert_valid(&result).is_err());
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let base = CsrBuilder::from_edge_list(2, &[(0, 1)]).unwrap();
        let err = WeightedAdjacency::from_csr(&base, |_| f64::NAN).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
