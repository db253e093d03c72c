//! Modularity computation (§4.6).
//!
//! `Q(C) = (1/2m) Σ_{u,v} [A(u,v) - k_u·k_v/2m] δ(C(u),C(v))`, computed per
//! community and summed: the first term is each community's share of
//! intra-community directed weight over `2m`; the second is the squared
//! share of the community's total weighted degree over `2m`.

use super::WeightedAdjacency;
use crate::parallel::{parallel_for, Reducer};

pub fn modularity(adj: &WeightedAdjacency, community_of: &[u32]) -> f64 {
    let m2 = adj.total_directed_weight();
    if m2 == 0.0 {
        return 0.0;
    }

    let num_communities = community_of.iter().copied().max().map_or(0, |m| m + 1) as usize;
    let reducer = Reducer::new(
        (vec![0.0f64; num_communities], vec![0.0f64; num_communities]),
        |(mut intra_a, mut degree_a), (intra_b, degree_b)| {
            for (a, b) in intra_a.iter_mut().zip(intra_b) {
                *a += b;
            }
            for (a, b) in degree_a.iter_mut().zip(degree_b) {
                *a += b;
            }
            (intra_a, degree_a)
        },
    );
    parallel_for(0..adj.num_nodes(), |v| {
        reducer.update(|(intra_weight, degree_sum)| {
            let c = community_of[v as usize] as usize;
            for (u, w) in adj.neighbours(v) {
                degree_sum[c] += w;
                if community_of[u as usize] as usize == c {
                    intra_weight[c] += w;
                }
            }
        });
    });
    let (intra_weight, degree_sum) = reducer.reduce();

    intra_weight
        .iter()
        .zip(degree_sum.iter())
        .map(|(&intra, &degree)| intra / m2 - (degree / m2).powi(2))
        .sum()
}

/// The modularity gain of moving `v` from its current community to `target`,
/// per §4.6's `ΔQ(v → C)` formula. `neighbour_community_weight` is the sum
/// of edge weights from `v` to nodes currently in `target`;
/// `self_loop_weight` is `σ(v)`; `current_community` is `v`'s community
/// before the move. `resolution` scales the null-model term (1.0 for plain
/// Louvain; Leiden plans may raise or lower it).
#[allow(clippy::too_many_arguments)]
pub fn modularity_gain(
    neighbour_community_weight: f64,
    self_loop_weight: f64,
    node_degree_weight: f64,
    target_degree_weight_sum: f64,
    target: u32,
    current_community: u32,
    m2: f64,
    resolution: f64,
) -> f64 {
    let m = m2 / 2.0;
    let is_current = target == current_community;
    let e_term = neighbour_community_weight - if is_current { self_loop_weight } else { 0.0 };
    let remaining_degree_sum = if is_current {
        target_degree_weight_sum - node_degree_weight
    } else {
        target_degree_weight_sum
    };
    e_term / m - resolution * (node_degree_weight * remaining_degree_sum) / (2.0 * m * m)
}

pub(crate) fn initial_degree_weights(adj: &WeightedAdjacency) -> Vec<f64> {
    (0..adj.num_nodes()).map(|v| adj.weighted_degree(v)).collect()
}
