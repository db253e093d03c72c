//! Leiden community detection (§4.6): Louvain's vertex-move phase followed
//! by a refinement phase that assigns each node to a sub-community inside
//! its current community, preventing the degenerate "everything merges"
//! partitions plain Louvain occasionally returns. Coarsening contracts
//! sub-communities, and each coarse node inherits the community id of the
//! sub-community it represents so merged sub-communities may re-merge at
//! the next level.

use super::coarsen::coarsen;
use super::louvain::run_level_from;
use super::modularity::modularity;
use super::plan::LeidenPlan;
use super::{renumber_contiguous, CommunityResult, WeightedAdjacency};
use hashbrown::HashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shared::{NodeT, Result};

/// Refines `current_community` into sub-communities. Every node starts as
/// its own sub-community; a node may only move to a sub-community already
/// contained in its own current community, and only while it is still a
/// singleton (breaking up an existing merge can only lower the final
/// modularity). Targets are drawn with probability proportional to
/// `exp(ΔQ / randomness)` among candidates with non-negative gain, with
/// `resolution` scaling the null-model term.
///
/// Per-sub-community degree and node-weight sums are maintained across
/// moves; the node-weight sums are returned so the caller can weight the
/// coarse nodes without a second pass.
fn refine(
    adj: &WeightedAdjacency,
    current_community: &[u32],
    node_weight: &[f64],
    resolution: f64,
    randomness: f64,
) -> (Vec<u32>, Vec<f64>) {
    let n = adj.num_nodes();
    let mut sub_community: Vec<u32> = (0..n).collect();
    let mut sub_node_weight_sum = node_weight.to_vec();
    let m2 = adj.total_directed_weight();
    if m2 == 0.0 {
        return (sub_community, sub_node_weight_sum);
    }
    let m = m2 / 2.0;

    let degree_weight: Vec<f64> = (0..n).map(|v| adj.weighted_degree(v)).collect();
    let mut sub_degree_sum = degree_weight.clone();
    let mut sub_size: Vec<u32> = vec![1; n as usize];

    // visiting nodes community by community keeps the schedule
    // reproducible and the candidate sets hot.
    let mut order: Vec<NodeT> = (0..n).collect();
    order.sort_by_key(|&v| (current_community[v as usize], v));

    let temperature = randomness.max(1e-9);
    let mut candidate_weight: HashMap<u32, f64> = HashMap::new();
    let mut candidates: Vec<(u32, f64)> = Vec::new();

    for &v in &order {
        let own_community = current_community[v as usize];
        let own_sub = sub_community[v as usize];
        if sub_size[own_sub as usize] > 1 {
            continue;
        }

        candidate_weight.clear();
        for (u, w) in adj.neighbours(v) {
            if u == v {
                continue;
            }
            if current_community[u as usize] == own_community {
                *candidate_weight
                    .entry(sub_community[u as usize])
                    .or_insert(0.0) += w;
            }
        }

        candidates.clear();
        for (&sub, &weight) in candidate_weight.iter() {
            if sub == own_sub {
                continue;
            }
            let gain = weight / m
                - resolution * degree_weight[v as usize] * sub_degree_sum[sub as usize]
                    / (2.0 * m * m);
            if gain >= 0.0 {
                candidates.push((sub, gain));
            }
        }
        if candidates.is_empty() {
            continue;
        }
        candidates.push((own_sub, 0.0));
        candidates.sort_by_key(|&(sub, _)| sub);

        // softmax over exp(gain / temperature); exponents are shifted by
        // their maximum so the weights stay finite at low temperatures.
        let max_exponent = candidates
            .iter()
            .map(|&(_, gain)| gain / temperature)
            .fold(f64::MIN, f64::max);
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&(_, gain)| (gain / temperature - max_exponent).exp())
            .collect();
        let total: f64 = weights.iter().sum();

        let mut rng = SmallRng::seed_from_u64(v as u64);
        let pick: f64 = rng.gen_range(0.0, total);
        let mut chosen = own_sub;
        let mut acc = 0.0;
        for (&(sub, _), &weight) in candidates.iter().zip(weights.iter()) {
            acc += weight;
            if pick <= acc {
                chosen = sub;
                break;
            }
        }

        if chosen != own_sub {
            sub_degree_sum[own_sub as usize] -= degree_weight[v as usize];
            sub_node_weight_sum[own_sub as usize] -= node_weight[v as usize];
            sub_size[own_sub as usize] -= 1;
            sub_degree_sum[chosen as usize] += degree_weight[v as usize];
            sub_node_weight_sum[chosen as usize] += node_weight[v as usize];
            sub_size[chosen as usize] += 1;
            sub_community[v as usize] = chosen;
        }
    }

    (sub_community, sub_node_weight_sum)
}

pub fn run(adj0: &WeightedAdjacency, plan: &LeidenPlan) -> Result<CommunityResult> {
    let n = adj0.num_nodes();
    if adj0.total_directed_weight() == 0.0 {
        return Ok(CommunityResult {
            community_of: (0..n).collect(),
            num_communities: n,
            modularity: 0.0,
        });
    }

    let mut assignment: Vec<u32> = (0..n).collect();
    let mut current = adj0.clone();
    let mut node_weight: Vec<f64> = vec![1.0; n as usize];
    // community ids the next level's nodes start from, so sub-communities
    // split off during refinement may re-merge later
    let mut inherited: Option<Vec<u32>> = None;
    let mut previous_q = modularity(&current, &(0..current.num_nodes()).collect::<Vec<_>>());

    loop {
        let current_community =
            run_level_from(&current, plan.louvain(), plan.resolution(), inherited.take());
        let (raw_sub, sub_weight) = refine(
            &current,
            &current_community,
            &node_weight,
            plan.resolution(),
            plan.randomness(),
        );
        let refined = renumber_contiguous(&raw_sub);
        let num_sub = refined.iter().copied().max().map_or(0, |m| m + 1);

        for slot in assignment.iter_mut() {
            *slot = refined[*slot as usize];
        }

        let level_q = modularity(&current, &current_community);
        let total_gain = level_q - previous_q;
        previous_q = level_q;

        let converged = num_sub == current.num_nodes()
            || current.num_nodes() as u32 <= plan.louvain().min_graph_size()
            || total_gain < plan.louvain().modularity_threshold_total();

        // contract sub-communities; each coarse node keeps the community
        // id and accumulated weight of the sub-community it represents
        let mut parent = vec![0u32; num_sub as usize];
        let mut coarse_weight = vec![0.0f64; num_sub as usize];
        for v in 0..current.num_nodes() as usize {
            parent[refined[v] as usize] = current_community[v];
            coarse_weight[refined[v] as usize] = sub_weight[raw_sub[v] as usize];
        }
        current = coarsen(&current, &refined, num_sub);
        node_weight = coarse_weight;
        inherited = Some(renumber_contiguous(&parent));

        if converged {
            break;
        }
    }

    // one final pass of Louvain-style moves on the coarsened graph, seeded
    // with the inherited communities, lifted back to the original nodes
    let final_level = run_level_from(&current, plan.louvain(), plan.resolution(), inherited.take());
    for slot in assignment.iter_mut() {
        *slot = final_level[*slot as usize];
    }

    let final_assignment = renumber_contiguous(&assignment);
    let num_communities = final_assignment.iter().copied().max().map_or(0, |m| m + 1);
    let final_modularity = modularity(adj0, &final_assignment);

    Ok(CommunityResult {
        community_of: final_assignment,
        num_communities,
        modularity: final_modularity,
    })
}
