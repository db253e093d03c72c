//! Louvain community detection (§4.6): repeated vertex-move rounds per
//! level, then renumber and coarsen, until the per-level or cross-level
//! modularity gain falls below threshold.

use super::modularity::{initial_degree_weights, modularity, modularity_gain};
use super::plan::{CommunityAlgorithm, LouvainPlan};
use super::{coarsen::coarsen, renumber_contiguous, CommunityResult, WeightedAdjacency};
use crate::parallel::{
    atomic_add_u32, atomic_sub_u32, parallel_for, AtomicF64, InsertBag, PerThreadStorage,
};
use crate::progress::get_loading_bar;
use hashbrown::HashMap;
use shared::{NodeT, Result, NOT_PRESENT};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Per-community aggregates, structs-of-arrays so independent fields
/// reduce independently, per the community-info-arrays design note.
struct CommunityInfo {
    size: Vec<AtomicU32>,
    degree_weight_sum: Vec<AtomicF64>,
}

impl CommunityInfo {
    /// Aggregates over the starting partition: each community opens with
    /// the nodes assigned to it and the sum of their weighted degrees.
    fn from_partition(num_slots: usize, community_of: &[u32], degree_weight: &[f64]) -> Self {
        let mut size = vec![0u32; num_slots];
        let mut degree_sum = vec![0.0f64; num_slots];
        for (v, &c) in community_of.iter().enumerate() {
            size[c as usize] += 1;
            degree_sum[c as usize] += degree_weight[v];
        }
        CommunityInfo {
            size: size.into_iter().map(AtomicU32::new).collect(),
            degree_weight_sum: degree_sum.into_iter().map(AtomicF64::new).collect(),
        }
    }

    fn zeroed(num_slots: usize) -> Self {
        CommunityInfo {
            size: (0..num_slots).map(|_| AtomicU32::new(0)).collect(),
            degree_weight_sum: (0..num_slots).map(|_| AtomicF64::new(0.0)).collect(),
        }
    }

    fn move_node(&self, old: u32, new: u32, node_degree_weight: f64) {
        atomic_sub_u32(&self.size[old as usize], 1);
        atomic_add_u32(&self.size[new as usize], 1);
        self.degree_weight_sum[old as usize].fetch_add(-node_degree_weight);
        self.degree_weight_sum[new as usize].fetch_add(node_degree_weight);
    }
}

/// For node `v`, returns the best target community and its `ΔQ`, per the
/// move rule of §4.6 step 1: largest `ΔQ`, ties broken by smaller id, only
/// proposed when `ΔQ > 0` and the target differs from `v`'s community.
///
/// The neighbour-community weight map lives in per-worker scratch storage
/// so each worker reuses one allocation across all of its nodes.
#[allow(clippy::too_many_arguments)]
fn best_move(
    adj: &WeightedAdjacency,
    community_of: &[AtomicU32],
    info: &CommunityInfo,
    degree_weight: &[f64],
    scratch: &PerThreadStorage<HashMap<u32, f64>>,
    v: NodeT,
    m2: f64,
    resolution: f64,
) -> Option<u32> {
    let current = community_of[v as usize].load(Ordering::SeqCst);
    scratch.with(|neighbour_weight| {
        neighbour_weight.clear();
        let mut self_loop_weight = 0.0;
        for (u, w) in adj.neighbours(v) {
            if u == v {
                self_loop_weight += w;
            }
            let c = community_of[u as usize].load(Ordering::SeqCst);
            *neighbour_weight.entry(c).or_insert(0.0) += w;
        }

        let mut best: Option<(u32, f64)> = None;
        for (&candidate, &weight) in neighbour_weight.iter() {
            let target_degree_sum = info.degree_weight_sum[candidate as usize].load();
            let gain = modularity_gain(
                weight,
                self_loop_weight,
                degree_weight[v as usize],
                target_degree_sum,
                candidate,
                current,
                m2,
                resolution,
            );
            let better = match best {
                None => true,
                Some((best_c, best_gain)) => {
                    gain > best_gain || (gain == best_gain && candidate < best_c)
                }
            };
            if better {
                best = Some((candidate, gain));
            }
        }

        match best {
            Some((candidate, gain)) if candidate != current && gain > 0.0 => Some(candidate),
            _ => None,
        }
    })
}

/// One do-all round: every node races to compute and commit its move, with
/// community info adjusted by atomic read-modify-write in flight. The
/// interleaving is unspecified, which is exactly the non-deterministic
/// variant's contract.
#[allow(clippy::too_many_arguments)]
fn do_all_round(
    adj: &WeightedAdjacency,
    community_of: &[AtomicU32],
    info: &CommunityInfo,
    degree_weight: &[f64],
    scratch: &PerThreadStorage<HashMap<u32, f64>>,
    m2: f64,
    resolution: f64,
) {
    parallel_for(0..adj.num_nodes(), |v| {
        if let Some(target) = best_move(
            adj,
            community_of,
            info,
            degree_weight,
            scratch,
            v,
            m2,
            resolution,
        ) {
            let current = community_of[v as usize].load(Ordering::SeqCst);
            if target != current {
                info.move_node(current, target, degree_weight[v as usize]);
                community_of[v as usize].store(target, Ordering::SeqCst);
            }
        }
    });
}

/// One deterministic round: nodes are partitioned into buckets by
/// `v mod bucket_count`; within a bucket all target moves are computed
/// against the same committed state, assignments and community-info deltas
/// are applied only at the bucket boundary. Additions and subtractions
/// accumulate separately and fold into the live info arrays once per
/// touched community, so the result is independent of thread count.
#[allow(clippy::too_many_arguments)]
fn deterministic_round(
    adj: &WeightedAdjacency,
    community_of: &[AtomicU32],
    info: &CommunityInfo,
    degree_weight: &[f64],
    scratch: &PerThreadStorage<HashMap<u32, f64>>,
    m2: f64,
    resolution: f64,
    bucket_count: u32,
) {
    let n = adj.num_nodes();
    let bucket_count = bucket_count.max(1);
    let local_target: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(NOT_PRESENT)).collect();
    let update_add = CommunityInfo::zeroed(n as usize);
    let update_subtract = CommunityInfo::zeroed(n as usize);
    let touched: Vec<AtomicBool> = (0..n).map(|_| AtomicBool::new(false)).collect();

    for bucket in 0..bucket_count {
        let to_process: InsertBag<u32> = InsertBag::new();
        parallel_for(0..n, |v| {
            if v % bucket_count != bucket {
                return;
            }
            match best_move(
                adj,
                community_of,
                info,
                degree_weight,
                scratch,
                v,
                m2,
                resolution,
            ) {
                Some(target) => {
                    let current = community_of[v as usize].load(Ordering::SeqCst);
                    local_target[v as usize].store(target, Ordering::SeqCst);
                    atomic_add_u32(&update_add.size[target as usize], 1);
                    update_add.degree_weight_sum[target as usize]
                        .fetch_add(degree_weight[v as usize]);
                    atomic_add_u32(&update_subtract.size[current as usize], 1);
                    update_subtract.degree_weight_sum[current as usize]
                        .fetch_add(degree_weight[v as usize]);
                    if !touched[target as usize].swap(true, Ordering::SeqCst) {
                        to_process.push(target);
                    }
                    if !touched[current as usize].swap(true, Ordering::SeqCst) {
                        to_process.push(current);
                    }
                }
                None => local_target[v as usize].store(NOT_PRESENT, Ordering::SeqCst),
            }
        });

        // commit this bucket's assignments
        parallel_for(0..n, |v| {
            if v % bucket_count != bucket {
                return;
            }
            let target = local_target[v as usize].load(Ordering::SeqCst);
            if target != NOT_PRESENT {
                community_of[v as usize].store(target, Ordering::SeqCst);
            }
        });

        // fold the bucket's deltas into the live info arrays and reset the
        // accumulators for the next bucket
        for c in to_process.into_vec() {
            let c = c as usize;
            atomic_add_u32(&info.size[c], update_add.size[c].swap(0, Ordering::SeqCst));
            atomic_sub_u32(
                &info.size[c],
                update_subtract.size[c].swap(0, Ordering::SeqCst),
            );
            info.degree_weight_sum[c].fetch_add(update_add.degree_weight_sum[c].swap(0.0));
            info.degree_weight_sum[c].fetch_add(-update_subtract.degree_weight_sum[c].swap(0.0));
            touched[c].store(false, Ordering::SeqCst);
        }
    }
}

/// Runs vertex-move rounds to convergence at one level, starting from
/// `seed` (or every node in its own community when absent), and returns a
/// contiguously renumbered community assignment.
pub(crate) fn run_level_from(
    adj: &WeightedAdjacency,
    plan: &LouvainPlan,
    resolution: f64,
    seed: Option<Vec<u32>>,
) -> Vec<u32> {
    let n = adj.num_nodes();
    let initial = seed.unwrap_or_else(|| (0..n).collect());
    let m2 = adj.total_directed_weight();
    if m2 == 0.0 {
        return renumber_contiguous(&initial);
    }

    let degree_weight = initial_degree_weights(adj);
    let community_of: Vec<AtomicU32> = initial.iter().map(|&c| AtomicU32::new(c)).collect();
    let info = CommunityInfo::from_partition(n as usize, &initial, &degree_weight);
    let scratch: PerThreadStorage<HashMap<u32, f64>> = PerThreadStorage::new(|_| HashMap::new());

    let snapshot =
        |slots: &[AtomicU32]| -> Vec<u32> { slots.iter().map(|c| c.load(Ordering::SeqCst)).collect() };

    let mut previous_q = modularity(adj, &snapshot(&community_of));
    let progress = get_loading_bar(
        plan.verbose(),
        "Running Louvain level",
        plan.max_iterations() as u64,
    );
    for _ in 0..plan.max_iterations() {
        progress.inc(1);
        match plan.algorithm() {
            CommunityAlgorithm::DoAll => do_all_round(
                adj,
                &community_of,
                &info,
                &degree_weight,
                &scratch,
                m2,
                resolution,
            ),
            CommunityAlgorithm::Deterministic { bucket_count } => deterministic_round(
                adj,
                &community_of,
                &info,
                &degree_weight,
                &scratch,
                m2,
                resolution,
                bucket_count,
            ),
        }

        let q = modularity(adj, &snapshot(&community_of));
        let converged = q - previous_q < plan.modularity_threshold_per_round();
        previous_q = q;
        if converged {
            break;
        }
    }
    progress.finish_and_clear();

    renumber_contiguous(&snapshot(&community_of))
}

/// Pre-merges degree-1 chains into their unique neighbor's community
/// before level 0, when `enable_vertex_following` is set.
fn apply_vertex_following(adj: &WeightedAdjacency) -> Vec<u32> {
    let n = adj.num_nodes();
    let mut community_of: Vec<u32> = (0..n).collect();
    for v in 0..n {
        let mut unique_neighbour = NOT_PRESENT;
        let mut follows = true;
        for (u, _) in adj.neighbours(v) {
            if u == v {
                continue;
            }
            if unique_neighbour == NOT_PRESENT {
                unique_neighbour = u;
            } else if unique_neighbour != u {
                follows = false;
                break;
            }
        }
        if follows && unique_neighbour != NOT_PRESENT {
            community_of[v as usize] = unique_neighbour;
        }
    }
    renumber_contiguous(&community_of)
}

/// Runs Louvain end to end: level 0 (optionally preceded by vertex
/// following), renumber, coarsen, repeat until the cross-level gain falls
/// below `modularity_threshold_total` or the graph has shrunk to
/// `min_graph_size` nodes or fewer.
pub fn run(adj0: &WeightedAdjacency, plan: &LouvainPlan) -> Result<CommunityResult> {
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

    if plan.enable_vertex_following() {
        let followed = apply_vertex_following(&current);
        for slot in assignment.iter_mut() {
            *slot = followed[*slot as usize];
        }
        let num_communities = followed.iter().copied().max().map_or(0, |m| m + 1);
        current = coarsen(&current, &followed, num_communities);
    }

    let initial_q = modularity(&current, &(0..current.num_nodes()).collect::<Vec<_>>());
    let mut previous_total_q = initial_q;

    loop {
        let level_communities = run_level_from(&current, plan, 1.0, None);
        let num_communities = level_communities.iter().copied().max().map_or(0, |m| m + 1);
        for slot in assignment.iter_mut() {
            *slot = level_communities[*slot as usize];
        }

        let level_q = modularity(&current, &level_communities);
        let total_gain = level_q - previous_total_q;
        previous_total_q = level_q;

        let converged = num_communities == current.num_nodes()
            || current.num_nodes() as u32 <= plan.min_graph_size()
            || total_gain < plan.modularity_threshold_total();
        if converged {
            break;
        }
        current = coarsen(&current, &level_communities, num_communities);
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
