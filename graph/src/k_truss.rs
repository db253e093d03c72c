//! k-Truss (§4.7): repeatedly drops edges unsupported by at least `k − 2`
//! triangles among surviving edges, until a fixpoint. Grounded on
//! `original_source`'s k-truss pass description in
//! `libgalois/src/analytics/triangle_count/triangle_count.cpp`'s sibling
//! edge-removal analytics and on spec.md §4.7, which gives the fixpoint
//! loop and core-reduction pre-pass explicitly (no non-goal excludes the
//! validator, so it is implemented for real rather than left a stub).

use crate::parallel::{atomic_sub_u32, parallel_for_each};
use crate::views::{self, ViewData};
use csr::Csr;
use rayon::prelude::*;
use shared::{EdgeT, Error, NodeT, Result};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KTrussPlan {
    k: u32,
    core_reduction: bool,
}

impl KTrussPlan {
    pub fn new(k: u32) -> Self {
        KTrussPlan {
            k,
            core_reduction: true,
        }
    }

    pub fn with_core_reduction(mut self, enabled: bool) -> Self {
        self.core_reduction = enabled;
        self
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn core_reduction(&self) -> bool {
        self.core_reduction
    }
}

/// The outcome of a k-truss run: a removal flag per edge of the *original*
/// `csr` passed to [`run`], indexed by that graph's edge ids.
#[derive(Debug, Clone)]
pub struct KTrussResult {
    removed: Vec<bool>,
}

impl KTrussResult {
    pub fn is_removed(&self, edge: EdgeT) -> bool {
        self.removed[edge as usize]
    }

    pub fn surviving_edge_count(&self) -> u64 {
        self.removed.iter().filter(|&&r| !r).count() as u64
    }
}

fn sorted_by_dest(csr: &Csr) -> (Csr, Vec<EdgeT>) {
    match views::build_edges_sorted_by_dest_id(csr) {
        ViewData::EdgesSortedByDestID { csr, edge_origin } => (csr, edge_origin),
        _ => unreachable!(),
    }
}

/// For every edge `e = (u, v)`, the id of the edge `(v, u)`; requires `csr`
/// to already be symmetric.
fn reverse_edge_index(csr: &Csr) -> Vec<EdgeT> {
    csr.par_iter_node_ids()
        .flat_map_iter(|u| {
            csr.out_edges(u).map(move |e| {
                let v = csr.out_edge_dst(e);
                csr::find_edge(csr, v, u).expect("k-truss requires a symmetric input graph")
            })
        })
        .collect()
}

/// Number of un-removed common neighbors of `u` and `v`, i.e. the number of
/// triangles currently supporting edge `(u, v)`.
fn triangle_support(csr: &Csr, removed: &[bool], u: NodeT, v: NodeT) -> i64 {
    let u_range = csr.out_edges(u);
    let v_range = csr.out_edges(v);
    let u_neighbours = csr.out_neighbours(u);
    let v_neighbours = csr.out_neighbours(v);
    let (mut i, mut j) = (0usize, 0usize);
    let mut count = 0i64;
    while i < u_neighbours.len() && j < v_neighbours.len() {
        if removed[u_range.start as usize + i] {
            i += 1;
            continue;
        }
        if removed[v_range.start as usize + j] {
            j += 1;
            continue;
        }
        match u_neighbours[i].cmp(&v_neighbours[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

/// Drops every edge incident to a node whose un-removed degree falls below
/// `k − 1`, cascading through a work-list until no such node remains. A
/// node whose degree drops under the threshold while a neighbour drains is
/// re-enqueued; duplicate enqueues are harmless because removed edges are
/// skipped.
fn apply_core_reduction(csr: &Csr, reverse: &[EdgeT], removed: &mut [bool], k: u32) {
    let threshold = k - 1;
    let active_degree: Vec<AtomicU32> = (0..csr.num_nodes())
        .map(|v| AtomicU32::new(csr.out_degree(v) as u32))
        .collect();
    let claimed: Vec<AtomicBool> = removed.iter().map(|&r| AtomicBool::new(r)).collect();

    let initial: Vec<NodeT> = (0..csr.num_nodes())
        .filter(|&v| {
            let degree = active_degree[v as usize].load(Ordering::SeqCst);
            degree > 0 && degree < threshold
        })
        .collect();

    parallel_for_each(initial, |&v, ctx| {
        for e in csr.out_edges(v) {
            // claim the undirected pair through its smaller edge id so a
            // racing removal from the other endpoint cannot double-count
            let twin = reverse[e as usize];
            if claimed[e.min(twin) as usize].swap(true, Ordering::SeqCst) {
                continue;
            }
            claimed[e.max(twin) as usize].store(true, Ordering::SeqCst);

            let dst = csr.out_edge_dst(e);
            atomic_sub_u32(&active_degree[v as usize], 1);
            let remaining = atomic_sub_u32(&active_degree[dst as usize], 1) - 1;
            if remaining > 0 && remaining < threshold {
                ctx.push(dst);
            }
        }
    });

    for (slot, flag) in removed.iter_mut().zip(claimed.iter()) {
        *slot = flag.load(Ordering::SeqCst);
    }
}

/// Removes edges from `csr` (which must be symmetric) until every
/// surviving edge is supported by at least `k − 2` triangles among
/// surviving edges. Fails with `InvalidArgument` when `k ≤ 2`.
pub fn run(csr: &Csr, plan: &KTrussPlan) -> Result<KTrussResult> {
    if plan.k() <= 2 {
        return Err(Error::invalid_argument(format!(
            "k-truss requires k > 2, got {}",
            plan.k()
        )));
    }

    let (sorted, edge_origin) = sorted_by_dest(csr);
    let reverse = reverse_edge_index(&sorted);
    let mut removed = vec![false; sorted.num_edges() as usize];

    if plan.core_reduction() {
        apply_core_reduction(&sorted, &reverse, &mut removed, plan.k());
    }

    let min_support = plan.k() as i64 - 2;
    loop {
        let to_remove: Vec<EdgeT> = sorted.par_iter_node_ids()
            .flat_map_iter(|u| {
                let removed = &removed;
                let sorted = &sorted;
                sorted.out_edges(u).filter_map(move |e| {
                    if removed[e as usize] {
                        return None;
                    }
                    let v = sorted.out_edge_dst(e);
                    if v <= u {
                        return None;
                    }
                    let support = triangle_support(sorted, removed, u, v);
                    (support < min_support).then_some(e)
                })
            })
            .collect();

        if to_remove.is_empty() {
            break;
        }
        for e in to_remove {
            removed[e as usize] = true;
            removed[reverse[e as usize] as usize] = true;
        }
    }

    let mut removed_by_origin = vec![false; csr.num_edges() as usize];
    for (sorted_edge, &original_edge) in edge_origin.iter().enumerate() {
        removed_by_origin[original_edge as usize] = removed[sorted_edge];
    }
    Ok(KTrussResult {
        removed: removed_by_origin,
    })
}

/// Verifies that every surviving edge of `result` is supported by at least
/// `k − 2` triangles among surviving edges. `original_source`'s
/// `KTrussAssertValid` is a no-op stub; this gives it a real body.
pub fn assert_valid(csr: &Csr, result: &KTrussResult, k: u32) -> Result<()> {
    if k <= 2 {
        return Err(Error::invalid_argument(format!(
            "k-truss requires k > 2, got {}",
            k
        )));
    }
    let (sorted, edge_origin) = sorted_by_dest(csr);
    let removed: Vec<bool> = edge_origin
        .iter()
        .map(|&original| result.removed[original as usize])
        .collect();

    let min_support = k as i64 - 2;
    for u in 0..sorted.num_nodes() {
        for e in sorted.out_edges(u) {
            if removed[e as usize] {
                continue;
            }
            let v = sorted.out_edge_dst(e);
            if v <= u {
                continue;
            }
            let support = triangle_support(&sorted, &removed, u, v);
            if support < min_support {
                return Err(Error::assertion_failed(format!(
                    "surviving edge ({}, {}) has support {} < k-2={}",
                    u, v, support, min_support
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use csr::CsrBuilder;

    /// `{0,1,2,3}` fully connected, plus a pendant edge `(3,4)`.
    fn four_clique_with_pendant() -> Csr {
        let mut edges = Vec::new();
        for &(a, b) in &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            edges.push((a, b));
            edges.push((b, a));
        }
        edges.push((3, 4));
        edges.push((4, 3));
        CsrBuilder::from_edge_list(5, &edges).unwrap()
    }

    #[test]
    fn k_equal_two_is_rejected() {
        let graph = four_clique_with_pendant();
        let err = run(&graph, &KTrussPlan::new(2)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn k_three_and_four_keep_exactly_the_clique_edges() {
        let graph = four_clique_with_pendant();
        for k in [3u32, 4] {
            let result = run(&graph, &KTrussPlan::new(k)).unwrap();
            assert_valid(&graph, &result, k).unwrap();
            assert_eq!(result.surviving_edge_count(), 12, "k={}", k);
            assert!(!result.is_removed(0), "the first clique edge survives at k={}", k);
        }
    }

    #[test]
    fn k_five_removes_every_edge() {
        let graph = four_clique_with_pendant();
        let result = run(&graph, &KTrussPlan::new(5)).unwrap();
        assert_valid(&graph, &result, 5).unwrap();
        assert_eq!(result.surviving_edge_count(), 0);
    }

    #[test]
    fn disabling_core_reduction_does_not_change_the_outcome() {
        let graph = four_clique_with_pendant();
        let with_core = run(&graph, &KTrussPlan::new(3)).unwrap();
        let without_core = run(&graph, &KTrussPlan::new(3).with_core_reduction(false)).unwrap();
        assert_eq!(
            with_core.surviving_edge_count(),
            without_core.surviving_edge_count()
        );
    }
}
