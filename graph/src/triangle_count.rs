//! Triangle counting (§4.7): three interchangeable algorithms over a
//! symmetric graph's sorted adjacency, grounded on `original_source`'s
//! `libgalois/src/analytics/triangle_count/triangle_count.cpp`
//! (`OrderedCountAlgo`, `NodeIteratingAlgo`, `EdgeIteratingAlgo`) and the
//! GAP benchmark suite's `tc.cc`, which that file credits for the
//! relabeling heuristic.
//!
//! Every algorithm here assumes its input is already symmetric (every edge
//! has a reverse); callers pass a topology built via [`csr::symmetrize`] or
//! an equivalently symmetric loader output.

use crate::views::{self, ViewData};
use csr::Csr;
use rayon::prelude::*;
use shared::{NodeT, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleCountAlgorithm {
    OrderedCount,
    NodeIteration,
    EdgeIteration,
}

/// Whether to relabel nodes by ascending degree before counting.
/// Relabeling speeds up skewed (power-law-like) degree distributions but
/// costs an extra pass on near-uniform ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relabeling {
    Relabel,
    NoRelabel,
    /// Runs [`is_approximate_degree_distribution_power_law`] and relabels
    /// only when it fires.
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleCountPlan {
    algorithm: TriangleCountAlgorithm,
    relabeling: Relabeling,
}

impl TriangleCountPlan {
    fn new(algorithm: TriangleCountAlgorithm) -> Self {
        TriangleCountPlan {
            algorithm,
            relabeling: Relabeling::Auto,
        }
    }

    pub fn ordered_count() -> Self {
        TriangleCountPlan::new(TriangleCountAlgorithm::OrderedCount)
    }

    pub fn node_iteration() -> Self {
        TriangleCountPlan::new(TriangleCountAlgorithm::NodeIteration)
    }

    pub fn edge_iteration() -> Self {
        TriangleCountPlan::new(TriangleCountAlgorithm::EdgeIteration)
    }

    pub fn with_relabeling(mut self, relabeling: Relabeling) -> Self {
        self.relabeling = relabeling;
        self
    }

    pub fn algorithm(&self) -> TriangleCountAlgorithm {
        self.algorithm
    }

    pub fn relabeling(&self) -> Relabeling {
        self.relabeling
    }
}

/// Ported from the GAP benchmark suite's `WorthRelabelling`: a sample of
/// node degrees is worth relabeling for when its mean sits well above its
/// median, the signature of a power-law-like tail dominating the average.
/// Samples are taken at an even stride rather than GAP's random picker, so
/// the result is reproducible for a fixed graph.
pub fn is_approximate_degree_distribution_power_law(csr: &Csr) -> bool {
    let n = csr.num_nodes();
    if n == 0 {
        return false;
    }
    let average_degree = csr.num_edges() / n as u64;
    if average_degree < 10 {
        return false;
    }

    let num_samples = (n as usize).min(1000);
    let stride = (n as usize / num_samples).max(1);
    let mut samples: Vec<u64> = (0..num_samples)
        .map(|i| csr.out_degree(((i * stride) % n as usize) as NodeT))
        .collect();
    samples.sort_unstable();

    let sample_total: u64 = samples.iter().sum();
    let sample_average = sample_total as f64 / samples.len() as f64;
    let sample_median = samples[samples.len() / 2] as f64;
    sample_average / 1.3 > sample_median
}

fn sorted_for_counting(csr: &Csr, relabel: bool) -> Csr {
    if relabel {
        match views::build_nodes_sorted_by_degree_edges_sorted_by_dest_id(csr) {
            ViewData::NodesSortedByDegreeEdgesSortedByDestID { relabeled } => relabeled.csr,
            _ => unreachable!(),
        }
    } else {
        match views::build_edges_sorted_by_dest_id(csr) {
            ViewData::EdgesSortedByDestID { csr, .. } => csr,
            _ => unreachable!(),
        }
    }
}

fn should_relabel(csr: &Csr, relabeling: Relabeling) -> bool {
    match relabeling {
        Relabeling::Relabel => true,
        Relabeling::NoRelabel => false,
        Relabeling::Auto => is_approximate_degree_distribution_power_law(csr),
    }
}

/// Counts undirected triangles in `csr`, which must already be symmetric.
pub fn count(csr: &Csr, plan: &TriangleCountPlan) -> Result<u64> {
    let relabel = should_relabel(csr, plan.relabeling());
    let sorted = sorted_for_counting(csr, relabel);
    Ok(match plan.algorithm() {
        TriangleCountAlgorithm::OrderedCount => ordered_count(&sorted),
        TriangleCountAlgorithm::NodeIteration => node_iteration(&sorted),
        TriangleCountAlgorithm::EdgeIteration => edge_iteration(&sorted),
    })
}

/// For each node `n`, walk neighbors `v ≤ n`; for each neighbor `u ≤ v` of
/// `v`, advance a pointer into `n`'s sorted neighbor list until it reaches
/// `u`, counting a triangle on a match and skipping past duplicate
/// destinations so repeated edges aren't over-counted.
fn ordered_count(csr: &Csr) -> u64 {
    csr.par_iter_node_ids()
        .map(|n| {
            let n_neighbours = csr.out_neighbours(n);
            let mut count = 0u64;
            for &v in n_neighbours {
                if v > n {
                    break;
                }
                let mut pointer = 0usize;
                for &u in csr.out_neighbours(v) {
                    if u > v {
                        break;
                    }
                    while pointer < n_neighbours.len() && n_neighbours[pointer] < u {
                        pointer += 1;
                    }
                    if pointer < n_neighbours.len() && n_neighbours[pointer] == u {
                        count += 1;
                        while pointer < n_neighbours.len() && n_neighbours[pointer] == u {
                            pointer += 1;
                        }
                    }
                }
            }
            count
        })
        .sum()
}

/// For each node `n`, splits its sorted neighbor list at `n` into the
/// "less than" and "greater than" halves, then binary-searches for an edge
/// between every cross pair — each match is the triangle `(a, n, b)` with
/// `a < n < b`, counted exactly once.
fn node_iteration(csr: &Csr) -> u64 {
    csr.par_iter_node_ids()
        .map(|n| {
            let neighbours = csr.out_neighbours(n);
            let less_end = neighbours.partition_point(|&v| v < n);
            let greater_start = if neighbours.get(less_end) == Some(&n) {
                less_end + 1
            } else {
                less_end
            };
            let less = &neighbours[..less_end];
            let greater = &neighbours[greater_start..];

            let mut count = 0u64;
            for &a in less {
                for &b in greater {
                    if csr::find_edge(csr, a, b).is_some() {
                        count += 1;
                    }
                }
            }
            count
        })
        .sum()
}

/// For each edge `(a, b)` with `a < b`, intersects the neighbors of `a` and
/// `b` restricted to `(a, b)`, adding the intersection size.
fn edge_iteration(csr: &Csr) -> u64 {
    csr.par_iter_node_ids()
        .map(|a| {
            let a_neighbours = csr.out_neighbours(a);
            let mut count = 0u64;
            for &b in a_neighbours {
                if b <= a {
                    continue;
                }
                let a_start = a_neighbours.partition_point(|&v| v <= a);
                let a_end = a_neighbours.partition_point(|&v| v < b);
                let a_restricted = &a_neighbours[a_start..a_end];

                let b_neighbours = csr.out_neighbours(b);
                let b_start = b_neighbours.partition_point(|&v| v <= a);
                let b_end = b_neighbours.partition_point(|&v| v < b);
                let b_restricted = &b_neighbours[b_start..b_end];

                count += sorted_intersection_size(a_restricted, b_restricted);
            }
            count
        })
        .sum()
}

fn sorted_intersection_size(a: &[NodeT], b: &[NodeT]) -> u64 {
    let (mut i, mut j) = (0usize, 0usize);
    let mut count = 0u64;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
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

/// Local clustering coefficient per node: `2 · triangles(v) / (deg(v) ·
/// (deg(v) − 1))`, `0` for nodes of degree `< 2`. `csr` must be symmetric.
pub fn local_clustering_coefficient(csr: &Csr) -> Vec<f64> {
    let sorted = sorted_for_counting(csr, false);
    sorted.par_iter_node_ids()
        .map(|v| {
            let neighbours = sorted.out_neighbours(v);
            let degree = neighbours.len();
            if degree < 2 {
                return 0.0;
            }
            let mut triangles = 0u64;
            for i in 0..neighbours.len() {
                for &w in &neighbours[i + 1..] {
                    if csr::find_edge(&sorted, neighbours[i], w).is_some() {
                        triangles += 1;
                    }
                }
            }
            (2 * triangles) as f64 / (degree * (degree - 1)) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use csr::CsrBuilder;

    fn diamond() -> Csr {
        CsrBuilder::from_edge_list(
            4,
            &[
                (0, 1),
                (1, 0),
                (1, 2),
                (2, 1),
                (2, 3),
                (3, 2),
                (3, 0),
                (0, 3),
                (0, 2),
                (2, 0),
                (1, 3),
                (3, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn all_three_algorithms_find_four_triangles_in_the_diamond() {
        let graph = diamond();
        for plan in [
            TriangleCountPlan::ordered_count(),
            TriangleCountPlan::node_iteration(),
            TriangleCountPlan::edge_iteration(),
        ] {
            let plan = plan.with_relabeling(Relabeling::NoRelabel);
            assert_eq!(count(&graph, &plan).unwrap(), 4);
        }
    }

    #[test]
    fn relabeling_does_not_change_the_count() {
        let graph = diamond();
        let plan = TriangleCountPlan::ordered_count().with_relabeling(Relabeling::Relabel);
        assert_eq!(count(&graph, &plan).unwrap(), 4);
    }

    #[test]
    fn sparse_low_degree_graph_is_not_worth_relabeling() {
        let graph = diamond();
        assert!(!is_approximate_degree_distribution_power_law(&graph));
    }

    #[test]
    fn local_clustering_coefficient_on_a_triangle_plus_isolated_node() {
        let graph =
            CsrBuilder::from_edge_list(4, &[(0, 1), (1, 0), (1, 2), (2, 1), (0, 2), (2, 0)])
                .unwrap();
        let lcc = local_clustering_coefficient(&graph);
        assert_eq!(lcc.len(), 4);
        assert!((lcc[0] - 1.0).abs() < 1e-9);
        assert!((lcc[1] - 1.0).abs() < 1e-9);
        assert!((lcc[2] - 1.0).abs() < 1e-9);
        assert_eq!(lcc[3], 0.0);
    }
}
