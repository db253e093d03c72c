//! Derived topology projections of a single base [`csr::Csr`] (§4.4).
//!
//! Each view kind has the same conceptual interface — nodes, out-edges,
//! out-degree, out-edge destination — but stores different auxiliary
//! arrays. Per the polymorphic-views design note, the kind is a tagged
//! sum type ([`ViewData`]) and the common operations are a trait
//! ([`Topology`]); algorithms are generic over whichever capability subset
//! they need rather than over a concrete view type.

pub mod cache;
pub mod kind;

pub use cache::ViewCache;
pub use kind::ViewKind;

use csr::{Csr, UndirectedCsr};
use shared::{EdgeT, NodeT, TypeT};
use std::ops::Range;

/// The capability set every view kind supports. Algorithms that only need
/// forward adjacency are generic over `T: Topology`, independent of which
/// concrete view backs it.
pub trait Topology {
    fn num_nodes(&self) -> NodeT;
    fn num_edges(&self) -> EdgeT;
    fn out_edges(&self, v: NodeT) -> Range<EdgeT>;
    fn out_degree(&self, v: NodeT) -> EdgeT;
    fn out_edge_dst(&self, e: EdgeT) -> NodeT;
}

impl Topology for Csr {
    fn num_nodes(&self) -> NodeT {
        Csr::num_nodes(self)
    }
    fn num_edges(&self) -> EdgeT {
        Csr::num_edges(self)
    }
    fn out_edges(&self, v: NodeT) -> Range<EdgeT> {
        Csr::out_edges(self, v)
    }
    fn out_degree(&self, v: NodeT) -> EdgeT {
        Csr::out_degree(self, v)
    }
    fn out_edge_dst(&self, e: EdgeT) -> NodeT {
        Csr::out_edge_dst(self, e)
    }
}

/// Capability for views that also expose a reversed adjacency.
pub trait InTopology: Topology {
    fn in_edges(&self, v: NodeT) -> Range<EdgeT>;
    fn in_degree(&self, v: NodeT) -> EdgeT;
    fn in_edge_src(&self, e: EdgeT) -> NodeT;
}

/// Capability for the symmetrized view.
pub trait UndirectedTopology {
    fn undirected_edges(&self, v: NodeT) -> Range<EdgeT>;
    fn undirected_degree(&self, v: NodeT) -> EdgeT;
    fn undirected_edge_neighbor(&self, e: EdgeT) -> NodeT;
}

/// Per-node, per-type contiguous edge ranges for [`ViewData::EdgeTypeAwareBiDir`].
#[derive(Debug, Clone, Default)]
pub struct TypeRanges(Vec<Vec<(TypeT, EdgeT, EdgeT)>>);

impl TypeRanges {
    fn range_for(&self, v: NodeT, t: TypeT) -> Range<EdgeT> {
        self.0[v as usize]
            .iter()
            .find(|(ty, _, _)| *ty == t)
            .map(|&(_, start, end)| start..end)
            .unwrap_or(0..0)
    }
}

/// Builds per-node contiguous type ranges by grouping consecutive
/// same-type runs in a topology whose adjacency is already sorted by edge
/// type (via [`csr::sort_adjacency_by_key`]). Cost is linear in the number
/// of edges, matching the "bucket by edge type id using a per-node
/// counting sort" algorithmic note of §4.4.
fn group_by_type<T: Topology>(topology: &T, edge_type_of: impl Fn(EdgeT) -> TypeT) -> TypeRanges {
    let mut ranges = Vec::with_capacity(topology.num_nodes() as usize);
    for v in 0..topology.num_nodes() {
        let edges = topology.out_edges(v);
        let mut node_ranges = Vec::new();
        let mut run_start = edges.start;
        let mut run_type = None;
        for e in edges.clone() {
            let t = edge_type_of(e);
            match run_type {
                None => run_type = Some(t),
                Some(current) if current != t => {
                    node_ranges.push((current, run_start, e));
                    run_start = e;
                    run_type = Some(t);
                }
                _ => {}
            }
        }
        if let Some(t) = run_type {
            node_ranges.push((t, run_start, edges.end));
        }
        ranges.push(node_ranges);
    }
    TypeRanges(ranges)
}

/// A bidirectional pairing of a (possibly resorted) forward topology with
/// its transposed counterpart, sharing the edge-origin bookkeeping needed
/// to map transposed edge ids back to the base graph's edge ids for
/// property lookups.
#[derive(Debug, Clone)]
pub struct Reversed {
    pub csr: Csr,
    /// `edge_origin[e]` is the base-graph edge id the transposed edge `e`
    /// was derived from.
    pub edge_origin: Vec<EdgeT>,
}

impl Topology for Reversed {
    fn num_nodes(&self) -> NodeT {
        self.csr.num_nodes()
    }
    fn num_edges(&self) -> EdgeT {
        self.csr.num_edges()
    }
    fn out_edges(&self, v: NodeT) -> Range<EdgeT> {
        self.csr.out_edges(v)
    }
    fn out_degree(&self, v: NodeT) -> EdgeT {
        self.csr.out_degree(v)
    }
    fn out_edge_dst(&self, e: EdgeT) -> NodeT {
        self.csr.out_edge_dst(e)
    }
}

/// A relabeling permutation plus the adjacency rewritten under it, for
/// [`ViewKind::NodesSortedByDegree`] and its composition with
/// destination-sorting.
#[derive(Debug, Clone)]
pub struct Relabeled {
    pub csr: Csr,
    /// `permutation[new_id] == old_id`.
    pub permutation: Vec<NodeT>,
    /// `inverse[old_id] == new_id`.
    pub inverse: Vec<NodeT>,
    /// `edge_origin[new_edge_id]` is the base-graph edge id the view edge
    /// was derived from, so edge properties stay addressable through the
    /// relabeled view.
    pub edge_origin: Vec<EdgeT>,
}

impl Topology for Relabeled {
    fn num_nodes(&self) -> NodeT {
        self.csr.num_nodes()
    }
    fn num_edges(&self) -> EdgeT {
        self.csr.num_edges()
    }
    fn out_edges(&self, v: NodeT) -> Range<EdgeT> {
        self.csr.out_edges(v)
    }
    fn out_degree(&self, v: NodeT) -> EdgeT {
        self.csr.out_degree(v)
    }
    fn out_edge_dst(&self, e: EdgeT) -> NodeT {
        self.csr.out_edge_dst(e)
    }
}

/// The tagged union of every buildable view's backing data, cached by
/// [`ViewCache`] behind an `Arc` handle.
#[derive(Debug, Clone)]
pub enum ViewData {
    Transposed {
        csr: Csr,
        edge_origin: Vec<EdgeT>,
    },
    BiDirectional {
        reversed: Reversed,
    },
    EdgesSortedByDestID {
        csr: Csr,
        edge_origin: Vec<EdgeT>,
    },
    EdgesSortedByProperty {
        csr: Csr,
        edge_origin: Vec<EdgeT>,
    },
    NodesSortedByDegree {
        relabeled: Relabeled,
    },
    NodesSortedByDegreeEdgesSortedByDestID {
        relabeled: Relabeled,
    },
    Undirected {
        undirected: UndirectedCsr,
    },
    EdgeTypeAwareBiDir {
        out_type_sorted: Csr,
        out_edge_origin: Vec<EdgeT>,
        out_type_ranges: TypeRanges,
        in_type_sorted: Csr,
        in_edge_origin: Vec<EdgeT>,
        in_type_ranges: TypeRanges,
    },
}

pub fn build_transposed(base: &Csr) -> ViewData {
    let (csr, edge_origin) = csr::transpose(base);
    ViewData::Transposed { csr, edge_origin }
}

pub fn build_bidirectional(base: &Csr) -> ViewData {
    let (csr, edge_origin) = csr::transpose(base);
    ViewData::BiDirectional {
        reversed: Reversed { csr, edge_origin },
    }
}

pub fn build_edges_sorted_by_dest_id(base: &Csr) -> ViewData {
    let (csr, edge_origin) = csr::sort_adjacency_by_key(base, |_e, dst| dst);
    ViewData::EdgesSortedByDestID { csr, edge_origin }
}

pub fn build_edges_sorted_by_property(base: &Csr, key_of: impl Fn(EdgeT) -> f64 + Sync) -> ViewData {
    let (csr, edge_origin) =
        csr::sort_adjacency_by_key(base, |e, dst| (ordered_float_bits(key_of(e)), dst));
    ViewData::EdgesSortedByProperty { csr, edge_origin }
}

/// Monotone bit-encoding of an `f64` sort key: sign-adjusted IEEE doubles
/// compare correctly as unsigned integers, so the per-node sort can run on
/// a plain `Ord` key.
fn ordered_float_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if value.is_sign_negative() {
        !bits
    } else {
        bits | (1 << 63)
    }
}

pub fn build_nodes_sorted_by_degree(base: &Csr) -> ViewData {
    let permutation = csr::degree_sort_permutation(base);
    ViewData::NodesSortedByDegree {
        relabeled: relabel(base, permutation),
    }
}

pub fn build_nodes_sorted_by_degree_edges_sorted_by_dest_id(base: &Csr) -> ViewData {
    let permutation = csr::degree_sort_permutation(base);
    let relabeled = relabel(base, permutation);
    let (csr, sort_permutation) = csr::sort_adjacency_by_key(&relabeled.csr, |_e, dst| dst);
    // compose: the sort permutes relabeled edge ids, which in turn map back
    // to base edge ids.
    let edge_origin = sort_permutation
        .iter()
        .map(|&e| relabeled.edge_origin[e as usize])
        .collect();
    ViewData::NodesSortedByDegreeEdgesSortedByDestID {
        relabeled: Relabeled {
            csr,
            permutation: relabeled.permutation,
            inverse: relabeled.inverse,
            edge_origin,
        },
    }
}

fn relabel(base: &Csr, permutation: Vec<NodeT>) -> Relabeled {
    let mut inverse = vec![0 as NodeT; permutation.len()];
    for (new_id, &old_id) in permutation.iter().enumerate() {
        inverse[old_id as usize] = new_id as NodeT;
    }
    let mut out_indices = Vec::with_capacity(permutation.len() + 1);
    out_indices.push(0 as EdgeT);
    let mut out_dests = Vec::with_capacity(base.num_edges() as usize);
    let mut edge_origin = Vec::with_capacity(base.num_edges() as usize);
    for &old_id in &permutation {
        for e in base.out_edges(old_id) {
            out_dests.push(inverse[base.out_edge_dst(e) as usize]);
            edge_origin.push(e);
        }
        out_indices.push(out_dests.len() as EdgeT);
    }
    let csr = csr::CsrBuilder::new(out_indices, out_dests)
        .build()
        .expect("relabeling a valid Csr by a permutation cannot violate Csr invariants");
    Relabeled {
        csr,
        permutation,
        inverse,
        edge_origin,
    }
}

pub fn build_undirected(base: &Csr) -> ViewData {
    ViewData::Undirected {
        undirected: csr::symmetrize(base),
    }
}

pub fn build_edge_type_aware_bidirectional(
    base: &Csr,
    edge_type_of: impl Fn(EdgeT) -> TypeT + Sync,
) -> ViewData {
    let (out_type_sorted, out_edge_origin) =
        csr::sort_adjacency_by_key(base, |e, _dst| edge_type_of(e));
    let out_type_ranges = group_by_type(&out_type_sorted, |e| edge_type_of(out_edge_origin[e as usize]));

    let (transposed, transposed_origin) = csr::transpose(base);
    let (in_type_sorted, in_perm) =
        csr::sort_adjacency_by_key(&transposed, |e, _dst| edge_type_of(transposed_origin[e as usize]));
    let in_edge_origin: Vec<EdgeT> = in_perm
        .iter()
        .map(|&e| transposed_origin[e as usize])
        .collect();
    let in_type_ranges = group_by_type(&in_type_sorted, |e| edge_type_of(in_edge_origin[e as usize]));

    ViewData::EdgeTypeAwareBiDir {
        out_type_sorted,
        out_edge_origin,
        out_type_ranges,
        in_type_sorted,
        in_edge_origin,
        in_type_ranges,
    }
}

impl ViewData {
    /// Edges of `v` restricted to entity type `t`; only meaningful on
    /// [`ViewData::EdgeTypeAwareBiDir`].
    pub fn out_edges_of_type(&self, v: NodeT, t: TypeT) -> Range<EdgeT> {
        match self {
            ViewData::EdgeTypeAwareBiDir {
                out_type_ranges, ..
            } => out_type_ranges.range_for(v, t),
            _ => panic!("out_edges_of_type is only defined on EdgeTypeAwareBiDir"),
        }
    }

    pub fn in_edges_of_type(&self, v: NodeT, t: TypeT) -> Range<EdgeT> {
        match self {
            ViewData::EdgeTypeAwareBiDir { in_type_ranges, .. } => in_type_ranges.range_for(v, t),
            _ => panic!("in_edges_of_type is only defined on EdgeTypeAwareBiDir"),
        }
    }

    pub fn out_degree_of_type(&self, v: NodeT, t: TypeT) -> EdgeT {
        let range = self.out_edges_of_type(v, t);
        range.end - range.start
    }

    pub fn in_degree_of_type(&self, v: NodeT, t: TypeT) -> EdgeT {
        let range = self.in_edges_of_type(v, t);
        range.end - range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csr::CsrBuilder;

    fn diamond() -> Csr {
        CsrBuilder::from_edge_list(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]).unwrap()
    }

    #[test]
    fn transposing_twice_round_trips_edge_counts() {
        let base = diamond();
        let transposed = match build_transposed(&base) {
            ViewData::Transposed { csr, .. } => csr,
            _ => unreachable!(),
        };
        assert_eq!(transposed.num_edges(), base.num_edges());
        let back = match build_transposed(&transposed) {
            ViewData::Transposed { csr, .. } => csr,
            _ => unreachable!(),
        };
        assert_eq!(back.num_edges(), base.num_edges());
    }

    #[test]
    fn edges_sorted_by_dest_id_is_actually_sorted() {
        let base = diamond();
        let (csr, _) = match build_edges_sorted_by_dest_id(&base) {
            ViewData::EdgesSortedByDestID { csr, edge_origin } => (csr, edge_origin),
            _ => unreachable!(),
        };
        for v in csr.iter_node_ids() {
            let neighbours = csr.out_neighbours(v);
            assert!(neighbours.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn degree_relabeling_preserves_edge_count() {
        let base = diamond();
        let relabeled = match build_nodes_sorted_by_degree(&base) {
            ViewData::NodesSortedByDegree { relabeled } => relabeled,
            _ => unreachable!(),
        };
        assert_eq!(relabeled.csr.num_edges(), base.num_edges());
        for v in 0..base.num_nodes() {
            assert_eq!(
                relabeled.csr.out_degree(relabeled.inverse[v as usize]),
                base.out_degree(v)
            );
        }
    }

    #[test]
    fn composed_degree_and_destination_sort_maps_edges_back_to_the_base() {
        let base = diamond();
        let relabeled = match build_nodes_sorted_by_degree_edges_sorted_by_dest_id(&base) {
            ViewData::NodesSortedByDegreeEdgesSortedByDestID { relabeled } => relabeled,
            _ => unreachable!(),
        };
        for new_src in 0..relabeled.csr.num_nodes() {
            for e in relabeled.csr.out_edges(new_src) {
                let origin = relabeled.edge_origin[e as usize];
                let old_src = relabeled.permutation[new_src as usize];
                // the origin edge must leave the same node under the old ids
                // and point at the pre-image of the view edge's destination.
                assert!(base.out_edges(old_src).contains(&origin));
                assert_eq!(
                    relabeled.inverse[base.out_edge_dst(origin) as usize],
                    relabeled.csr.out_edge_dst(e)
                );
            }
        }
    }

    #[test]
    fn edge_type_aware_degrees_sum_to_the_base_degree() {
        let base = CsrBuilder::from_edge_list(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
        let edge_types = vec![0u16, 1, 0];
        let view = build_edge_type_aware_bidirectional(&base, |e| edge_types[e as usize]);
        for v in 0..base.num_nodes() {
            let total: u64 = (0u16..2).map(|t| view.out_degree_of_type(v, t)).sum();
            assert_eq!(total, base.out_degree(v));
        }
    }
}
