//! The property graph object (§3, §6): owns the base topology, the node and
//! edge property tables, the two entity-type managers, and the topology
//! view cache. Everything else in this crate operates on borrows handed
//! out from here; the graph itself never runs an algorithm loop, it only
//! stages inputs and publishes results.

use crate::community::{self, CommunityResult, LeidenPlan, LouvainPlan, WeightedAdjacency};
use crate::entity_types::EntityTypeManager;
use crate::k_truss::{self, KTrussPlan, KTrussResult};
use crate::properties::{Column, ColumnData, PropertyTable};
use crate::temp_property::TemporaryPropertyGuard;
use crate::triangle_count::{self, TriangleCountPlan};
use crate::views::{ViewCache, ViewData, ViewKind};
use csr::{Csr, CsrBuilder};
use shared::{EdgeT, NodeT, Result, TypeT};
use std::sync::Arc;

/// Raw arrays an external loader hands in, per spec.md §6's input contract.
pub struct GraphBuilder {
    out_indices: Vec<EdgeT>,
    out_dests: Vec<NodeT>,
    node_properties: PropertyTable,
    edge_properties: PropertyTable,
    node_types: EntityTypeManager,
    edge_types: EntityTypeManager,
    node_type_of: Option<Vec<TypeT>>,
    edge_type_of: Option<Vec<TypeT>>,
}

impl GraphBuilder {
    /// `out_indices` must have length `num_nodes + 1` and include the
    /// leading implicit zero.
    pub fn new(out_indices: Vec<EdgeT>, out_dests: Vec<NodeT>) -> Self {
        let num_nodes = out_indices.len().saturating_sub(1);
        let num_edges = out_dests.len();
        GraphBuilder {
            out_indices,
            out_dests,
            node_properties: PropertyTable::new(num_nodes),
            edge_properties: PropertyTable::new(num_edges),
            node_types: EntityTypeManager::new(),
            edge_types: EntityTypeManager::new(),
            node_type_of: None,
            edge_type_of: None,
        }
    }

    pub fn with_node_properties(mut self, table: PropertyTable) -> Self {
        self.node_properties = table;
        self
    }

    pub fn with_edge_properties(mut self, table: PropertyTable) -> Self {
        self.edge_properties = table;
        self
    }

    pub fn with_node_types(mut self, manager: EntityTypeManager, type_of: Vec<TypeT>) -> Self {
        self.node_types = manager;
        self.node_type_of = Some(type_of);
        self
    }

    pub fn with_edge_types(mut self, manager: EntityTypeManager, type_of: Vec<TypeT>) -> Self {
        self.edge_types = manager;
        self.edge_type_of = Some(type_of);
        self
    }

    pub fn build(self) -> Result<Graph> {
        let topology = CsrBuilder::new(self.out_indices, self.out_dests).build()?;
        if self.node_properties.row_count() != topology.num_nodes() as usize {
            return Err(shared::Error::invalid_argument(format!(
                "node property table has {} rows but the topology has {} nodes",
                self.node_properties.row_count(),
                topology.num_nodes()
            )));
        }
        if self.edge_properties.row_count() != topology.num_edges() as usize {
            return Err(shared::Error::invalid_argument(format!(
                "edge property table has {} rows but the topology has {} edges",
                self.edge_properties.row_count(),
                topology.num_edges()
            )));
        }
        Ok(Graph {
            topology,
            node_properties: self.node_properties,
            edge_properties: self.edge_properties,
            node_types: self.node_types,
            edge_types: self.edge_types,
            node_type_of: self.node_type_of,
            edge_type_of: self.edge_type_of,
            views: ViewCache::new(),
        })
    }
}

/// Owns the base topology, both property tables, both entity-type
/// managers, and the derived-view cache (§3's "Ownership & lifecycle").
pub struct Graph {
    topology: Csr,
    node_properties: PropertyTable,
    edge_properties: PropertyTable,
    node_types: EntityTypeManager,
    edge_types: EntityTypeManager,
    node_type_of: Option<Vec<TypeT>>,
    edge_type_of: Option<Vec<TypeT>>,
    views: ViewCache,
}

impl Graph {
    pub fn num_nodes(&self) -> NodeT {
        self.topology.num_nodes()
    }

    pub fn num_edges(&self) -> EdgeT {
        self.topology.num_edges()
    }

    pub fn topology(&self) -> &Csr {
        &self.topology
    }

    pub fn node_properties(&self) -> &PropertyTable {
        &self.node_properties
    }

    pub fn node_properties_mut(&mut self) -> &mut PropertyTable {
        &mut self.node_properties
    }

    pub fn edge_properties(&self) -> &PropertyTable {
        &self.edge_properties
    }

    pub fn edge_properties_mut(&mut self) -> &mut PropertyTable {
        &mut self.edge_properties
    }

    pub fn node_types(&self) -> &EntityTypeManager {
        &self.node_types
    }

    pub fn edge_types(&self) -> &EntityTypeManager {
        &self.edge_types
    }

    pub fn node_type_of(&self, node: NodeT) -> Option<TypeT> {
        self.node_type_of.as_ref().map(|types| types[node as usize])
    }

    pub fn edge_type_of(&self, edge: EdgeT) -> Option<TypeT> {
        self.edge_type_of.as_ref().map(|types| types[edge as usize])
    }

    /// Returns the cached handle for `kind`, building it on a cache miss.
    /// Requesting [`ViewKind::Default`] fails with `InvalidArgument` (the
    /// base topology is reached through [`Graph::topology`], not the
    /// cache), as do view kinds whose inputs are missing or mistyped.
    pub fn view(&self, kind: ViewKind) -> Result<Arc<ViewData>> {
        let topology = &self.topology;
        let handle = match kind.clone() {
            ViewKind::Default => {
                return Err(shared::Error::invalid_argument(
                    "the default topology is not a derived view; use Graph::topology()",
                ))
            }
            ViewKind::Transposed => self
                .views
                .get_or_build(kind, || crate::views::build_transposed(topology)),
            ViewKind::BiDirectional => self
                .views
                .get_or_build(kind, || crate::views::build_bidirectional(topology)),
            ViewKind::EdgesSortedByDestID => self
                .views
                .get_or_build(kind, || crate::views::build_edges_sorted_by_dest_id(topology)),
            ViewKind::EdgesSortedByProperty(ref name) => {
                let column = self.edge_properties.typed_column::<f64>(name)?;
                self.views.get_or_build(kind.clone(), || {
                    crate::views::build_edges_sorted_by_property(topology, |e| column[e as usize])
                })
            }
            ViewKind::NodesSortedByDegree => self
                .views
                .get_or_build(kind, || crate::views::build_nodes_sorted_by_degree(topology)),
            ViewKind::NodesSortedByDegreeEdgesSortedByDestID => {
                self.views.get_or_build(kind, || {
                    crate::views::build_nodes_sorted_by_degree_edges_sorted_by_dest_id(topology)
                })
            }
            ViewKind::Undirected => self
                .views
                .get_or_build(kind, || crate::views::build_undirected(topology)),
            ViewKind::EdgeTypeAwareBiDir => {
                let edge_type_of = self.edge_type_of.as_ref().ok_or_else(|| {
                    shared::Error::invalid_argument(
                        "EdgeTypeAwareBiDir requires an edge type-id array",
                    )
                })?;
                self.views.get_or_build(kind, || {
                    crate::views::build_edge_type_aware_bidirectional(topology, |e| {
                        edge_type_of[e as usize]
                    })
                })
            }
        };
        Ok(handle)
    }

    /// Drops every cached derived view, per §4.4.
    pub fn drop_all_topologies(&self) {
        self.views.drop_all();
    }

    /// Appends a batch of node property columns, all or nothing.
    pub fn add_node_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        self.node_properties.add_properties(columns)
    }

    /// Appends or replaces a batch of node property columns by name.
    pub fn upsert_node_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        self.node_properties.upsert_properties(columns)
    }

    pub fn add_edge_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        self.edge_properties.add_properties(columns)
    }

    pub fn upsert_edge_properties(&mut self, columns: Vec<Column>) -> Result<()> {
        self.edge_properties.upsert_properties(columns)
    }

    /// Drops a node property column, freeing its storage.
    pub fn unload_node_property(&mut self, name: &str) -> Result<()> {
        self.node_properties.remove_property(name).map(|_| ())
    }

    /// Drops an edge property column, freeing its storage.
    pub fn unload_edge_property(&mut self, name: &str) -> Result<()> {
        self.edge_properties.remove_property(name).map(|_| ())
    }

    fn weighted_adjacency(&self, edge_weight_column: Option<&str>) -> Result<WeightedAdjacency> {
        match edge_weight_column {
            Some(name) => {
                let weights = self.edge_properties.typed_column::<f64>(name)?;
                WeightedAdjacency::from_csr(&self.topology, |e| weights[e as usize])
            }
            None => Ok(WeightedAdjacency::unweighted(&self.topology)),
        }
    }

    /// Runs Louvain and publishes the resulting community ids under
    /// `result_property`. On failure no property is added: the scratch
    /// column used to stage the ids is removed by its guard before the
    /// error returns (§7's "leave the graph in a consistent state").
    pub fn run_louvain(
        &mut self,
        edge_weight_column: Option<&str>,
        plan: &LouvainPlan,
        result_property: &str,
    ) -> Result<CommunityResult> {
        let adjacency = self.weighted_adjacency(edge_weight_column)?;
        let result = community::louvain::run(&adjacency, plan)?;
        self.publish_community_result(&result, result_property)?;
        Ok(result)
    }

    /// As [`Graph::run_louvain`], using Leiden.
    pub fn run_leiden(
        &mut self,
        edge_weight_column: Option<&str>,
        plan: &LeidenPlan,
        result_property: &str,
    ) -> Result<CommunityResult> {
        let adjacency = self.weighted_adjacency(edge_weight_column)?;
        let result = community::leiden::run(&adjacency, plan)?;
        self.publish_community_result(&result, result_property)?;
        Ok(result)
    }

    fn publish_community_result(&mut self, result: &CommunityResult, name: &str) -> Result<()> {
        let mut guard = TemporaryPropertyGuard::new(
            &mut self.node_properties,
            ColumnData::from(result.community_of.clone()),
        )?;
        community::assert_valid(result)?;
        let scratch_name = guard.name().to_string();
        let column = guard.table_mut().remove_property(&scratch_name)?;
        drop(guard);
        self.node_properties
            .upsert_property(Column::new(name, column.data().clone()))
    }

    /// Counts undirected triangles. `self.topology` must already be
    /// symmetric (every edge has a reverse) — build it that way, or
    /// symmetrize via [`ViewKind::Undirected`] and load the result as a
    /// fresh [`Graph`], rather than symmetrizing on every call here.
    pub fn count_triangles(&self, plan: &TriangleCountPlan) -> Result<u64> {
        triangle_count::count(&self.topology, plan)
    }

    /// Computes the local clustering coefficient of every node and
    /// publishes it under `result_property`. `self.topology` must already
    /// be symmetric, as for [`Graph::count_triangles`].
    pub fn compute_local_clustering_coefficient(&mut self, result_property: &str) -> Result<()> {
        let coefficients = triangle_count::local_clustering_coefficient(&self.topology);
        self.node_properties
            .upsert_property(Column::new(result_property, ColumnData::from(coefficients)))
    }

    /// Runs k-Truss and publishes a per-edge flag column (bit 0 = removed)
    /// under `result_property`. `self.topology` must already be symmetric,
    /// as for [`Graph::count_triangles`]. Validates the result before
    /// publishing; on failure the scratch column is removed by its guard
    /// and no property is added.
    pub fn run_k_truss(&mut self, plan: &KTrussPlan, result_property: &str) -> Result<KTrussResult> {
        let result = k_truss::run(&self.topology, plan)?;
        k_truss::assert_valid(&self.topology, &result, plan.k())?;

        let flags: Vec<u32> = (0..self.topology.num_edges())
            .map(|e| result.is_removed(e) as u32)
            .collect();
        let mut guard = TemporaryPropertyGuard::new(&mut self.edge_properties, ColumnData::from(flags))?;
        let scratch_name = guard.name().to_string();
        let column = guard.table_mut().remove_property(&scratch_name)?;
        drop(guard);
        self.edge_properties
            .upsert_property(Column::new(result_property, column.data().clone()))?;
        Ok(result)
    }
}
