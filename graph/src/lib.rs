//! Property graph built on top of the `csr` crate: typed node/edge entity
//! sets, columnar properties, cached derived topology views, parallel
//! execution primitives, and the graph analytics of §4.6/§4.7 (community
//! detection, triangle counting, k-truss).
//!
//! [`Graph`] is the object callers interact with; everything else in this
//! crate is a building block it assembles.

pub mod community;
pub mod entity_types;
mod graph;
pub mod k_truss;
pub mod parallel;
mod progress;
pub mod properties;
mod temp_property;
pub mod triangle_count;
pub mod views;

pub use community::{
    CommunityAlgorithm, CommunityResult, CommunityStatistics, LeidenPlan, LouvainPlan,
    WeightedAdjacency,
};
pub use entity_types::EntityTypeManager;
pub use graph::{Graph, GraphBuilder};
pub use k_truss::{KTrussPlan, KTrussResult};
pub use properties::{
    exclusive_view, typed_view, typed_view2, typed_view3, typed_view4, Column, ColumnData,
    PropertyTable, ScalarType, TypedView, TypedViewMut,
};
pub use temp_property::TemporaryPropertyGuard;
pub use triangle_count::{Relabeling, TriangleCountAlgorithm, TriangleCountPlan};
pub use views::{ViewCache, ViewData, ViewKind};
