//! The closed set of view kinds a [`super::cache::ViewCache`] can build,
//! per §4.4.

use shared::TypeT;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Default,
    Transposed,
    BiDirectional,
    EdgesSortedByDestID,
    EdgesSortedByProperty(String),
    NodesSortedByDegree,
    NodesSortedByDegreeEdgesSortedByDestID,
    Undirected,
    EdgeTypeAwareBiDir,
}

/// A node or edge entity-type id, used only to key the type-aware view's
/// per-node bucketing; re-exported here so callers of that view do not need
/// to depend on the entity-type module directly.
pub type EdgeTypeId = TypeT;
