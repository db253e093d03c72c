//! Types used to index nodes, edges and entity types across the crate.

/// Type used to index the nodes. A node id also doubles as its row index
/// into the default-topology node property table.
pub type NodeT = u32;
/// Type used to index the edges. An edge id produced while iterating a
/// node's outgoing adjacency also doubles as its row index into the edge
/// property table.
pub type EdgeT = u64;
/// Type used to index entity types, atomic or composite.
pub type TypeT = u16;
/// Type used for edge weights.
pub type WeightT = f64;

/// Sentinel used by algorithms to signal the absence of a value in a dense
/// id space, e.g. "no move target" in a vertex-move schedule.
pub const NOT_PRESENT: NodeT = NodeT::MAX;
