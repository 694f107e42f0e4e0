//! Undirected edges in canonical orientation.

use serde::{Deserialize, Serialize};

use crate::index::{EdgeIndex, NodeIndex};

/// An undirected edge stored once, with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeIndex,
    pub b: NodeIndex,
}

impl Edge {
    /// Build the canonical `(min, max)` edge for an endpoint pair.
    pub fn new(node0: NodeIndex, node1: NodeIndex) -> Self {
        debug_assert_ne!(node0, node1, "self loops are not supported");
        if node0 < node1 {
            Self { a: node0, b: node1 }
        } else {
            Self { a: node1, b: node0 }
        }
    }

    /// Lookup key for the edge map.
    pub fn key(&self) -> u64 {
        edge_key(self.a, self.b)
    }

    /// The endpoint opposite `from`.
    pub fn other_node(&self, from: NodeIndex) -> Option<NodeIndex> {
        if from == self.a {
            Some(self.b)
        } else if from == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Symmetric, collision-free key for a 32-bit endpoint pair.
pub fn edge_key(node0: NodeIndex, node1: NodeIndex) -> u64 {
    let (lo, hi) = if node0 < node1 { (node0, node1) } else { (node1, node0) };
    ((lo as u64) << 32) | hi as u64
}

/// An edge to be spliced in by `GraphStore::insert_edges`.
///
/// `index` is the edge's position *after* the insertion. Endpoints may be
/// given in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdge {
    pub index: EdgeIndex,
    pub node0: NodeIndex,
    pub node1: NodeIndex,
}

impl NewEdge {
    pub fn new(index: EdgeIndex, node0: NodeIndex, node1: NodeIndex) -> Self {
        Self { index, node0, node1 }
    }
}
