//! # Graph View Protocol
//!
//! The minimal read-only contract a graph must satisfy to be traversed or
//! frozen into an [`ImmutableGraph`](crate::snapshot::ImmutableGraph).
//! Node and edge handles are cheap `Copy` values whose meaning belongs to
//! the implementor: a plain index for [`StoreView`], a buffer offset for
//! the snapshot.

use crate::index::NodeIndex;
use crate::storage::{GraphStore, Neighbour};

/// Read-only graph protocol.
pub trait GraphView {
    type Node: Copy;
    type Edge: Copy;

    type Nodes<'a>: Iterator<Item = Self::Node>
    where
        Self: 'a;

    type Edges<'a>: Iterator<Item = Self::Edge>
    where
        Self: 'a;

    fn node_count(&self) -> usize;

    /// All nodes, in the view's natural (index) order.
    fn nodes(&self) -> Self::Nodes<'_>;

    /// Handle for a node index. The index must exist.
    fn node_from_index(&self, index: NodeIndex) -> Self::Node;

    fn node_index(&self, node: Self::Node) -> NodeIndex;

    fn node_edge_count(&self, node: Self::Node) -> usize;

    /// Outgoing edges of `node`; each undirected edge appears once per
    /// endpoint.
    fn node_edges(&self, node: Self::Node) -> Self::Edges<'_>;

    fn edge_target_node(&self, edge: Self::Edge) -> Self::Node;

    fn edge_target_index(&self, edge: Self::Edge) -> NodeIndex;

    fn contains_index(&self, index: NodeIndex) -> bool {
        (index as usize) < self.index_bound()
    }

    /// One past the highest node index. Sized for visited sets and
    /// index-aligned output arrays.
    fn index_bound(&self) -> usize {
        self.node_count()
    }
}

// ============================================================================
// StoreView
// ============================================================================

/// Zero-copy view over a [`GraphStore`], keyed by store node indices.
#[derive(Debug, Clone, Copy)]
pub struct StoreView<'s> {
    store: &'s GraphStore,
}

impl<'s> StoreView<'s> {
    pub fn new(store: &'s GraphStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &'s GraphStore {
        self.store
    }
}

impl GraphView for StoreView<'_> {
    type Node = NodeIndex;
    type Edge = Neighbour;
    type Nodes<'a> = std::ops::Range<NodeIndex> where Self: 'a;
    type Edges<'a> = std::iter::Copied<std::slice::Iter<'a, Neighbour>> where Self: 'a;

    fn node_count(&self) -> usize {
        self.store.node_count()
    }

    fn nodes(&self) -> Self::Nodes<'_> {
        0..self.store.node_count() as NodeIndex
    }

    fn node_from_index(&self, index: NodeIndex) -> NodeIndex {
        debug_assert!(self.contains_index(index), "node {index} out of range");
        index
    }

    fn node_index(&self, node: NodeIndex) -> NodeIndex {
        node
    }

    fn node_edge_count(&self, node: NodeIndex) -> usize {
        self.store.node_degree(node)
    }

    fn node_edges(&self, node: NodeIndex) -> Self::Edges<'_> {
        self.store.node_neighbours(node).iter().copied()
    }

    fn edge_target_node(&self, edge: Neighbour) -> NodeIndex {
        edge.node
    }

    fn edge_target_index(&self, edge: Neighbour) -> NodeIndex {
        edge.node
    }
}
