//! The editable, index-addressed graph store.
//!
//! Nodes and edges live in dense arrays addressed by `u32` index. Edits that
//! shift indices (insert/remove) build an explicit remap table, apply it to
//! every dependent array, and hand it to observers so they can fix up their
//! own cached indices.
//!
//! ## Contract
//!
//! Index arguments must be in range and, where documented, sorted and
//! unique. Violations are caller bugs and trip `debug_assert!`s; they are
//! never reported through `Result`.

use std::ops::{Deref, DerefMut};

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::index::{self, BitSet, EdgeIndex, INVALID_INDEX, NodeIndex};
use crate::model::{CategoryIndex, Edge, NewEdge, NewNode, Position, edge_key};
use crate::view::StoreView;
use crate::{Error, Result};
use super::adjacency::{Adjacency, Neighbour};
use super::columns::{AttributeColumn, Column};
use super::events::{GraphEvent, ObserverId, Observers};

// ============================================================================
// GraphStore
// ============================================================================

/// Mutable undirected graph with CSR adjacency and an edge lookup map.
#[derive(Debug, Default)]
pub struct GraphStore {
    positions: Vec<Position>,
    categories: Vec<Option<CategoryIndex>>,
    names: Vec<String>,
    columns: Vec<NamedColumn>,

    /// Canonical `(min, max)` endpoint pairs.
    edges: Vec<Edge>,
    adjacency: Adjacency,
    /// `edge_key(a, b)` → edge index; inverse of `edges`.
    edge_map: HashMap<u64, EdgeIndex>,

    modify_depth: u32,
    dirty: BitSet,

    observers: Observers,
}

struct NamedColumn {
    name: String,
    column: Box<dyn AttributeColumn>,
}

impl std::fmt::Debug for NamedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("type", &self.column.type_name())
            .field("len", &self.column.len())
            .finish()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, node: NodeIndex) -> Position {
        self.positions[node as usize]
    }

    pub fn category(&self, node: NodeIndex) -> Option<CategoryIndex> {
        self.categories[node as usize]
    }

    pub fn name(&self, node: NodeIndex) -> &str {
        &self.names[node as usize]
    }

    pub fn edge(&self, edge: EdgeIndex) -> Edge {
        self.edges[edge as usize]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge joining `node0` and `node1`, in either order.
    pub fn find_edge(&self, node0: NodeIndex, node1: NodeIndex) -> Option<EdgeIndex> {
        self.edge_map.get(&edge_key(node0, node1)).copied()
    }

    /// Adjacency entries of `node`, in adjacency order.
    pub fn node_neighbours(&self, node: NodeIndex) -> &[Neighbour] {
        self.adjacency.of(node)
    }

    /// Adjacent node indices of `node`.
    pub fn neighbours(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.adjacency.of(node).iter().map(|n| n.node)
    }

    pub fn node_degree(&self, node: NodeIndex) -> usize {
        self.adjacency.of(node).len()
    }

    /// CSR offsets, `node_count + 1` long.
    pub fn first_edge_per_node(&self) -> &[u32] {
        self.adjacency.first_edge_per_node()
    }

    /// Flat neighbour array, `2 * edge_count` long.
    pub fn neighbour_table(&self) -> &[Neighbour] {
        self.adjacency.neighbours()
    }

    /// Edges incident to any of `nodes`, sorted and deduplicated.
    pub fn get_edges_connected_to_nodes(&self, nodes: &[NodeIndex]) -> SmallVec<[EdgeIndex; 8]> {
        let mut edges: SmallVec<[EdgeIndex; 8]> = nodes
            .iter()
            .flat_map(|&node| self.adjacency.of(node).iter().map(|n| n.edge))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Zero-copy read-only view implementing `GraphView`.
    pub fn view(&self) -> StoreView<'_> {
        StoreView::new(self)
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a change handler. Handlers run synchronously, in
    /// registration order, after each edit has been fully applied.
    pub fn subscribe(&mut self, handler: impl FnMut(&GraphEvent<'_>) + 'static) -> ObserverId {
        self.observers.subscribe(Box::new(handler))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // ========================================================================
    // Node structure
    // ========================================================================

    /// Append `count` default nodes. Returns the index of the first one.
    pub fn add_nodes(&mut self, count: usize) -> NodeIndex {
        let first = self.node_count() as NodeIndex;
        if count == 0 {
            return first;
        }
        let new_len = self.node_count() + count;

        self.positions.resize(new_len, Position::default());
        self.categories.resize(new_len, None);
        self.names.resize(new_len, String::new());
        for named in self.columns.iter_mut() {
            named.column.resize(new_len);
        }
        if self.modify_depth > 0 {
            self.dirty.resize(new_len);
        }
        self.adjacency.push_empty_nodes(count);

        tracing::debug!(first, count, "added nodes");
        self.observers.emit(&GraphEvent::NodesAdded { first, count });
        first
    }

    /// Splice nodes in at their post-insertion indices (sorted ascending).
    pub fn insert_nodes(&mut self, new_nodes: &[NewNode]) {
        if new_nodes.is_empty() {
            return;
        }
        let indices: Vec<NodeIndex> = new_nodes.iter().map(|n| n.index).collect();
        debug_assert!(index::is_sorted_unique(&indices), "insert_nodes: indices must be sorted and unique");

        let remap = index::expand_table(self.node_count(), &indices);

        index::expand(&mut self.positions, &indices, |k| new_nodes[k].position());
        index::expand(&mut self.categories, &indices, |k| new_nodes[k].category);
        index::expand_with(&mut self.names, &indices, String::new());
        for named in self.columns.iter_mut() {
            named.column.expand(&indices);
        }
        if self.modify_depth > 0 {
            self.dirty.expand(&indices);
        }

        // The table is monotonic, so remapped pairs stay canonical.
        for edge in self.edges.iter_mut() {
            edge.a = remap[edge.a as usize];
            edge.b = remap[edge.b as usize];
        }
        self.rebuild_edge_map();
        self.rebuild_neighbour_tables();

        tracing::debug!(count = indices.len(), nodes = self.node_count(), "inserted nodes");
        self.observers.emit(&GraphEvent::NodesInserted { indices: &indices, remap: &remap });
    }

    /// Remove nodes (sorted ascending, unique) and every edge touching them.
    pub fn remove_nodes(&mut self, indices: &[NodeIndex]) {
        if indices.is_empty() {
            return;
        }
        debug_assert!(index::is_sorted_unique(indices), "remove_nodes: indices must be sorted and unique");
        debug_assert!(
            indices.last().is_none_or(|&i| (i as usize) < self.node_count()),
            "remove_nodes: index out of range"
        );

        let incident = self.get_edges_connected_to_nodes(indices);
        if !incident.is_empty() {
            self.remove_edges(&incident);
        }

        let remap = index::collapse_table(self.node_count(), indices);

        index::collapse(&mut self.positions, indices);
        index::collapse(&mut self.categories, indices);
        index::collapse(&mut self.names, indices);
        for named in self.columns.iter_mut() {
            named.column.collapse(indices);
        }
        if self.modify_depth > 0 {
            self.dirty.collapse(indices);
        }

        for edge in self.edges.iter_mut() {
            edge.a = remap[edge.a as usize];
            edge.b = remap[edge.b as usize];
            debug_assert!(edge.a != INVALID_INDEX && edge.b != INVALID_INDEX);
        }
        self.rebuild_edge_map();
        self.rebuild_neighbour_tables();

        tracing::debug!(count = indices.len(), nodes = self.node_count(), "removed nodes");
        self.observers.emit(&GraphEvent::NodesRemoved { indices, remap: &remap });
    }

    // ========================================================================
    // Edge structure
    // ========================================================================

    /// Append edges. Returns the index of the first new edge.
    pub fn add_edges(&mut self, pairs: &[(NodeIndex, NodeIndex)]) -> EdgeIndex {
        let first = self.edge_count() as EdgeIndex;
        if pairs.is_empty() {
            return first;
        }

        self.edges.reserve(pairs.len());
        for &(node0, node1) in pairs {
            debug_assert!((node0.max(node1) as usize) < self.node_count(), "add_edges: node out of range");
            let edge = Edge::new(node0, node1);
            let previous = self.edge_map.insert(edge.key(), self.edges.len() as EdgeIndex);
            debug_assert!(previous.is_none(), "add_edges: duplicate edge {edge:?}");
            self.edges.push(edge);
        }
        self.rebuild_neighbour_tables();

        tracing::debug!(first, count = pairs.len(), "added edges");
        self.observers.emit(&GraphEvent::EdgesAdded { first, count: pairs.len() });
        first
    }

    /// Splice edges in at their post-insertion indices (sorted ascending).
    pub fn insert_edges(&mut self, new_edges: &[NewEdge]) {
        if new_edges.is_empty() {
            return;
        }
        let indices: Vec<EdgeIndex> = new_edges.iter().map(|e| e.index).collect();
        debug_assert!(index::is_sorted_unique(&indices), "insert_edges: indices must be sorted and unique");

        let remap = index::expand_table(self.edge_count(), &indices);
        index::expand(&mut self.edges, &indices, |k| {
            Edge::new(new_edges[k].node0, new_edges[k].node1)
        });
        self.rebuild_edge_map();
        debug_assert_eq!(self.edge_map.len(), self.edges.len(), "insert_edges: duplicate edge");
        self.rebuild_neighbour_tables();

        tracing::debug!(count = indices.len(), edges = self.edge_count(), "inserted edges");
        self.observers.emit(&GraphEvent::EdgesInserted { indices: &indices, remap: &remap });
    }

    /// Remove edges by index (sorted ascending, unique).
    pub fn remove_edges(&mut self, indices: &[EdgeIndex]) {
        if indices.is_empty() {
            return;
        }
        debug_assert!(index::is_sorted_unique(indices), "remove_edges: indices must be sorted and unique");

        for &edge_index in indices {
            let edge = self.edges[edge_index as usize];
            let found_a = self.adjacency.tombstone(edge.a, edge_index);
            let found_b = self.adjacency.tombstone(edge.b, edge_index);
            debug_assert!(found_a && found_b, "adjacency missing edge {edge_index}");
            self.edge_map.remove(&edge.key());
        }
        self.adjacency.compact();

        let remap = index::collapse_table(self.edge_count(), indices);
        index::collapse(&mut self.edges, indices);
        self.adjacency.remap_edges(&remap);
        for value in self.edge_map.values_mut() {
            *value = remap[*value as usize];
        }

        tracing::debug!(count = indices.len(), edges = self.edge_count(), "removed edges");
        self.observers.emit(&GraphEvent::EdgesRemoved { indices, remap: &remap });
    }

    /// Rebuild the CSR tables from the edge array.
    pub fn rebuild_neighbour_tables(&mut self) {
        self.adjacency.rebuild(self.positions.len(), &self.edges);
    }

    fn rebuild_edge_map(&mut self) {
        self.edge_map.clear();
        self.edge_map.reserve(self.edges.len());
        for (index, edge) in self.edges.iter().enumerate() {
            self.edge_map.insert(edge.key(), index as EdgeIndex);
        }
    }

    // ========================================================================
    // Node modification batches
    // ========================================================================

    /// Open (or nest into) a modification batch.
    pub fn begin_modify_nodes(&mut self) {
        if self.modify_depth == 0 {
            self.dirty.reset(self.node_count());
        }
        self.modify_depth += 1;
    }

    /// Close a batch. The outermost close emits one `NodesModified`.
    pub fn end_modify_nodes(&mut self) {
        debug_assert!(self.modify_depth > 0, "end_modify_nodes without begin_modify_nodes");
        if self.modify_depth == 0 {
            return;
        }
        self.modify_depth -= 1;
        if self.modify_depth == 0 {
            tracing::trace!(modified = self.dirty.count_ones(), "node batch closed");
            self.observers.emit(&GraphEvent::NodesModified { dirty: &self.dirty });
        }
    }

    /// Scoped batch: the returned guard closes it on drop.
    pub fn modify_nodes(&mut self) -> ModifyNodes<'_> {
        self.begin_modify_nodes();
        ModifyNodes { store: self }
    }

    pub fn is_modifying_nodes(&self) -> bool {
        self.modify_depth > 0
    }

    fn mark_dirty(&mut self, node: NodeIndex) {
        debug_assert!(self.modify_depth > 0, "node {node} mutated outside a modification batch");
        if self.modify_depth > 0 {
            self.dirty.insert(node);
        }
    }

    pub fn set_position(&mut self, node: NodeIndex, position: Position) {
        self.mark_dirty(node);
        self.positions[node as usize] = position;
    }

    pub fn set_category(&mut self, node: NodeIndex, category: Option<CategoryIndex>) {
        self.mark_dirty(node);
        self.categories[node as usize] = category;
    }

    pub fn set_name(&mut self, node: NodeIndex, name: impl Into<String>) {
        self.mark_dirty(node);
        self.names[node as usize] = name.into();
    }

    /// Write one cell of a registered `Column<T>`.
    pub fn set_column_value<T: Clone + 'static>(
        &mut self,
        name: &str,
        node: NodeIndex,
        value: T,
    ) -> Result<()> {
        debug_assert!((node as usize) < self.node_count(), "node {node} out of range");
        let column = self.column_entry_mut::<T>(name)?;
        column.set(node, value);
        self.mark_dirty(node);
        Ok(())
    }

    // ========================================================================
    // Attribute columns
    // ========================================================================

    /// Register a per-node column. An empty column is sized to the current
    /// node count; a non-empty one must already match it.
    pub fn register_column(
        &mut self,
        name: impl Into<String>,
        column: impl AttributeColumn,
    ) -> Result<()> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(Error::DuplicateColumn(name));
        }
        let mut column: Box<dyn AttributeColumn> = Box::new(column);
        if column.is_empty() {
            column.resize(self.node_count());
        } else if column.len() != self.node_count() {
            return Err(Error::ColumnLength {
                name,
                expected: self.node_count(),
                got: column.len(),
            });
        }
        tracing::debug!(column = %name, kind = column.type_name(), "registered column");
        self.columns.push(NamedColumn { name, column });
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Box<dyn AttributeColumn>> {
        let position = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(position).column)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Typed read access to a registered column.
    pub fn column<T: Clone + 'static>(&self, name: &str) -> Result<&Column<T>> {
        let named = self
            .columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        named
            .column
            .as_any()
            .downcast_ref::<Column<T>>()
            .ok_or_else(|| Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                got: named.column.type_name(),
            })
    }

    fn column_entry_mut<T: Clone + 'static>(&mut self, name: &str) -> Result<&mut Column<T>> {
        let named = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        let got = named.column.type_name();
        named
            .column
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .ok_or_else(|| Error::ColumnTypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
                got,
            })
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Verify the structural invariants. Intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvariantViolation(msg));
        let offsets = self.adjacency.first_edge_per_node();

        if offsets.len() != self.node_count() + 1 {
            return fail(format!("offsets len {} for {} nodes", offsets.len(), self.node_count()));
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return fail("offsets not monotonic".into());
        }
        let neighbours = self.adjacency.neighbours();
        if neighbours.len() != 2 * self.edge_count() || offsets[self.node_count()] as usize != neighbours.len() {
            return fail(format!("{} neighbours for {} edges", neighbours.len(), self.edge_count()));
        }
        if self.edge_map.len() != self.edge_count() {
            return fail(format!("edge map has {} entries for {} edges", self.edge_map.len(), self.edge_count()));
        }
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.a >= edge.b || edge.b as usize >= self.node_count() {
                return fail(format!("edge {index} {edge:?} not canonical or out of range"));
            }
            if self.edge_map.get(&edge.key()) != Some(&(index as EdgeIndex)) {
                return fail(format!("edge map does not resolve edge {index}"));
            }
            let at_a = self.adjacency.of(edge.a).iter().any(|n| n.edge == index as EdgeIndex && n.node == edge.b);
            let at_b = self.adjacency.of(edge.b).iter().any(|n| n.edge == index as EdgeIndex && n.node == edge.a);
            if !at_a || !at_b {
                return fail(format!("adjacency missing edge {index}"));
            }
        }
        if self.categories.len() != self.node_count() || self.names.len() != self.node_count() {
            return fail("per-node arrays out of step".into());
        }
        for named in &self.columns {
            if named.column.len() != self.node_count() {
                return fail(format!("column '{}' has {} rows", named.name, named.column.len()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// ModifyNodes guard
// ============================================================================

/// Scoped node modification batch returned by [`GraphStore::modify_nodes`].
pub struct ModifyNodes<'s> {
    store: &'s mut GraphStore,
}

impl Deref for ModifyNodes<'_> {
    type Target = GraphStore;

    fn deref(&self) -> &GraphStore {
        &*self.store
    }
}

impl DerefMut for ModifyNodes<'_> {
    fn deref_mut(&mut self) -> &mut GraphStore {
        &mut *self.store
    }
}

impl Drop for ModifyNodes<'_> {
    fn drop(&mut self) {
        self.store.end_modify_nodes();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn chain(n: usize) -> GraphStore {
        let mut store = GraphStore::new();
        store.add_nodes(n);
        let pairs: Vec<_> = (0..n as u32 - 1).map(|i| (i, i + 1)).collect();
        store.add_edges(&pairs);
        store
    }

    fn recorder(store: &mut GraphStore) -> Rc<RefCell<Vec<String>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        store.subscribe(move |event| {
            let line = match event {
                GraphEvent::NodesRemoved { indices, remap } => format!("nodes_removed {indices:?} {remap:?}"),
                GraphEvent::EdgesRemoved { indices, .. } => format!("edges_removed {indices:?}"),
                GraphEvent::NodesModified { dirty } => {
                    format!("nodes_modified {:?}", dirty.iter_ones().collect::<Vec<_>>())
                }
                other => other.kind().to_string(),
            };
            sink.borrow_mut().push(line);
        });
        log
    }

    #[test]
    fn test_add_nodes_and_edges() {
        let store = chain(5);
        assert_eq!(store.node_count(), 5);
        assert_eq!(store.edge_count(), 4);
        assert_eq!(store.find_edge(2, 1), Some(1));
        assert_eq!(store.find_edge(0, 4), None);
        assert_eq!(store.neighbours(2).collect::<Vec<_>>(), vec![1, 3]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_edges_are_canonical() {
        let mut store = GraphStore::new();
        store.add_nodes(3);
        store.add_edges(&[(2, 0)]);
        assert_eq!(store.edge(0), Edge { a: 0, b: 2 });
        assert_eq!(store.find_edge(0, 2), Some(0));
    }

    #[test]
    fn test_remove_middle_of_chain() {
        let mut store = chain(5);
        let log = recorder(&mut store);

        store.remove_nodes(&[2]);

        assert_eq!(store.node_count(), 4);
        assert_eq!(store.edges(), &[Edge::new(0, 1), Edge::new(2, 3)]);
        assert_eq!(store.find_edge(2, 3), Some(1));
        store.check_invariants().unwrap();

        let log = log.borrow();
        assert_eq!(log[0], "edges_removed [1, 2]");
        assert_eq!(log[1], format!("nodes_removed [2] [0, 1, {INVALID_INDEX}, 2, 3]"));
    }

    #[test]
    fn test_insert_nodes_remaps_edges() {
        let mut store = chain(3);
        store.insert_nodes(&[NewNode::new(0, 1.0, 2.0).with_category(7), NewNode::new(2, 0.0, 0.0)]);

        assert_eq!(store.node_count(), 5);
        assert_eq!(store.position(0), Position::new(1.0, 2.0));
        assert_eq!(store.category(0), Some(7));
        assert_eq!(store.edges(), &[Edge::new(1, 3), Edge::new(3, 4)]);
        assert_eq!(store.node_degree(2), 0);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_and_remove_edges() {
        let mut store = chain(4);
        store.insert_edges(&[NewEdge::new(0, 3, 0), NewEdge::new(2, 0, 2)]);
        assert_eq!(
            store.edges(),
            &[Edge::new(0, 3), Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 2), Edge::new(2, 3)]
        );
        store.check_invariants().unwrap();

        store.remove_edges(&[0, 3]);
        assert_eq!(store.edges(), &[Edge::new(0, 1), Edge::new(0, 2), Edge::new(2, 3)]);
        assert_eq!(store.find_edge(3, 2), Some(2));
        assert_eq!(store.neighbours(0).collect::<Vec<_>>(), vec![1, 2]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_edges_connected_to_nodes() {
        let store = chain(5);
        assert_eq!(store.get_edges_connected_to_nodes(&[1, 2]).as_slice(), &[0, 1, 2]);
        assert!(store.get_edges_connected_to_nodes(&[]).is_empty());
    }

    #[test]
    fn test_nested_batches_emit_once() {
        let mut store = chain(4);
        let log = recorder(&mut store);

        store.begin_modify_nodes();
        store.set_position(1, Position::new(3.0, 4.0));
        {
            let mut batch = store.modify_nodes();
            batch.set_name(3, "corner");
        }
        assert!(log.borrow().is_empty());
        store.end_modify_nodes();

        assert_eq!(*log.borrow(), vec!["nodes_modified [1, 3]".to_string()]);
        assert_eq!(store.name(3), "corner");
        assert!(!store.is_modifying_nodes());
    }

    #[test]
    fn test_dirty_mask_follows_structural_edits() {
        let mut store = chain(4);
        let log = recorder(&mut store);

        store.begin_modify_nodes();
        store.set_category(3, Some(1));
        store.insert_nodes(&[NewNode::new(0, 0.0, 0.0)]);
        store.end_modify_nodes();

        assert_eq!(log.borrow().last().unwrap(), "nodes_modified [4]");
    }

    #[test]
    #[should_panic(expected = "outside a modification batch")]
    #[cfg(debug_assertions)]
    fn test_setter_outside_batch_panics() {
        let mut store = chain(2);
        store.set_position(0, Position::new(1.0, 1.0));
    }

    #[test]
    fn test_columns_track_nodes() {
        let mut store = chain(3);
        store.register_column("weight", Column::new(1.0f32)).unwrap();

        {
            let mut batch = store.modify_nodes();
            batch.set_column_value("weight", 2, 5.0f32).unwrap();
        }
        store.insert_nodes(&[NewNode::new(1, 0.0, 0.0)]);
        store.remove_nodes(&[0]);

        let weight = store.column::<f32>("weight").unwrap();
        assert_eq!(weight.values(), &[1.0, 1.0, 5.0]);
        store.check_invariants().unwrap();
    }

    #[test]
    fn test_column_errors() {
        let mut store = chain(3);
        store.register_column("weight", Column::new(0i32)).unwrap();

        assert!(matches!(
            store.register_column("weight", Column::new(0i32)),
            Err(Error::DuplicateColumn(_))
        ));
        assert!(matches!(
            store.register_column("short", Column::from_values(vec![1u8], 0)),
            Err(Error::ColumnLength { expected: 3, got: 1, .. })
        ));
        assert!(matches!(store.column::<f32>("weight"), Err(Error::ColumnTypeMismatch { .. })));
        assert!(matches!(store.column::<i32>("missing"), Err(Error::UnknownColumn(_))));
        assert!(store.remove_column("weight").is_some());
        assert_eq!(store.column_names().count(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = GraphStore::new();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.add_nodes(1);
        assert!(store.unsubscribe(id));
        store.add_nodes(1);
        assert_eq!(*hits.borrow(), 1);
        assert!(!store.unsubscribe(id));
    }
}
