//! # Immutable Snapshot
//!
//! A frozen copy of any [`GraphView`] packed into one contiguous byte
//! buffer. Each node is a variable-length record:
//!
//! ```text
//! +--------+------------+----------------------------------+---------+
//! | index  | edge_count | edge_count x (target, address)   | padding |
//! |  u32   |    u32     |          u32      u32            | to 16B  |
//! +--------+------------+----------------------------------+---------+
//! ```
//!
//! `node_addresses[index]` holds each record's offset in 16-byte units, so
//! a node handle is found from its index in O(1) and every edge carries
//! its target's address directly.
//!
//! Building is two-phase: addresses only become known once every record
//! before them has been laid out, so the first pass writes headers and
//! target *indices*, and the second pass resolves target *addresses*.
//! The buffer is reused across builds but never patched: every
//! [`copy_view`](ImmutableGraph::copy_view) starts from empty.

use crate::index::{INVALID_INDEX, NodeIndex};
use crate::view::GraphView;

/// Record alignment in bytes. Addresses are expressed in these units.
pub const RECORD_ALIGNMENT: usize = 16;
/// `index: u32` + `edge_count: u32`.
pub const HEADER_SIZE: usize = 8;
/// `target_index: u32` + `target_address: u32`.
pub const EDGE_SIZE: usize = 8;

const MIN_GROWTH: usize = 4096;

/// Byte size of a record with `edge_count` edges, padded to alignment.
pub fn record_size(edge_count: usize) -> usize {
    (HEADER_SIZE + edge_count * EDGE_SIZE).next_multiple_of(RECORD_ALIGNMENT)
}

/// Node handle: record address in alignment units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotNode(u32);

impl SnapshotNode {
    pub fn address(self) -> u32 {
        self.0
    }

    fn byte_offset(self) -> usize {
        self.0 as usize * RECORD_ALIGNMENT
    }
}

/// Edge handle: byte offset of the edge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotEdge(usize);

// ============================================================================
// ImmutableGraph
// ============================================================================

/// Single-buffer frozen graph, randomly addressable by node index.
#[derive(Debug, Clone, Default)]
pub struct ImmutableGraph {
    buffer: Vec<u8>,
    /// Bytes in use; the bump allocator's cursor.
    used: usize,
    node_addresses: Vec<u32>,
    node_count: usize,
}

impl ImmutableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh snapshot of `source`.
    pub fn from_view<G: GraphView>(source: &G) -> Self {
        let mut graph = Self::new();
        graph.copy_view(source);
        graph
    }

    /// Discard the current contents and freeze `source` into this buffer.
    pub fn copy_view<G: GraphView>(&mut self, source: &G) {
        self.used = 0;
        self.node_count = 0;
        self.node_addresses.clear();
        self.node_addresses.resize(source.node_count(), INVALID_INDEX);

        // Phase 1: lay out records, write headers and target indices.
        for node in source.nodes() {
            let index = source.node_index(node);
            let edge_count = source.node_edge_count(node);
            let offset = self.allocate(record_size(edge_count));

            if index as usize >= self.node_addresses.len() {
                self.node_addresses.resize(index as usize + 1, INVALID_INDEX);
            }
            debug_assert_eq!(self.node_addresses[index as usize], INVALID_INDEX, "node {index} listed twice");
            self.node_addresses[index as usize] = (offset / RECORD_ALIGNMENT) as u32;

            self.write_u32(offset, index);
            self.write_u32(offset + 4, edge_count as u32);
            let mut written = 0;
            for edge in source.node_edges(node) {
                let entry = offset + HEADER_SIZE + written * EDGE_SIZE;
                self.write_u32(entry, source.edge_target_index(edge));
                self.write_u32(entry + 4, INVALID_INDEX);
                written += 1;
            }
            debug_assert_eq!(written, edge_count, "node {index} edge count disagrees with its edges");
            self.node_count += 1;
        }

        // Phase 2: every address is known now; resolve edge targets.
        let mut offset = 0;
        while offset < self.used {
            let edge_count = self.read_u32(offset + 4) as usize;
            for i in 0..edge_count {
                let entry = offset + HEADER_SIZE + i * EDGE_SIZE;
                let target = self.read_u32(entry);
                let address = self.node_addresses[target as usize];
                debug_assert_ne!(address, INVALID_INDEX, "edge targets unknown node {target}");
                self.write_u32(entry + 4, address);
            }
            offset += record_size(edge_count);
        }

        tracing::trace!(nodes = self.node_count, bytes = self.used, "snapshot built");
    }

    /// Drop all records, keeping the allocation.
    pub fn clear(&mut self) {
        self.used = 0;
        self.node_count = 0;
        self.node_addresses.clear();
    }

    /// Bytes occupied by records.
    pub fn byte_len(&self) -> usize {
        self.used
    }

    /// Bytes allocated for records.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Handle for `index`, if that node was part of the source.
    pub fn node(&self, index: NodeIndex) -> Option<SnapshotNode> {
        match self.node_addresses.get(index as usize) {
            Some(&address) if address != INVALID_INDEX => Some(SnapshotNode(address)),
            _ => None,
        }
    }

    fn allocate(&mut self, size: usize) -> usize {
        let offset = self.used;
        let needed = offset + size;
        if needed > self.buffer.len() {
            let grown = needed.max(self.buffer.len() * 2).max(MIN_GROWTH);
            self.buffer.resize(grown, 0);
        }
        debug_assert!(offset / RECORD_ALIGNMENT < INVALID_INDEX as usize, "snapshot address space exhausted");
        self.used = needed;
        offset
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        self.buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn read_u32(&self, offset: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.buffer[offset..offset + 4]);
        u32::from_le_bytes(bytes)
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Records in build order (the source's natural order).
pub struct Nodes<'a> {
    graph: &'a ImmutableGraph,
    offset: usize,
}

impl Iterator for Nodes<'_> {
    type Item = SnapshotNode;

    fn next(&mut self) -> Option<SnapshotNode> {
        if self.offset >= self.graph.used {
            return None;
        }
        let node = SnapshotNode((self.offset / RECORD_ALIGNMENT) as u32);
        let edge_count = self.graph.read_u32(self.offset + 4) as usize;
        self.offset += record_size(edge_count);
        Some(node)
    }
}

/// Edge entries of one record, in source order.
pub struct Edges {
    offset: usize,
    end: usize,
}

impl Iterator for Edges {
    type Item = SnapshotEdge;

    fn next(&mut self) -> Option<SnapshotEdge> {
        if self.offset >= self.end {
            return None;
        }
        let edge = SnapshotEdge(self.offset);
        self.offset += EDGE_SIZE;
        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.offset) / EDGE_SIZE;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Edges {}

// ============================================================================
// GraphView impl
// ============================================================================

impl GraphView for ImmutableGraph {
    type Node = SnapshotNode;
    type Edge = SnapshotEdge;
    type Nodes<'a> = Nodes<'a> where Self: 'a;
    type Edges<'a> = Edges where Self: 'a;

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn nodes(&self) -> Nodes<'_> {
        Nodes { graph: self, offset: 0 }
    }

    fn node_from_index(&self, index: NodeIndex) -> SnapshotNode {
        let address = self.node_addresses[index as usize];
        debug_assert_ne!(address, INVALID_INDEX, "node {index} not in snapshot");
        SnapshotNode(address)
    }

    fn node_index(&self, node: SnapshotNode) -> NodeIndex {
        self.read_u32(node.byte_offset())
    }

    fn node_edge_count(&self, node: SnapshotNode) -> usize {
        self.read_u32(node.byte_offset() + 4) as usize
    }

    fn node_edges(&self, node: SnapshotNode) -> Edges {
        let start = node.byte_offset() + HEADER_SIZE;
        Edges {
            offset: start,
            end: start + self.node_edge_count(node) * EDGE_SIZE,
        }
    }

    fn edge_target_node(&self, edge: SnapshotEdge) -> SnapshotNode {
        SnapshotNode(self.read_u32(edge.0 + 4))
    }

    fn edge_target_index(&self, edge: SnapshotEdge) -> NodeIndex {
        self.read_u32(edge.0)
    }

    fn contains_index(&self, index: NodeIndex) -> bool {
        self.node(index).is_some()
    }

    /// Length of the index → address table.
    fn index_bound(&self) -> usize {
        self.node_addresses.len()
    }
}
