//! CSR adjacency: per-node offsets into one flat neighbour array.

use crate::index::{EdgeIndex, INVALID_INDEX, NodeIndex};
use crate::model::Edge;

/// One half of an undirected edge as seen from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub node: NodeIndex,
    pub edge: EdgeIndex,
}

#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    /// `node_count + 1` offsets into `neighbours`.
    first_edge_per_node: Vec<u32>,
    /// `2 * edge_count` entries, grouped by node.
    neighbours: Vec<Neighbour>,
}

impl Default for Adjacency {
    fn default() -> Self {
        Self {
            first_edge_per_node: vec![0],
            neighbours: Vec::new(),
        }
    }
}

impl Adjacency {
    pub(crate) fn first_edge_per_node(&self) -> &[u32] {
        &self.first_edge_per_node
    }

    pub(crate) fn neighbours(&self) -> &[Neighbour] {
        &self.neighbours
    }

    pub(crate) fn of(&self, node: NodeIndex) -> &[Neighbour] {
        let node = node as usize;
        let start = self.first_edge_per_node[node] as usize;
        let end = self.first_edge_per_node[node + 1] as usize;
        &self.neighbours[start..end]
    }

    /// Append `count` nodes with no edges.
    pub(crate) fn push_empty_nodes(&mut self, count: usize) {
        let end = self.neighbours.len() as u32;
        self.first_edge_per_node
            .extend(std::iter::repeat_n(end, count));
    }

    /// Rebuild both tables from scratch: two `(from, neighbour)` pairs per
    /// edge, stable-sorted by `from`, then one scan.
    pub(crate) fn rebuild(&mut self, node_count: usize, edges: &[Edge]) {
        let mut pairs: Vec<(NodeIndex, Neighbour)> = Vec::with_capacity(edges.len() * 2);
        for (index, edge) in edges.iter().enumerate() {
            let edge_index = index as EdgeIndex;
            pairs.push((edge.a, Neighbour { node: edge.b, edge: edge_index }));
            pairs.push((edge.b, Neighbour { node: edge.a, edge: edge_index }));
        }
        pairs.sort_by_key(|(from, _)| *from);

        self.first_edge_per_node.clear();
        self.first_edge_per_node.resize(node_count + 1, 0);
        self.neighbours.clear();
        self.neighbours.reserve(pairs.len());

        let mut cursor = 0;
        for node in 0..node_count {
            self.first_edge_per_node[node] = self.neighbours.len() as u32;
            while cursor < pairs.len() && pairs[cursor].0 as usize == node {
                self.neighbours.push(pairs[cursor].1);
                cursor += 1;
            }
        }
        self.first_edge_per_node[node_count] = self.neighbours.len() as u32;
        debug_assert_eq!(cursor, pairs.len(), "edge endpoint beyond node count");
    }

    /// Mark `edge`'s entry in `node`'s range as removed. Returns whether an
    /// entry was found.
    pub(crate) fn tombstone(&mut self, node: NodeIndex, edge: EdgeIndex) -> bool {
        let node = node as usize;
        let start = self.first_edge_per_node[node] as usize;
        let end = self.first_edge_per_node[node + 1] as usize;
        match self.neighbours[start..end].iter_mut().find(|n| n.edge == edge) {
            Some(entry) => {
                entry.edge = INVALID_INDEX;
                true
            }
            None => false,
        }
    }

    /// Squeeze out tombstoned entries, node by node, in one stable pass.
    pub(crate) fn compact(&mut self) {
        let node_count = self.first_edge_per_node.len() - 1;
        let mut write = 0usize;
        for node in 0..node_count {
            let start = self.first_edge_per_node[node] as usize;
            let end = self.first_edge_per_node[node + 1] as usize;
            self.first_edge_per_node[node] = write as u32;
            for read in start..end {
                if self.neighbours[read].edge != INVALID_INDEX {
                    self.neighbours[write] = self.neighbours[read];
                    write += 1;
                }
            }
        }
        self.first_edge_per_node[node_count] = write as u32;
        self.neighbours.truncate(write);
    }

    /// Rewrite edge references through an edge remap table.
    pub(crate) fn remap_edges(&mut self, table: &[u32]) {
        for entry in self.neighbours.iter_mut() {
            entry.edge = table[entry.edge as usize];
        }
    }
}
