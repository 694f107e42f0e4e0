//! # Traversal Primitives
//!
//! Breadth-first search and the two calculators built on it, all generic
//! over [`GraphView`]. The search state is reusable: the integration
//! analysis runs one BFS per node and should not reallocate each time.

pub mod depth;
pub mod distance;

pub use depth::{DepthCalculator, DepthStats};
pub use distance::{Distance, MinDistanceCalculator};

use std::collections::VecDeque;

use crate::index::BitSet;
use crate::view::GraphView;

/// Reusable breadth-first search over node handles of type `N`.
///
/// Depth is tracked with a wavefront counter instead of per-entry depths:
/// `remaining_in_frontier` starts at 1 (the root), and each time it drops
/// to zero the queue holds exactly the next frontier, so it is reset to the
/// queue length and the depth increments.
#[derive(Debug, Clone)]
pub struct BreadthFirst<N> {
    visited: BitSet,
    queue: VecDeque<N>,
}

impl<N: Copy> Default for BreadthFirst<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy> BreadthFirst<N> {
    pub fn new() -> Self {
        Self {
            visited: BitSet::default(),
            queue: VecDeque::new(),
        }
    }

    /// Visit every node reachable from `root` exactly once, in BFS order,
    /// calling `visit(node, depth)`. O(V + E).
    pub fn run<G, F>(&mut self, graph: &G, root: N, mut visit: F)
    where
        G: GraphView<Node = N>,
        F: FnMut(N, u32),
    {
        self.visited.reset(graph.index_bound());
        self.queue.clear();

        self.visited.insert(graph.node_index(root));
        self.queue.push_back(root);

        let mut depth = 0u32;
        let mut remaining_in_frontier = 1usize;

        while let Some(node) = self.queue.pop_front() {
            visit(node, depth);

            for edge in graph.node_edges(node) {
                if self.visited.insert(graph.edge_target_index(edge)) {
                    self.queue.push_back(graph.edge_target_node(edge));
                }
            }

            remaining_in_frontier -= 1;
            if remaining_in_frontier == 0 {
                remaining_in_frontier = self.queue.len();
                depth += 1;
            }
        }
    }

    /// Nodes reached by the last `run`, by index.
    pub fn visited(&self) -> &BitSet {
        &self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::NodeIndex;
    use crate::storage::GraphStore;

    fn graph(nodes: usize, pairs: &[(u32, u32)]) -> GraphStore {
        let mut store = GraphStore::new();
        store.add_nodes(nodes);
        store.add_edges(pairs);
        store
    }

    fn depths(store: &GraphStore, root: NodeIndex) -> Vec<Option<u32>> {
        let view = store.view();
        let mut out = vec![None; store.node_count()];
        BreadthFirst::new().run(&view, root, |node, depth| out[node as usize] = Some(depth));
        out
    }

    #[test]
    fn test_chain_depths() {
        let store = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        assert_eq!(depths(&store, 0), vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(depths(&store, 2), vec![Some(2), Some(1), Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_cycle_uses_shortest_path() {
        // 0-1-2-3-4-5-0
        let store = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (0, 5)]);
        assert_eq!(
            depths(&store, 0),
            vec![Some(0), Some(1), Some(2), Some(3), Some(2), Some(1)]
        );
    }

    #[test]
    fn test_unreached_nodes_are_not_visited() {
        let store = graph(4, &[(0, 1), (2, 3)]);
        assert_eq!(depths(&store, 0), vec![Some(0), Some(1), None, None]);
    }

    #[test]
    fn test_each_node_visited_once() {
        // Dense: complete graph on 5 nodes.
        let mut pairs = Vec::new();
        for a in 0..5 {
            for b in a + 1..5 {
                pairs.push((a, b));
            }
        }
        let store = graph(5, &pairs);
        let view = store.view();
        let mut bfs = BreadthFirst::new();
        let mut visits = 0;
        bfs.run(&view, 3, |_, _| visits += 1);
        assert_eq!(visits, 5);
        assert_eq!(bfs.visited().count_ones(), 5);
    }

    #[test]
    fn test_state_reuse_across_graphs() {
        let big = graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let small = graph(2, &[(0, 1)]);
        let mut bfs = BreadthFirst::new();
        let mut seen = Vec::new();
        bfs.run(&big.view(), 0, |_, _| {});
        bfs.run(&small.view(), 1, |node, depth| seen.push((node, depth)));
        assert_eq!(seen, vec![(1, 0), (0, 1)]);
    }
}
