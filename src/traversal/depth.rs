//! Depth statistics from one BFS root.

use serde::{Deserialize, Serialize};

use super::BreadthFirst;
use crate::view::GraphView;

/// Aggregates of one BFS run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthStats {
    /// Depth of the last node dequeued.
    pub max_depth: u32,
    /// Sum of depths over every reached node, root included at 0.
    pub total_depth: u64,
    /// Reached nodes, root included.
    pub node_count: u32,
}

/// Runs BFS from a node and accumulates [`DepthStats`].
#[derive(Debug, Clone)]
pub struct DepthCalculator<N> {
    bfs: BreadthFirst<N>,
}

impl<N: Copy> Default for DepthCalculator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy> DepthCalculator<N> {
    pub fn new() -> Self {
        Self { bfs: BreadthFirst::new() }
    }

    pub fn calculate<G>(&mut self, graph: &G, root: N) -> DepthStats
    where
        G: GraphView<Node = N>,
    {
        let mut stats = DepthStats::default();
        self.bfs.run(graph, root, |_, depth| {
            // BFS dequeues in non-decreasing depth, so the last visit is the
            // deepest one.
            stats.max_depth = depth;
            stats.total_depth += depth as u64;
            stats.node_count += 1;
        });
        stats
    }
}
