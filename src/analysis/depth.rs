//! Step depth from a designated root node.

use tracing::debug;

use super::{Analysis, AnalysisContext};
use crate::metrics::DEPTH;
use crate::traversal::BreadthFirst;
use crate::view::GraphView;

/// Emits `Depth`: BFS steps from the node named by a graph attribute,
/// `NaN` where unreachable.
///
/// Emits nothing when the graph is empty or the attribute is missing,
/// non-integral, or out of range.
#[derive(Debug, Clone)]
pub struct DepthAnalysis {
    root_attribute: String,
}

impl DepthAnalysis {
    pub fn new(root_attribute: impl Into<String>) -> Self {
        Self { root_attribute: root_attribute.into() }
    }

    pub fn root_attribute(&self) -> &str {
        &self.root_attribute
    }
}

impl Analysis for DepthAnalysis {
    fn name(&self) -> &str {
        "depth"
    }

    fn run_analysis(&self, ctx: &mut AnalysisContext<'_>) {
        let graph = ctx.graph();
        if graph.node_count() == 0 {
            debug!("depth: empty graph, skipping");
            return;
        }
        let Some(value) = ctx.attribute(&self.root_attribute) else {
            debug!(attribute = %self.root_attribute, "depth: root attribute missing, skipping");
            return;
        };
        let root = value.as_node_index().filter(|&index| graph.contains_index(index));
        let Some(root) = root else {
            debug!(root = %value, "depth: root is not a node index, skipping");
            return;
        };

        let mut values = ctx.new_metric_vector();
        BreadthFirst::new().run(graph, graph.node_from_index(root), |node, depth| {
            values[graph.node_index(node) as usize] = depth as f32;
        });
        ctx.output_metric(DEPTH, values);
    }
}
