//! Per-node integration family.

use super::{Analysis, AnalysisContext};
use crate::metrics::{
    IntegrationStats, INTEGRATION, MEAN_DEPTH, REAL_RELATIVE_ASYMMETRY, RELATIVE_ASYMMETRY,
    TOTAL_DEPTH,
};
use crate::traversal::DepthCalculator;
use crate::view::GraphView;

/// Runs one BFS per node and emits `Integration`, `TD`, `MD`, `RA` and
/// `RRA`, in that order. O(V · (V + E)).
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrationAnalysis;

impl IntegrationAnalysis {
    pub fn new() -> Self {
        Self
    }
}

impl Analysis for IntegrationAnalysis {
    fn name(&self) -> &str {
        "integration"
    }

    fn run_analysis(&self, ctx: &mut AnalysisContext<'_>) {
        let graph = ctx.graph();
        let mut integration = ctx.new_metric_vector();
        let mut total_depth = ctx.new_metric_vector();
        let mut mean_depth = ctx.new_metric_vector();
        let mut relative_asymmetry = ctx.new_metric_vector();
        let mut real_relative_asymmetry = ctx.new_metric_vector();

        let mut calculator = DepthCalculator::new();
        for node in graph.nodes() {
            let stats = IntegrationStats::from(calculator.calculate(graph, node));
            let i = graph.node_index(node) as usize;
            integration[i] = stats.integration;
            total_depth[i] = stats.total_depth;
            mean_depth[i] = stats.mean_depth;
            relative_asymmetry[i] = stats.relative_asymmetry;
            real_relative_asymmetry[i] = stats.real_relative_asymmetry;
        }

        ctx.output_metric(INTEGRATION, integration);
        ctx.output_metric(TOTAL_DEPTH, total_depth);
        ctx.output_metric(MEAN_DEPTH, mean_depth);
        ctx.output_metric(RELATIVE_ASYMMETRY, relative_asymmetry);
        ctx.output_metric(REAL_RELATIVE_ASYMMETRY, real_relative_asymmetry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::run_once;
    use crate::metrics::integration_stats;
    use crate::model::GraphAttributes;
    use crate::snapshot::ImmutableGraph;
    use crate::storage::GraphStore;

    fn run(nodes: usize, pairs: &[(u32, u32)]) -> Vec<crate::metrics::Metric> {
        let mut store = GraphStore::new();
        store.add_nodes(nodes);
        store.add_edges(pairs);
        let graph = ImmutableGraph::from_view(&store.view());
        run_once(&IntegrationAnalysis::new(), &graph, &GraphAttributes::new())
    }

    #[test]
    fn test_emits_five_metrics_in_order() {
        let metrics = run(3, &[(0, 1), (1, 2)]);
        let names: Vec<&str> = metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Integration", "TD", "MD", "RA", "RRA"]);
        assert!(metrics.iter().all(|m| m.values.len() == 3));
    }

    #[test]
    fn test_star_hub_has_infinite_integration() {
        let metrics = run(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        let integration = &metrics[0].values;
        assert_eq!(integration[0], f32::INFINITY);

        let td = &metrics[1].values;
        assert_eq!(td[0], 4.0);
        assert_eq!(td[1], 7.0);
        assert_eq!(integration[1], integration_stats(5, 7).integration);
    }

    #[test]
    fn test_isolated_node_has_nan_except_td() {
        let metrics = run(3, &[(0, 1)]);
        assert_eq!(metrics[1].values[2], 0.0);
        for index in [0, 2, 3, 4] {
            assert!(metrics[index].values[2].is_nan(), "{}", metrics[index].name);
        }
    }

    #[test]
    fn test_empty_graph_emits_empty_vectors() {
        let metrics = run(0, &[]);
        assert_eq!(metrics.len(), 5);
        assert!(metrics.iter().all(|m| m.values.is_empty()));
    }
}
