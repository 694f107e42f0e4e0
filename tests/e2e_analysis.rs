//! End-to-end tests for the built-in analyses run through the pipeline.

use pretty_assertions::assert_eq;
use spacegraph::metrics::{integration_stats, DEPTH, INTEGRATION, MEAN_DEPTH, TOTAL_DEPTH};
use spacegraph::traversal::MinDistanceCalculator;
use spacegraph::{AnalysisPipeline, GraphAttributes, GraphStore, PipelineConfig};

fn store(nodes: usize, pairs: &[(u32, u32)]) -> GraphStore {
    let mut store = GraphStore::new();
    store.add_nodes(nodes);
    store.add_edges(pairs);
    store
}

fn analyse(store: &GraphStore, attributes: &GraphAttributes) -> AnalysisPipeline {
    let mut pipeline = AnalysisPipeline::with_default_analyses(PipelineConfig::default()).unwrap();
    pipeline.enqueue_update(&store.view(), attributes).unwrap();
    pipeline.wait_until_idle().unwrap();
    pipeline
}

fn rooted(root: u32) -> GraphAttributes {
    GraphAttributes::new().with("root_node_index", root)
}

#[test]
fn test_chain_depth() {
    let store = store(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let pipeline = analyse(&store, &rooted(0));
    assert_eq!(pipeline.metric(DEPTH).unwrap().values(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_star_hub() {
    let store = store(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
    let pipeline = analyse(&store, &rooted(0));

    assert_eq!(pipeline.metric(MEAN_DEPTH).unwrap().values()[0], 1.0);
    assert_eq!(pipeline.metric("RA").unwrap().values()[0], 0.0);
    assert_eq!(pipeline.metric("RRA").unwrap().values()[0], 0.0);
    assert_eq!(pipeline.metric(INTEGRATION).unwrap().values()[0], f32::INFINITY);

    let leaf = integration_stats(5, 7);
    assert_eq!(pipeline.metric(TOTAL_DEPTH).unwrap().values()[1], 7.0);
    assert_eq!(pipeline.metric(INTEGRATION).unwrap().values()[1], leaf.integration);
}

#[test]
fn test_depth_matches_shortest_paths() {
    // Grid 3x3 with one diagonal shortcut.
    let mut pairs = Vec::new();
    for row in 0..3u32 {
        for col in 0..3u32 {
            let node = row * 3 + col;
            if col < 2 {
                pairs.push((node, node + 1));
            }
            if row < 2 {
                pairs.push((node, node + 3));
            }
        }
    }
    pairs.push((0, 4));
    let store = store(9, &pairs);
    let pipeline = analyse(&store, &rooted(0));

    let mut distances = vec![0u32; 9];
    MinDistanceCalculator::new().calculate(&store.view(), 0, &mut distances);
    let expected: Vec<f32> = distances.iter().map(|&d| d as f32).collect();
    assert_eq!(pipeline.metric(DEPTH).unwrap().values(), expected.as_slice());
}

#[test]
fn test_disconnected_components() {
    let store = store(5, &[(0, 1), (1, 2), (3, 4)]);
    let pipeline = analyse(&store, &rooted(3));

    let depth = pipeline.metric(DEPTH).unwrap().values();
    assert!(depth[..3].iter().all(|v| v.is_nan()));
    assert_eq!(&depth[3..], &[0.0, 1.0]);

    // Each node only sees its own component.
    let td = pipeline.metric(TOTAL_DEPTH).unwrap().values();
    assert_eq!(td, &[3.0, 2.0, 3.0, 1.0, 1.0]);
}

#[test]
fn test_missing_root_skips_depth_only() {
    let store = store(3, &[(0, 1), (1, 2)]);
    let pipeline = analyse(&store, &GraphAttributes::new());

    assert!(pipeline.metric(DEPTH).is_none());
    assert_eq!(pipeline.metrics().len(), 5);
}

#[test]
fn test_custom_root_attribute() {
    let config = PipelineConfig::from_json(r#"{"root_attribute": "entrance"}"#).unwrap();
    let mut pipeline = AnalysisPipeline::with_default_analyses(config).unwrap();
    let store = store(3, &[(0, 1), (1, 2)]);

    pipeline
        .enqueue_update(&store.view(), &GraphAttributes::new().with("entrance", 2u32))
        .unwrap();
    pipeline.wait_until_idle().unwrap();

    assert_eq!(pipeline.metric(DEPTH).unwrap().values(), &[2.0, 1.0, 0.0]);
}

#[test]
fn test_export_current_metrics() {
    let store = store(3, &[(0, 1), (1, 2)]);
    let pipeline = analyse(&store, &rooted(0));

    let mut csv = Vec::new();
    spacegraph::export::write_metrics_csv(pipeline.current_metrics(), &mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("node,Depth,Integration,TD,MD,RA,RRA"));
    assert_eq!(lines.count(), 3);
}
