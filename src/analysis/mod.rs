//! # Analysis Plugins
//!
//! An [`Analysis`] reads one frozen graph plus its attributes and emits
//! zero or more named metric vectors. Plugins run on the pipeline's worker
//! thread, in registration order, and only ever see snapshot data.
//!
//! | Plugin | Inputs | Outputs |
//! |--------|--------|---------|
//! | [`DepthAnalysis`] | root node attribute | `Depth` |
//! | [`IntegrationAnalysis`] | none | `Integration`, `TD`, `MD`, `RA`, `RRA` |

pub mod depth;
pub mod integration;

pub use depth::DepthAnalysis;
pub use integration::IntegrationAnalysis;

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};

use crate::metrics::Metric;
use crate::model::{GraphAttributes, Value};
use crate::pipeline::shared::{PassEvent, PassShared};
use crate::snapshot::ImmutableGraph;
use crate::view::GraphView;

/// A pluggable computation over a snapshot.
pub trait Analysis: Send + Sync {
    fn name(&self) -> &str;

    /// Compute and emit metrics through `ctx`. Must not block indefinitely;
    /// cancellation only takes effect between plugins.
    fn run_analysis(&self, ctx: &mut AnalysisContext<'_>);
}

/// What a running plugin can see and do.
pub struct AnalysisContext<'p> {
    graph: &'p ImmutableGraph,
    attributes: &'p GraphAttributes,
    shared: &'p PassShared,
    events: &'p Sender<PassEvent>,
    generation: u64,
    emitted: usize,
}

impl<'p> AnalysisContext<'p> {
    pub(crate) fn new(
        graph: &'p ImmutableGraph,
        attributes: &'p GraphAttributes,
        shared: &'p PassShared,
        events: &'p Sender<PassEvent>,
        generation: u64,
    ) -> Self {
        Self {
            graph,
            attributes,
            shared,
            events,
            generation,
            emitted: 0,
        }
    }

    pub fn graph(&self) -> &'p ImmutableGraph {
        self.graph
    }

    pub fn attributes(&self) -> &'p GraphAttributes {
        self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&'p Value> {
        self.attributes.get(name)
    }

    /// A vector with one `NaN` slot per node index, reused from the pool
    /// when one is available.
    pub fn new_metric_vector(&self) -> Vec<f32> {
        self.shared.take_vector(self.graph.index_bound())
    }

    /// Give back a vector obtained from [`new_metric_vector`](Self::new_metric_vector)
    /// that will not be emitted.
    pub fn recycle_vector(&self, values: Vec<f32>) {
        self.shared.recycle(values);
    }

    /// Queue a finished metric for the owning thread. Ownership of `values`
    /// moves to the pipeline.
    pub fn output_metric(&mut self, name: impl Into<String>, values: Vec<f32>) {
        self.shared.push_ready(self.generation, Metric::new(name, values));
        self.emitted += 1;
        // The receiver only disappears when the pipeline is dropped, at which
        // point nobody is waiting for this metric.
        let _ = self.events.send(PassEvent::MetricReady);
    }

    /// Metrics emitted through this context so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

/// Run one plugin synchronously on the calling thread and collect what it
/// emits.
pub fn run_once(
    analysis: &dyn Analysis,
    graph: &ImmutableGraph,
    attributes: &GraphAttributes,
) -> Vec<Metric> {
    let shared = PassShared::new(0);
    let (events, _receiver) = mpsc::channel();
    let mut ctx = AnalysisContext::new(graph, attributes, &shared, &events, 0);
    analysis.run_analysis(&mut ctx);
    shared.drain_ready().into_iter().map(|ready| ready.metric).collect()
}

/// The two built-in plugins, depth first.
pub fn default_analyses(root_attribute: &str) -> Vec<Arc<dyn Analysis>> {
    vec![
        Arc::new(DepthAnalysis::new(root_attribute)) as Arc<dyn Analysis>,
        Arc::new(IntegrationAnalysis::new()),
    ]
}
