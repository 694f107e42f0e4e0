//! # Analysis Pipeline
//!
//! Runs the registered [`Analysis`] plugins over a frozen copy of the graph
//! on a background thread and publishes their metrics back on the owning
//! thread.
//!
//! ## Threading
//!
//! | Side | Owns | Touches shared state |
//! |------|------|----------------------|
//! | owning thread | pipeline, published metrics, listeners, pending input | drains the ready queue, returns vectors to the pool |
//! | worker (one per pass) | nothing; borrows the pass input | pushes ready metrics, takes pooled vectors |
//!
//! The ready queue and vector pool sit behind one `parking_lot::Mutex`.
//! Wake-ups and completion travel over an mpsc channel and are handled in
//! [`AnalysisPipeline::process_events`] or
//! [`AnalysisPipeline::wait_until_idle`]; nothing is published outside
//! those calls.
//!
//! ## Coalescing
//!
//! At most one pass runs. An update that arrives mid-pass replaces any
//! queued input, raises the running pass's cancel flag and stops accepting
//! its output. When the pass ends the newest input starts immediately, so
//! a burst of N updates costs at most two passes.
//!
//! Every pass carries a generation number. Metrics tagged with anything but
//! the accepted generation are recycled, never published.

pub mod config;
pub(crate) mod shared;

pub use config::PipelineConfig;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, trace, warn};

use crate::analysis::{self, Analysis, AnalysisContext};
use crate::metrics::Metric;
use crate::model::GraphAttributes;
use crate::snapshot::ImmutableGraph;
use crate::view::GraphView;
use crate::Result;
use shared::{PassEvent, PassInput, PassShared};

/// How often [`AnalysisPipeline::wait_until_idle`] checks for a dead worker.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Public records
// ============================================================================

/// Whether a published metric matches the latest enqueued graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    Current,
    /// A newer graph was enqueued. Values are released; the entry keeps its
    /// place until the next pass replaces or evicts it.
    Stale,
}

/// One published metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricEntry {
    metric: Metric,
    status: MetricStatus,
    generation: u64,
}

impl MetricEntry {
    pub fn name(&self) -> &str {
        &self.metric.name
    }

    /// Per-node values. Empty while stale.
    pub fn values(&self) -> &[f32] {
        &self.metric.values
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn status(&self) -> MetricStatus {
        self.status
    }

    pub fn is_current(&self) -> bool {
        self.status == MetricStatus::Current
    }

    /// Generation of the pass that produced the values.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    Running,
}

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub updates_enqueued: u64,
    /// Updates that arrived while a pass was running.
    pub updates_coalesced: u64,
    pub passes_started: u64,
    pub passes_completed: u64,
    pub passes_cancelled: u64,
    pub metrics_published: u64,
    /// Metrics from superseded passes, dropped on arrival.
    pub metrics_discarded: u64,
    pub metrics_evicted: u64,
}

/// Record of the most recent finished pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    pub generation: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub node_count: usize,
    pub cancelled: bool,
    /// A newer update arrived before the pass ended.
    pub superseded: bool,
    pub metrics_published: usize,
}

// ============================================================================
// Pipeline
// ============================================================================

type MetricListener = Box<dyn FnMut(&str, &[f32])>;

struct RunningPass {
    generation: u64,
    cancel: Arc<AtomicBool>,
    input: Arc<PassInput>,
    /// `None` once joined by `reap_exited_worker`.
    worker: Option<JoinHandle<()>>,
    started_at: DateTime<Utc>,
    published: usize,
}

enum PassState {
    Idle,
    Running(RunningPass),
}

/// Background metric computation with update coalescing.
///
/// All methods must be called from the thread that owns the pipeline.
pub struct AnalysisPipeline {
    config: PipelineConfig,
    analyses: Vec<Arc<dyn Analysis>>,
    shared: Arc<PassShared>,
    events_tx: Sender<PassEvent>,
    events_rx: Receiver<PassEvent>,
    state: PassState,
    pending: Option<PassInput>,
    /// Snapshot buffer from a finished pass, reused by the next enqueue.
    spare_graph: Option<ImmutableGraph>,
    next_generation: u64,
    /// Generation whose metrics may be published; `None` while superseded.
    accepting: Option<u64>,
    metrics: Vec<MetricEntry>,
    listeners: Vec<MetricListener>,
    stats: PipelineStats,
    last_pass: Option<PassSummary>,
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("analyses", &self.analysis_names())
            .field("state", &self.state())
            .field("pending", &self.pending.is_some())
            .field("metrics", &self.metrics.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl AnalysisPipeline {
    /// A pipeline with no analyses registered.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            shared: Arc::new(PassShared::new(config.max_pooled_vectors)),
            config,
            analyses: Vec::new(),
            events_tx,
            events_rx,
            state: PassState::Idle,
            pending: None,
            spare_graph: None,
            next_generation: 0,
            accepting: None,
            metrics: Vec::new(),
            listeners: Vec::new(),
            stats: PipelineStats::default(),
            last_pass: None,
        })
    }

    /// A pipeline running [`DepthAnalysis`](crate::analysis::DepthAnalysis)
    /// then [`IntegrationAnalysis`](crate::analysis::IntegrationAnalysis).
    pub fn with_default_analyses(config: PipelineConfig) -> Result<Self> {
        let mut pipeline = Self::new(config)?;
        pipeline.analyses = analysis::default_analyses(&pipeline.config.root_attribute);
        Ok(pipeline)
    }

    /// Append a plugin. Takes effect from the next pass.
    pub fn register(&mut self, analysis: impl Analysis + 'static) {
        self.analyses.push(Arc::new(analysis));
    }

    pub fn analysis_names(&self) -> Vec<&str> {
        self.analyses.iter().map(|a| a.name()).collect()
    }

    /// Call `listener(name, values)` each time a metric is published.
    pub fn on_metric_updated(&mut self, listener: impl FnMut(&str, &[f32]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> PipelineState {
        match self.state {
            PassState::Idle => PipelineState::Idle,
            PassState::Running(_) => PipelineState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PassState::Running(_))
    }

    /// An update is waiting for the running pass to end.
    pub fn has_pending_update(&self) -> bool {
        self.pending.is_some()
    }

    /// Published metrics, in first-publication order.
    pub fn metrics(&self) -> &[MetricEntry] {
        &self.metrics
    }

    pub fn metric(&self, name: &str) -> Option<&MetricEntry> {
        self.metrics.iter().find(|entry| entry.name() == name)
    }

    /// Current metrics only.
    pub fn current_metrics(&self) -> impl Iterator<Item = &Metric> {
        self.metrics
            .iter()
            .filter(|entry| entry.is_current())
            .map(MetricEntry::metric)
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn last_pass(&self) -> Option<&PassSummary> {
        self.last_pass.as_ref()
    }

    /// Idle vectors held for reuse.
    pub fn pooled_vectors(&self) -> usize {
        self.shared.pooled()
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Freeze `graph` and `attributes` and schedule a pass over them.
    ///
    /// Published metrics become [`MetricStatus::Stale`] at once. If a pass
    /// is running it is cancelled and this input runs after it.
    pub fn enqueue_update<G: GraphView>(
        &mut self,
        graph: &G,
        attributes: &GraphAttributes,
    ) -> Result<()> {
        let mut snapshot = match self.pending.take() {
            Some(previous) => previous.graph,
            None => self.spare_graph.take().unwrap_or_default(),
        };
        snapshot.copy_view(graph);
        self.pending = Some(PassInput {
            graph: snapshot,
            attributes: attributes.clone(),
        });
        self.stats.updates_enqueued += 1;
        self.invalidate_published();

        if let PassState::Running(pass) = &self.state {
            pass.cancel.store(true, Ordering::Relaxed);
            self.accepting = None;
            self.stats.updates_coalesced += 1;
            debug!(generation = pass.generation, "update coalesced into running pass");
            return Ok(());
        }
        self.start_pass()
    }

    fn invalidate_published(&mut self) {
        for entry in &mut self.metrics {
            if entry.status == MetricStatus::Current {
                entry.status = MetricStatus::Stale;
                self.shared.recycle(std::mem::take(&mut entry.metric.values));
            }
        }
    }

    fn start_pass(&mut self) -> Result<()> {
        let Some(input) = self.pending.take() else {
            return Ok(());
        };
        self.next_generation += 1;
        let generation = self.next_generation;
        let input = Arc::new(input);
        let cancel = Arc::new(AtomicBool::new(false));

        let worker = {
            let analyses = self.analyses.clone();
            let input = Arc::clone(&input);
            let shared = Arc::clone(&self.shared);
            let events = self.events_tx.clone();
            let cancel = Arc::clone(&cancel);
            thread::Builder::new()
                .name(self.config.worker_thread_name.clone())
                .spawn(move || run_pass(generation, &analyses, &input, &shared, &events, &cancel))?
        };

        info!(
            generation,
            nodes = input.graph.node_count(),
            analyses = self.analyses.len(),
            "analysis pass started"
        );
        self.accepting = Some(generation);
        self.stats.passes_started += 1;
        self.state = PassState::Running(RunningPass {
            generation,
            cancel,
            input,
            worker: Some(worker),
            started_at: Utc::now(),
            published: 0,
        });
        Ok(())
    }

    // ========================================================================
    // Event handling
    // ========================================================================

    /// Handle every queued worker event without blocking. Returns how many
    /// were handled.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from an analysis plugin.
    pub fn process_events(&mut self) -> Result<usize> {
        let exited = self.exited_worker();
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event)?;
            handled += 1;
        }
        if let Some(generation) = exited {
            self.reap_exited_worker(generation)?;
        }
        Ok(handled)
    }

    /// Block until no pass is running or queued, handling events as they
    /// arrive.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from an analysis plugin.
    pub fn wait_until_idle(&mut self) -> Result<()> {
        while self.is_running() {
            let exited = self.exited_worker();
            match self.events_rx.recv_timeout(POLL_INTERVAL) {
                Ok(event) => self.handle_event(event)?,
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(generation) = exited {
                        self.reap_exited_worker(generation)?;
                    }
                }
                // The pipeline holds a sender, so this cannot happen.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.process_events()?;
        Ok(())
    }

    fn handle_event(&mut self, event: PassEvent) -> Result<()> {
        match event {
            PassEvent::MetricReady => {
                self.drain_ready();
                Ok(())
            }
            PassEvent::Finished { generation, cancelled } => {
                self.drain_ready();
                self.finish_pass(generation, cancelled)
            }
        }
    }

    fn drain_ready(&mut self) {
        for ready in self.shared.drain_ready() {
            if self.accepting != Some(ready.generation) {
                trace!(
                    generation = ready.generation,
                    metric = %ready.metric.name,
                    "discarding metric from superseded pass"
                );
                self.stats.metrics_discarded += 1;
                self.shared.recycle(ready.metric.values);
                continue;
            }
            self.publish(ready.generation, ready.metric);
        }
    }

    fn publish(&mut self, generation: u64, metric: Metric) {
        let index = match self.metrics.iter().position(|entry| entry.name() == metric.name) {
            Some(index) => {
                let entry = &mut self.metrics[index];
                let old = std::mem::replace(&mut entry.metric.values, metric.values);
                entry.status = MetricStatus::Current;
                entry.generation = generation;
                self.shared.recycle(old);
                index
            }
            None => {
                self.metrics.push(MetricEntry {
                    metric,
                    status: MetricStatus::Current,
                    generation,
                });
                self.metrics.len() - 1
            }
        };
        self.stats.metrics_published += 1;
        if let PassState::Running(pass) = &mut self.state {
            pass.published += 1;
        }

        let entry = &self.metrics[index];
        trace!(metric = %entry.metric.name, generation, "metric published");
        for listener in &mut self.listeners {
            listener(&entry.metric.name, &entry.metric.values);
        }
    }

    fn finish_pass(&mut self, generation: u64, cancelled: bool) -> Result<()> {
        let pass = match std::mem::replace(&mut self.state, PassState::Idle) {
            PassState::Running(pass) if pass.generation == generation => pass,
            other => {
                warn!(generation, "completion for a pass that is not running");
                self.state = other;
                return Ok(());
            }
        };
        if let Some(Err(payload)) = pass.worker.map(JoinHandle::join) {
            std::panic::resume_unwind(payload);
        }

        let superseded = self.accepting != Some(generation);
        self.accepting = None;
        if cancelled {
            self.stats.passes_cancelled += 1;
        } else {
            self.stats.passes_completed += 1;
        }
        let summary = PassSummary {
            generation,
            started_at: pass.started_at,
            finished_at: Utc::now(),
            node_count: pass.input.graph.node_count(),
            cancelled,
            superseded,
            metrics_published: pass.published,
        };
        info!(
            generation,
            cancelled,
            superseded,
            published = summary.metrics_published,
            elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
            "analysis pass finished"
        );
        self.last_pass = Some(summary);

        if let Ok(input) = Arc::try_unwrap(pass.input) {
            self.spare_graph = Some(input.graph);
        }

        if self.pending.is_some() {
            self.start_pass()
        } else {
            if !superseded {
                self.evict_stale();
            }
            Ok(())
        }
    }

    /// Drop metrics the last full pass did not refresh.
    fn evict_stale(&mut self) {
        let before = self.metrics.len();
        self.metrics.retain(|entry| entry.status == MetricStatus::Current);
        let evicted = before - self.metrics.len();
        if evicted > 0 {
            debug!(evicted, "evicted stale metrics");
            self.stats.metrics_evicted += evicted as u64;
        }
    }

    /// Generation of the running pass if its worker thread has exited.
    fn exited_worker(&self) -> Option<u64> {
        match &self.state {
            PassState::Running(pass)
                if pass.worker.as_ref().is_some_and(JoinHandle::is_finished) =>
            {
                Some(pass.generation)
            }
            _ => None,
        }
    }

    /// Join the exited worker of `generation`, then handle whatever it sent.
    /// The join orders every send of the worker before the drain, so a pass
    /// still running afterwards never reported completion.
    fn reap_exited_worker(&mut self, generation: u64) -> Result<()> {
        let joined = match &mut self.state {
            PassState::Running(pass) if pass.generation == generation => {
                pass.worker.take().map(JoinHandle::join)
            }
            _ => return Ok(()),
        };
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event)?;
        }

        match &self.state {
            PassState::Running(pass) if pass.generation == generation => {}
            _ => return Ok(()),
        }
        self.state = PassState::Idle;
        self.accepting = None;
        if let Some(Err(payload)) = joined {
            std::panic::resume_unwind(payload);
        }
        warn!(generation, "worker exited without reporting completion");
        self.start_pass()
    }
}

impl Drop for AnalysisPipeline {
    fn drop(&mut self) {
        // The worker finishes its current plugin and exits on its own.
        if let PassState::Running(pass) = &self.state {
            pass.cancel.store(true, Ordering::Relaxed);
            debug!(generation = pass.generation, "pipeline dropped mid-pass");
        }
    }
}

// ============================================================================
// Worker
// ============================================================================

fn run_pass(
    generation: u64,
    analyses: &[Arc<dyn Analysis>],
    input: &PassInput,
    shared: &PassShared,
    events: &Sender<PassEvent>,
    cancel: &AtomicBool,
) {
    let mut cancelled = false;
    for analysis in analyses {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }
        let _span = debug_span!("analysis", analysis = analysis.name(), generation).entered();
        let mut ctx =
            AnalysisContext::new(&input.graph, &input.attributes, shared, events, generation);
        analysis.run_analysis(&mut ctx);
        debug!(emitted = ctx.emitted(), "analysis done");
    }
    let _ = events.send(PassEvent::Finished { generation, cancelled });
}
