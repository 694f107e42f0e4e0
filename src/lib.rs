//! # spacegraph: Space Syntax Graph Engine
//!
//! An editable undirected graph of spatial elements plus a background
//! pipeline that computes space-syntax metrics (step depth, integration,
//! mean depth, relative asymmetry) over frozen snapshots of it.
//!
//! ## Design Principles
//!
//! 1. **Dense indices**: nodes and edges are `u32` positions; every edit
//!    publishes a remap table so derived data can follow
//! 2. **One read protocol**: traversals run against [`GraphView`], satisfied
//!    by the live store and by the frozen snapshot alike
//! 3. **Analyses never see live data**: each pass gets its own
//!    [`ImmutableGraph`] copy
//! 4. **Owning thread publishes**: workers only queue results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spacegraph::{AnalysisPipeline, GraphAttributes, GraphStore, PipelineConfig};
//!
//! # fn example() -> spacegraph::Result<()> {
//! let mut store = GraphStore::new();
//! store.add_nodes(4);
//! store.add_edges(&[(0, 1), (1, 2), (2, 3)]);
//!
//! let mut pipeline = AnalysisPipeline::with_default_analyses(PipelineConfig::default())?;
//! let attributes = GraphAttributes::new().with("root_node_index", 0u32);
//! pipeline.enqueue_update(&store.view(), &attributes)?;
//! pipeline.wait_until_idle()?;
//!
//! for metric in pipeline.current_metrics() {
//!     println!("{}: {:?}", metric.name, metric.values);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | remap tables, bitsets |
//! | [`model`] | edge/node records, graph attributes |
//! | [`storage`] | mutable store, CSR adjacency, columns, observers |
//! | [`view`] | read-only graph protocol |
//! | [`snapshot`] | single-buffer frozen graph |
//! | [`traversal`] | BFS, depth and distance calculators |
//! | [`metrics`] | integration formulas |
//! | [`analysis`] | pluggable analyses |
//! | [`pipeline`] | background passes, coalescing, publication |
//! | [`export`] | JSON / CSV metric output |

// ============================================================================
// Modules
// ============================================================================

pub mod index;
pub mod model;
pub mod storage;
pub mod view;
pub mod snapshot;
pub mod traversal;
pub mod metrics;
pub mod analysis;
pub mod pipeline;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use index::{BitSet, EdgeIndex, NodeIndex, INVALID_INDEX};
pub use model::{CategoryIndex, Edge, GraphAttributes, NewEdge, NewNode, Position, Value};

// ============================================================================
// Re-exports: Storage and views
// ============================================================================

pub use storage::{GraphEvent, GraphStore, ModifyNodes, Neighbour, ObserverId};
pub use snapshot::ImmutableGraph;
pub use view::{GraphView, StoreView};

// ============================================================================
// Re-exports: Analysis
// ============================================================================

pub use analysis::{Analysis, AnalysisContext, DepthAnalysis, IntegrationAnalysis};
pub use metrics::{IntegrationStats, Metric};
pub use pipeline::{
    AnalysisPipeline, MetricEntry, MetricStatus, PassSummary, PipelineConfig, PipelineState,
    PipelineStats,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column already registered: {0}")]
    DuplicateColumn(String),

    #[error("Column {name} holds {got}, not {expected}")]
    ColumnTypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Column {name} has {got} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
