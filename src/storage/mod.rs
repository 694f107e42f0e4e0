//! # Graph Store
//!
//! The mutable, index-addressed graph that interactive edits land on.
//!
//! | Piece | Module | Description |
//! |-------|--------|-------------|
//! | `GraphStore` | `store` | Nodes, canonical edges, edge map, batching |
//! | CSR tables | `adjacency` | `first_edge_per_node` + flat neighbours |
//! | `Column<T>` | `columns` | Opaque per-node attribute arrays |
//! | `GraphEvent` | `events` | Synchronous change notifications |

mod adjacency;
pub mod columns;
pub mod events;
pub mod store;

pub use adjacency::Neighbour;
pub use columns::{AttributeColumn, Column};
pub use events::{GraphEvent, ObserverId};
pub use store::{GraphStore, ModifyNodes};
