//! # Graph Model
//!
//! Plain data types shared by the store, the snapshot and the analyses.
//!
//! Design rule: no storage, no threads, no I/O here. This module is pure
//! data.

pub mod attributes;
pub mod edge;
pub mod node;
pub mod value;

pub use attributes::GraphAttributes;
pub use edge::{Edge, NewEdge, edge_key};
pub use node::{CategoryIndex, NewNode, Position};
pub use value::Value;
