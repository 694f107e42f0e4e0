//! Externally registered per-node attribute columns.
//!
//! The store never interprets column contents. It only keeps every column
//! the same length as the node array, splicing and compacting them with the
//! same index lists it applies to its own per-node data.

use std::any::Any;

use crate::index::{self, NodeIndex};

/// A per-node array the store resizes in lockstep with its nodes.
pub trait AttributeColumn: Any {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow or shrink at the end (used by `add_nodes`).
    fn resize(&mut self, len: usize);

    /// Splice default slots in at post-insertion positions.
    fn expand(&mut self, inserted: &[NodeIndex]);

    /// Drop the slots of removed nodes.
    fn collapse(&mut self, removed: &[NodeIndex]);

    /// Element type name, for error messages.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense column of `T`, with `fill` used for newly created nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    values: Vec<T>,
    fill: T,
}

impl<T: Clone + 'static> Column<T> {
    pub fn new(fill: T) -> Self {
        Self { values: Vec::new(), fill }
    }

    pub fn from_values(values: Vec<T>, fill: T) -> Self {
        Self { values, fill }
    }

    pub fn get(&self, node: NodeIndex) -> Option<&T> {
        self.values.get(node as usize)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn fill(&self) -> &T {
        &self.fill
    }

    pub(crate) fn set(&mut self, node: NodeIndex, value: T) {
        self.values[node as usize] = value;
    }
}

impl<T: Clone + 'static> AttributeColumn for Column<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn resize(&mut self, len: usize) {
        self.values.resize(len, self.fill.clone());
    }

    fn expand(&mut self, inserted: &[NodeIndex]) {
        index::expand_with(&mut self.values, inserted, self.fill.clone());
    }

    fn collapse(&mut self, removed: &[NodeIndex]) {
        index::collapse(&mut self.values, removed);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
