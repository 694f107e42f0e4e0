//! Node payload types.

use serde::{Deserialize, Serialize};

use crate::index::NodeIndex;

/// Index into an external category table. The store treats it as opaque.
pub type CategoryIndex = u32;

/// 2D node position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A node to be spliced in by `GraphStore::insert_nodes`.
///
/// `index` is the position the node occupies *after* the insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    pub index: NodeIndex,
    pub category: Option<CategoryIndex>,
    pub x: f32,
    pub y: f32,
}

impl NewNode {
    pub fn new(index: NodeIndex, x: f32, y: f32) -> Self {
        Self { index, category: None, x, y }
    }

    pub fn with_category(mut self, category: CategoryIndex) -> Self {
        self.category = Some(category);
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}
