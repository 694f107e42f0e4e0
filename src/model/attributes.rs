//! Named graph-level attributes.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::Value;

/// Graph-level attribute table.
///
/// The pipeline copies this at `enqueue_update` time so a pass reads a
/// point-in-time view while the host keeps editing the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphAttributes {
    values: HashMap<String, Value>,
}

impl GraphAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Insert or replace. Returns the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut attrs = GraphAttributes::new();
        assert!(attrs.set("root_node_index", 3).is_none());
        assert_eq!(attrs.get("root_node_index"), Some(&Value::Int(3)));
        assert_eq!(attrs.set("root_node_index", 4), Some(Value::Int(3)));
        assert_eq!(attrs.remove("root_node_index"), Some(Value::Int(4)));
        assert!(attrs.is_empty());
    }
}
