//! Graph-level attribute values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::{INVALID_INDEX, NodeIndex};

/// Value of a named graph-level attribute (e.g. the analysis root node).
///
/// The core stores these opaquely; only the analyses interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

// ============================================================================
// Accessors
// ============================================================================

impl Value {
    /// Integer payload. Integral floats convert, so `2.0` reads as `2`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value read as a node index: a non-negative integer that fits
    /// `u32` and is not the invalid-index sentinel. Range against a
    /// particular graph is the caller's check.
    pub fn as_node_index(&self) -> Option<NodeIndex> {
        self.as_int()
            .and_then(|i| NodeIndex::try_from(i).ok())
            .filter(|&i| i != INVALID_INDEX)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v.into()) } }
impl From<u32> for Value { fn from(v: u32) -> Self { Value::Int(v.into()) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Float(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => b.fmt(f),
            Value::Int(i) => i.fmt(f),
            Value::Float(v) => v.fmt(f),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from("hall"), Value::String("hall".into()));
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(7u32), Value::Int(7));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from(true), Value::Bool(true));
    }

    #[test]
    fn test_as_int_accepts_integral_floats() {
        assert_eq!(Value::Float(3.0).as_int(), Some(3));
        assert_eq!(Value::Float(3.5).as_int(), None);
        assert_eq!(Value::from("3").as_int(), None);
    }

    #[test]
    fn test_as_node_index() {
        assert_eq!(Value::from(3u32).as_node_index(), Some(3));
        assert_eq!(Value::from(4.0).as_node_index(), Some(4));
        assert_eq!(Value::from(-1).as_node_index(), None);
        assert_eq!(Value::Int(i64::from(u32::MAX)).as_node_index(), None);
        assert_eq!(Value::Int(1 << 40).as_node_index(), None);
        assert_eq!(Value::from("0").as_node_index(), None);
        assert_eq!(Value::Null.as_node_index(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(12u32).to_string(), "12");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Value::Int(4)).unwrap();
        assert_eq!(json, r#"{"type":"Int","value":4}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Int(4));
    }
}
