//! JSON Schema inference
//!
//! Converts a decoded JSON value into a JSON-Schema-shaped description of its
//! structure. Inference is purely structural: no example data is carried, and
//! arrays are inferred from their first element only (an empty array keeps
//! the generic `object` items sentinel).

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::warn;

/// Scalar schema kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Number,
    String,
    Boolean,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// Inferred schema for a JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object {
        properties: IndexMap<String, SchemaNode>,
    },
    Array {
        /// `None` when the source array was empty; rendered as the `object`
        /// items sentinel
        items: Option<Box<SchemaNode>>,
    },
    Scalar {
        kind: ScalarKind,
    },
}

impl SchemaNode {
    pub fn scalar(kind: ScalarKind) -> Self {
        SchemaNode::Scalar { kind }
    }
}

/// Infer a schema from a JSON value.
///
/// Returns `None` only for `null`, the one JSON shape with no scalar type
/// mapping; callers drop the offending property rather than abort. Object
/// key order is preserved so repeated runs emit identical documents.
pub fn infer(value: &Value) -> Option<SchemaNode> {
    match value {
        Value::Object(members) => {
            let mut properties = IndexMap::new();
            for (key, member) in members {
                match infer(member) {
                    Some(node) => {
                        properties.insert(key.clone(), node);
                    }
                    None => warn!("dropping property {:?}: value shape has no schema mapping", key),
                }
            }
            Some(SchemaNode::Object { properties })
        }
        Value::Array(items) => {
            let first = items.first().and_then(infer).map(Box::new);
            if first.is_none() && !items.is_empty() {
                warn!("array head has no schema mapping, falling back to object items");
            }
            Some(SchemaNode::Array { items: first })
        }
        Value::String(_) => Some(SchemaNode::scalar(ScalarKind::String)),
        Value::Bool(_) => Some(SchemaNode::scalar(ScalarKind::Boolean)),
        Value::Number(n) => {
            let kind = if n.is_i64() || n.is_u64() {
                ScalarKind::Integer
            } else {
                ScalarKind::Number
            };
            Some(SchemaNode::scalar(kind))
        }
        Value::Null => None,
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Object { properties } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "object")?;
                map.serialize_entry("properties", properties)?;
                map.end()
            }
            SchemaNode::Array { items } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                match items {
                    Some(node) => map.serialize_entry("items", node)?,
                    None => map.serialize_entry("items", "object")?,
                }
                map.end()
            }
            SchemaNode::Scalar { kind } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", kind.as_str())?;
                if *kind == ScalarKind::Number {
                    map.serialize_entry("format", "float")?;
                }
                map.end()
            }
        }
    }
}
