use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record in the collection: an open JSON object. Once stored it
/// always carries an `id` field; any other fields the caller supplied are
/// kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Item(pub Map<String, Value>);

impl Item {
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    /// Exact-equality identifier comparison. An item whose `id` has the wrong
    /// JSON type never matches.
    pub fn matches(&self, id: &ItemId) -> bool {
        match (self.id(), id) {
            (Some(Value::Number(n)), ItemId::Int(want)) => n.as_u64() == Some(*want),
            (Some(Value::String(s)), ItemId::Uid(want)) => s == want,
            _ => false,
        }
    }
}

/// Identifier parsed from a request path: a positive integer for the
/// sequential schemes, an opaque string for the uuid scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemId {
    Int(u64),
    Uid(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{}", n),
            ItemId::Uid(s) => f.write_str(s),
        }
    }
}
