//! Extracted records and their flattened views.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A single value inside a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordNode {
    /// String-typed field.
    Leaf(String),
    /// Nested section.
    Section(Record),
    /// Explicit JSON `null`.
    Null,
    /// Any other JSON value (number, boolean, array).
    Other(Value),
}

impl RecordNode {
    /// Convert a JSON value into a node.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Leaf(s),
            Value::Object(map) => Self::Section(Record::from_map(map)),
            Value::Null => Self::Null,
            other => Self::Other(other),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Leaf(s) => Value::String(s.clone()),
            Self::Section(record) => record.to_json(),
            Self::Null => Value::Null,
            Self::Other(v) => v.clone(),
        }
    }
}

/// Ordered mapping from field name to [`RecordNode`].
///
/// Field order follows the source JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, RecordNode)>,
}

impl Record {
    /// Build a record from a JSON value, which must be an object.
    ///
    /// Returns `None` for arrays and scalars.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(key, value)| (key, RecordNode::from_json(value)))
                .collect(),
        }
    }

    /// Look up a direct child field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RecordNode> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate direct children in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert or replace a field, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, node: RecordNode) {
        let key = key.into();
        if let Some(slot) = self.fields.iter_mut().find(|(name, _)| *name == key) {
            slot.1 = node;
        } else {
            self.fields.push((key, node));
        }
    }

    /// Flatten to dotted leaf paths.
    ///
    /// Sections contribute no entry of their own; an empty section contributes
    /// nothing at all.
    #[must_use]
    pub fn flatten(&self) -> FlatView {
        let mut entries = Vec::new();
        self.flatten_into("", &mut entries);
        FlatView { entries }
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, FlatValue)>) {
        for (key, node) in self.iter() {
            let path = join_path(prefix, key);
            match node {
                RecordNode::Section(child) => child.flatten_into(&path, out),
                RecordNode::Leaf(s) => out.push((path, FlatValue::Text(s.clone()))),
                RecordNode::Null => out.push((path, FlatValue::Null)),
                RecordNode::Other(v) => out.push((path, FlatValue::Text(v.to_string()))),
            }
        }
    }

    /// Every dotted path in the record, sections included.
    #[must_use]
    pub fn all_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in self.iter() {
            let path = join_path(prefix, key);
            if let RecordNode::Section(child) = node {
                out.push(path.clone());
                child.collect_paths(&path, out);
            } else {
                out.push(path);
            }
        }
    }

    /// Convert back into a JSON object, preserving field order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, node)| (key.clone(), node.to_json()))
                .collect(),
        )
    }

    /// Pretty-printed JSON; non-ASCII characters are written as-is.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        // Serializing a Value built from strings and maps cannot fail.
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// A flattened leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
    Text(String),
    Null,
}

impl FlatValue {
    /// Text compared during scoring; `Null` reads as empty.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Null => "",
        }
    }

    /// Empty string or null. Whitespace is *not* empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Null => true,
        }
    }
}

/// Dotted-path view of a record's leaves, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatView {
    entries: Vec<(String, FlatValue)>,
}

impl FlatView {
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FlatValue> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
