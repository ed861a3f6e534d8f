//! Core data types for sitemap entries.
//!
//! A caller supplies entries as [`Record`]s: ordered maps from [`Key`] to
//! [`Value`]. Integer keys mark members of a repeated group (several
//! `<image:image>` blocks under one `<url>`), name keys mark ordinary fields.
//! Accepted entries are stored as [`RenderTree`]s, which carry final tag
//! names and transformed text and no longer depend on the schema.

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// Key of a field inside a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Member of a repeated group.
    Index(usize),
    /// Named field.
    Name(String),
}

impl Key {
    /// The field name, if this is a named key.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A raw field value supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Record(Record),
}

impl Value {
    /// Whether the value counts as absent for required-node checks.
    ///
    /// Empty strings and empty records are empty; numbers and booleans never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Record(record) => record.is_empty(),
            Self::Integer(_) | Self::Float(_) | Self::Bool(_) => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Numeric view of the value. Text is parsed after trimming.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(_) | Self::Record(_) => None,
        }
    }

    /// Text rendered for a scalar value; `None` for records.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Record(_) => None,
        }
    }

    /// Convert a JSON value. `null` has no counterpart and yields `None`.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Self::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Float),
            },
            serde_json::Value::String(s) => Some(Self::Text(s)),
            serde_json::Value::Array(items) => Some(Self::Record(
                items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, item)| Self::from_json(item).map(|v| (Key::Index(i), v)))
                    .collect(),
            )),
            serde_json::Value::Object(map) => Some(Self::Record(Record::from_json_map(map))),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(raw).ok_or_else(|| serde::de::Error::custom("null is not a sitemap value"))
    }
}

/// Ordered raw entry record.
///
/// Inserting an existing key replaces its value in place, so field order
/// is the order of first insertion.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::types::{Record, Value};
///
/// let entry = Record::new()
///     .with("loc", "http://example.com/a")
///     .with("priority", 0.8);
/// assert_eq!(entry.get("loc"), Some(&Value::from("http://example.com/a")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Key, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Append a repeated-group member, builder style.
    #[must_use]
    pub fn with_item(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Remove a named field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let position = self
            .fields
            .iter()
            .position(|(k, _)| k.as_name() == Some(name))?;
        Some(self.fields.remove(position).1)
    }

    /// Append a value under the next free integer key.
    pub fn push(&mut self, value: impl Into<Value>) {
        let next = self
            .fields
            .iter()
            .filter_map(|(k, _)| match k {
                Key::Index(i) => Some(i + 1),
                Key::Name(_) => None,
            })
            .max()
            .unwrap_or(0);
        self.fields.push((Key::Index(next), value.into()));
    }

    /// Look up a named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_name() == Some(name))
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.fields.iter().map(|(k, v)| (k, v))
    }

    /// Convert a JSON object.
    ///
    /// Keys that are plain non-negative integers become [`Key::Index`];
    /// `null` fields are dropped.
    #[must_use]
    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .filter_map(|(name, value)| {
                let key = match name.parse::<usize>() {
                    Ok(index) if index.to_string() == name => Key::Index(index),
                    _ => Key::Name(name),
                };
                Value::from_json(value).map(|v| (key, v))
            })
            .collect()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Record(record) => Ok(record),
            _ => Err(serde::de::Error::custom("sitemap entry must be a record")),
        }
    }
}

/// Parse a JSON array of entry records.
pub fn entries_from_json(input: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(input)?)
}

/// Parse a YAML sequence of entry records.
pub fn entries_from_yaml(input: &str) -> Result<Vec<Record>> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// A processed field: transformed text or nested structure.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Text(String),
    /// Ordinary children plus the members of a repeated group, each member
    /// rendered as a sibling element sharing this node's tag name.
    Nested {
        children: RenderTree,
        repeated: Vec<RenderTree>,
    },
}

impl RenderNode {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Nested { .. } => None,
        }
    }
}

/// Processed entry keyed by final tag name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderTree {
    fields: Vec<(String, RenderNode)>,
}

impl RenderTree {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Insert or replace the node stored under a tag name.
    pub fn insert(&mut self, tag: impl Into<String>, node: RenderNode) {
        let tag = tag.into();
        match self.fields.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, existing)) => *existing = node,
            None => self.fields.push((tag, node)),
        }
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&RenderNode> {
        self.fields.iter().find(|(t, _)| t == tag).map(|(_, n)| n)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderNode)> {
        self.fields.iter().map(|(t, n)| (t.as_str(), n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = Record::new().with("loc", "a").with("priority", 0.3);
        record.insert("loc", "b");

        let keys: Vec<_> = record.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Key::from("loc"), Key::from("priority")]);
        assert_eq!(record.get("loc"), Some(&Value::from("b")));
    }

    #[test]
    fn test_record_push_uses_next_index() {
        let record = Record::new()
            .with_item(Record::new().with("loc", "a"))
            .with("title", "x")
            .with_item(Record::new().with("loc", "b"));

        let keys: Vec<_> = record.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Key::Index(0), Key::from("title"), Key::Index(1)]);
    }

    #[test]
    fn test_value_is_empty() {
        assert!(Value::from("").is_empty());
        assert!(Value::from(Record::new()).is_empty());
        assert!(!Value::from(0).is_empty());
        assert!(!Value::from(false).is_empty());
        assert!(!Value::from("0").is_empty());
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(Value::from(0.8).to_text().as_deref(), Some("0.8"));
        assert_eq!(Value::from(0.5).to_text().as_deref(), Some("0.5"));
        assert_eq!(Value::from(42).to_text().as_deref(), Some("42"));
        assert_eq!(Value::from(Record::new()).to_text(), None);
    }

    #[test]
    fn test_value_as_f64_parses_text() {
        assert_eq!(Value::from(" 0.25 ").as_f64(), Some(0.25));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::from(true).as_f64(), None);
    }

    #[test]
    fn test_from_json_maps_arrays_and_integer_keys() {
        let json = serde_json::json!({
            "loc": "http://example.com",
            "image": [{"loc": "http://example.com/1.jpg"}, {"loc": "http://example.com/2.jpg"}],
            "video": {"0": {"title": "a"}, "title": "b"},
            "lastmod": null
        });
        let Some(Value::Record(record)) = Value::from_json(json) else {
            panic!("expected record");
        };

        assert!(!record.contains("lastmod"));
        let images = record.get("image").and_then(Value::as_record).unwrap();
        let keys: Vec<_> = images.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);

        let video = record.get("video").and_then(Value::as_record).unwrap();
        assert!(video.iter().any(|(k, _)| *k == Key::Index(0)));
        assert_eq!(video.get("title"), Some(&Value::from("b")));
    }

    #[test]
    fn test_entries_from_json_rejects_scalars() {
        assert!(entries_from_json(r#"[{"loc": "http://example.com"}]"#).is_ok());
        assert!(entries_from_json(r#"["http://example.com"]"#).is_err());
    }

    #[test]
    fn test_entries_from_yaml() {
        let yaml = "- loc: http://example.com/a\n  priority: 0.8\n- loc: http://example.com/b\n";
        let entries = entries_from_yaml(yaml).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get("priority"), Some(&Value::Float(0.8)));
    }

    #[test]
    fn test_render_tree_insert_replaces() {
        let mut tree = RenderTree::new();
        tree.insert("loc", RenderNode::Text("a".into()));
        tree.insert("loc", RenderNode::Text("b".into()));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("loc").and_then(RenderNode::as_text), Some("b"));
    }
}
