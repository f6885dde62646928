//! The generic document tree.
//!
//! `DocumentNode` mirrors the JSON value kinds, with one difference from
//! `serde_json::Value`: map keys always keep their insertion order, both when
//! parsed from text and when rendered back out.

use crate::error::DocumentError;
use crate::map::DocumentMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// A dynamically shaped document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocumentNode {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<DocumentNode>),
    Map(DocumentMap),
}

/// The kind of a node, used in shape diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    List,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::List => write!(f, "list"),
            Self::Map => write!(f, "map"),
        }
    }
}

impl DocumentNode {
    /// Parse JSON text, keeping map keys in the order they appear.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(text).map_err(DocumentError::Parse)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Render)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Render)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Null => NodeKind::Null,
            Self::Bool(_) => NodeKind::Boolean,
            Self::Number(_) => NodeKind::Number,
            Self::String(_) => NodeKind::String,
            Self::List(_) => NodeKind::List,
            Self::Map(_) => NodeKind::Map,
        }
    }

    /// Strings, numbers, and booleans. Null is not a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Bool(_) | Self::Number(_) | Self::String(_))
    }

    /// Textual form of a scalar: strings verbatim, numbers and booleans as
    /// they would be written in JSON.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(text) => Some(text.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DocumentNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DocumentMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut DocumentMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for DocumentNode {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DocumentNode {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DocumentNode {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DocumentMap> for DocumentNode {
    fn from(value: DocumentMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<DocumentNode>> for DocumentNode {
    fn from(value: Vec<DocumentNode>) -> Self {
        Self::List(value)
    }
}

impl From<Value> for DocumentNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Key order is only carried over if `serde_json` keeps insertion order.
impl From<DocumentNode> for Value {
    fn from(node: DocumentNode) -> Self {
        match node {
            DocumentNode::Null => Value::Null,
            DocumentNode::Bool(flag) => Value::Bool(flag),
            DocumentNode::Number(number) => Value::Number(number),
            DocumentNode::String(text) => Value::String(text),
            DocumentNode::List(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            DocumentNode::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for DocumentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => number.serialize(serializer),
            Self::String(text) => serializer.serialize_str(text),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

struct DocumentNodeVisitor;

impl<'de> Visitor<'de> for DocumentNodeVisitor {
    type Value = DocumentNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<DocumentNode, E> {
        Ok(DocumentNode::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<DocumentNode, E> {
        Ok(DocumentNode::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<DocumentNode, E> {
        Ok(DocumentNode::Number(value.into()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<DocumentNode, E> {
        Number::from_f64(value)
            .map(DocumentNode::Number)
            .ok_or_else(|| E::custom(format!("non-finite number {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<DocumentNode, E> {
        Ok(DocumentNode::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<DocumentNode, E> {
        Ok(DocumentNode::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<DocumentNode, E> {
        Ok(DocumentNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<DocumentNode, E> {
        Ok(DocumentNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DocumentNode, D::Error> {
        DocumentNode::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<DocumentNode, A::Error> {
        let mut items = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(item) = access.next_element::<DocumentNode>()? {
            items.push(item);
        }
        Ok(DocumentNode::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DocumentNode, A::Error> {
        let mut map = DocumentMap::with_capacity(access.size_hint().unwrap_or(0));
        // Duplicate keys: last value wins, first position is kept.
        while let Some((key, value)) = access.next_entry::<String, DocumentNode>()? {
            map.insert(key, value);
        }
        Ok(DocumentNode::Map(map))
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentNodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_preserves_key_order_on_render() {
        let node = DocumentNode::parse(r#"{"zeta":1,"alpha":[true,null,"x"],"mid":{"b":2.5,"a":-3}}"#)
            .expect("document should parse");
        let rendered = node.to_json_string().expect("document should render");
        insta::assert_snapshot!(rendered, @r#"{"zeta":1,"alpha":[true,null,"x"],"mid":{"b":2.5,"a":-3}}"#);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        let err = DocumentNode::parse("{\"rules\": [").expect_err("truncated json should fail");
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn string_and_number_with_same_text_are_not_equal() {
        let text = DocumentNode::from(json!("301"));
        let number = DocumentNode::from(json!(301));
        assert_ne!(text, number);
        assert_eq!(text.scalar_text(), number.scalar_text());
    }

    #[test]
    fn scalar_classification_excludes_null_and_containers() {
        assert!(DocumentNode::from(json!("a")).is_scalar());
        assert!(DocumentNode::from(json!(1)).is_scalar());
        assert!(DocumentNode::from(json!(false)).is_scalar());
        assert!(!DocumentNode::Null.is_scalar());
        assert!(!DocumentNode::from(json!([1])).is_scalar());
        assert!(!DocumentNode::from(json!({"a": 1})).is_scalar());
    }

    #[test]
    fn value_conversion_round_trips_content() {
        let value = json!({"rules": [{"name": "R", "matches": []}], "state": null});
        let node = DocumentNode::from(value.clone());
        assert_eq!(node.kind(), NodeKind::Map);
        assert_eq!(Value::from(node), value);
    }
}
