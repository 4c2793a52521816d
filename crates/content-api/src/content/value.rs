//! Converted (API-serializable) property values.

use indexmap::IndexMap;
use serde::Serialize;

/// Converted properties of a node, in declaration order.
pub type ConvertedProperties = IndexMap<String, ConvertedValue>;

/// Output of property conversion. Serializes to plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConvertedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConvertedValue>),
    Map(IndexMap<String, ConvertedValue>),
    Asset(AssetRecord),
    /// Properties of a referenced node, converted one level deeper.
    Node(ConvertedProperties),
}

impl ConvertedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ConvertedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConvertedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetRecord> {
        match self {
            ConvertedValue::Asset(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&ConvertedProperties> {
        match self {
            ConvertedValue::Node(properties) => Some(properties),
            _ => None,
        }
    }
}

impl From<Option<String>> for ConvertedValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(ConvertedValue::Null, ConvertedValue::String)
    }
}

/// Asset as exposed by the API.
///
/// `width`/`height` are present for image-like assets only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub title: String,
    pub caption: String,
    pub copyright_notice: String,
}
