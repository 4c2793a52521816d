//! Node model.
//!
//! Nodes are the content records served by the API (like items in the CMS
//! kernel). Each node carries an ordered map of typed properties; reference
//! properties point at other nodes by id, so the node graph may contain cycles.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Ordered property map of a node. Iteration follows declaration order.
pub type Properties = IndexMap<String, PropertyValue>;

/// Node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A typed property value as stored on a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Sequential collection.
    List(Vec<PropertyValue>),
    /// Keyed collection; key order is preserved.
    Map(IndexMap<String, PropertyValue>),
    /// Embedded media asset.
    Asset(Arc<Asset>),
    /// Reference to another node in the store.
    Reference(NodeId),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<Arc<Asset>> for PropertyValue {
    fn from(asset: Arc<Asset>) -> Self {
        PropertyValue::Asset(asset)
    }
}

impl From<NodeId> for PropertyValue {
    fn from(id: NodeId) -> Self {
        PropertyValue::Reference(id)
    }
}

/// Content node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,

    /// Node type name (e.g. "page", "teaser").
    pub node_type: String,

    /// Public path for document nodes. Content nodes have none.
    pub uri_path: Option<String>,

    /// Stage the node lives in ('live' is default).
    pub stage_id: String,

    /// Language code (default: 'en').
    pub language: String,

    /// Publication status.
    pub published: bool,

    /// Typed properties in declaration order.
    pub properties: Properties,
}

impl Node {
    /// Create a published node in the live stage with no properties.
    pub fn new(id: NodeId, node_type: impl Into<String>) -> Self {
        Self {
            id,
            node_type: node_type.into(),
            uri_path: None,
            stage_id: "live".to_string(),
            language: "en".to_string(),
            published: true,
            properties: Properties::new(),
        }
    }

    /// Check if this node can be linked to (has a public path).
    pub fn is_document(&self) -> bool {
        self.uri_path.is_some()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}
