//! In-memory node store.
//!
//! Read-only after construction. Can be populated programmatically or loaded
//! from a JSON content graph document:
//!
//! ```json
//! {
//!   "assets": [{"id": "img-1", "kind": {"type": "image", "width": 800, "height": 600}, ...}],
//!   "nodes": [{"id": "home", "nodeType": "page", "uriPath": "/", "properties": {
//!     "hero": {"$asset": "img-1"},
//!     "related": [{"$node": "about"}]
//!   }}]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{GraphError, NodeStore};
use crate::models::{Asset, AssetId, Node, NodeId, Properties, PropertyValue};

/// Marker key for an embedded asset: `{"$asset": "<id>"}`.
const ASSET_MARKER: &str = "$asset";

/// Marker key for a node reference: `{"$node": "<id>"}`.
const NODE_MARKER: &str = "$node";

/// Content graph document.
#[derive(Deserialize)]
struct GraphDocument {
    #[serde(default)]
    assets: Vec<Asset>,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

/// Node as stored in a content graph document.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeRecord {
    id: NodeId,
    node_type: String,
    #[serde(default)]
    uri_path: Option<String>,
    #[serde(default = "default_stage")]
    stage_id: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default = "default_published")]
    published: bool,
    #[serde(default)]
    properties: serde_json::Map<String, JsonValue>,
}

fn default_stage() -> String {
    "live".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_published() -> bool {
    true
}

/// Node store backed by hash maps.
#[derive(Debug, Default)]
pub struct InMemoryNodeStore {
    nodes: HashMap<NodeId, Arc<Node>>,
    assets: HashMap<AssetId, Arc<Asset>>,
}

impl InMemoryNodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node.
    pub fn insert_node(&mut self, node: Node) -> Arc<Node> {
        let node = Arc::new(node);
        self.nodes.insert(node.id.clone(), Arc::clone(&node));
        node
    }

    /// Add or replace an asset.
    pub fn insert_asset(&mut self, asset: Asset) -> Arc<Asset> {
        let asset = Arc::new(asset);
        self.assets.insert(asset.id.clone(), Arc::clone(&asset));
        asset
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Load a content graph document from disk.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build a store from a content graph document.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let document: GraphDocument = serde_json::from_str(json)?;
        let mut store = Self::new();

        for asset in document.assets {
            if store.assets.contains_key(&asset.id) {
                return Err(GraphError::DuplicateAsset(asset.id));
            }
            store.insert_asset(asset);
        }

        for record in document.nodes {
            if store.nodes.contains_key(&record.id) {
                return Err(GraphError::DuplicateNode(record.id));
            }

            let mut properties = Properties::with_capacity(record.properties.len());
            for (name, value) in record.properties {
                let value = store.property_from_json(value, &record.id, &name)?;
                properties.insert(name, value);
            }

            store.insert_node(Node {
                id: record.id,
                node_type: record.node_type,
                uri_path: record.uri_path,
                stage_id: record.stage_id,
                language: record.language,
                published: record.published,
                properties,
            });
        }

        debug!(
            nodes = store.nodes.len(),
            assets = store.assets.len(),
            "content graph loaded"
        );

        Ok(store)
    }

    /// Convert a raw JSON property into a typed value, resolving markers.
    fn property_from_json(
        &self,
        value: JsonValue,
        node: &NodeId,
        property: &str,
    ) -> Result<PropertyValue, GraphError> {
        let value = match value {
            JsonValue::Null => PropertyValue::Null,
            JsonValue::Bool(b) => PropertyValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().unwrap_or_default()),
            },
            JsonValue::String(s) => PropertyValue::String(s),
            JsonValue::Array(items) => PropertyValue::List(
                items
                    .into_iter()
                    .map(|item| self.property_from_json(item, node, property))
                    .collect::<Result<_, _>>()?,
            ),
            JsonValue::Object(map) if map.len() == 1 && map.contains_key(ASSET_MARKER) => {
                let id = marker_id(&map, ASSET_MARKER, node, property)?;
                let asset_id = AssetId::new(id);
                match self.assets.get(&asset_id) {
                    Some(asset) => PropertyValue::Asset(Arc::clone(asset)),
                    None => {
                        return Err(GraphError::UnknownAsset {
                            node: node.clone(),
                            property: property.to_string(),
                            asset: asset_id,
                        });
                    }
                }
            }
            JsonValue::Object(map) if map.len() == 1 && map.contains_key(NODE_MARKER) => {
                let id = marker_id(&map, NODE_MARKER, node, property)?;
                PropertyValue::Reference(NodeId::new(id))
            }
            JsonValue::Object(map) => {
                let mut entries = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let item = self.property_from_json(item, node, property)?;
                    entries.insert(key, item);
                }
                PropertyValue::Map(entries)
            }
        };

        Ok(value)
    }
}

fn marker_id<'a>(
    map: &'a serde_json::Map<String, JsonValue>,
    marker: &'static str,
    node: &NodeId,
    property: &str,
) -> Result<&'a str, GraphError> {
    map.get(marker)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| GraphError::InvalidMarker {
            node: node.clone(),
            property: property.to_string(),
            marker,
        })
}

impl NodeStore for InMemoryNodeStore {
    fn node(&self, id: &NodeId) -> Result<Option<Arc<Node>>> {
        Ok(self.nodes.get(id).cloned())
    }

    fn asset(&self, id: &AssetId) -> Result<Option<Arc<Asset>>> {
        Ok(self.assets.get(id).cloned())
    }
}
