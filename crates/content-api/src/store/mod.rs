//! Node store access.
//!
//! The converter only reads from the store: it follows reference properties
//! to their target nodes, and the link resolver looks up token targets.

mod memory;

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;

use crate::models::{Asset, AssetId, Node, NodeId};

pub use memory::InMemoryNodeStore;

/// Read access to nodes and assets.
pub trait NodeStore: Send + Sync {
    /// Load a node by id. `Ok(None)` if it does not exist.
    fn node(&self, id: &NodeId) -> Result<Option<Arc<Node>>>;

    /// Load an asset by id. `Ok(None)` if it does not exist.
    fn asset(&self, id: &AssetId) -> Result<Option<Arc<Asset>>>;
}

/// Errors loading a content graph document.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read content graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid content graph JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("node '{node}': property '{property}' embeds unknown asset '{asset}'")]
    UnknownAsset {
        node: NodeId,
        property: String,
        asset: AssetId,
    },

    #[error("node '{node}': property '{property}' has an invalid {marker} marker")]
    InvalidMarker {
        node: NodeId,
        property: String,
        marker: &'static str,
    },

    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    #[error("duplicate asset id '{0}'")]
    DuplicateAsset(AssetId),
}
