//! Reference token resolution.
//!
//! Turns `node://<id>` and `asset://<id>` tokens into URIs. `Ok(None)` means
//! the target cannot be linked (missing, unpublished, other stage); `Err`
//! means the lookup itself failed.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::AssetResolver;
use crate::content::{RequestContext, ReferenceScheme, reference};
use crate::models::{AssetId, Node, NodeId};
use crate::store::NodeStore;

/// Resolves reference tokens to URIs.
pub trait LinkResolver: Send + Sync {
    /// Resolve a `node://` token relative to the request's context node.
    fn resolve_node_uri(
        &self,
        token: &str,
        context_node: &Node,
        request: &RequestContext,
    ) -> Result<Option<String>>;

    /// Resolve an `asset://` token to the asset's public URI.
    fn resolve_asset_uri(&self, token: &str, request: &RequestContext) -> Result<Option<String>>;
}

/// Link resolver backed by a node store.
pub struct StoreLinkResolver {
    store: Arc<dyn NodeStore>,
    assets: Arc<dyn AssetResolver>,
}

impl StoreLinkResolver {
    pub fn new(store: Arc<dyn NodeStore>, assets: Arc<dyn AssetResolver>) -> Self {
        Self { store, assets }
    }
}

/// Identifier of a token with the expected scheme, or `None`.
fn token_identifier(token: &str, scheme: ReferenceScheme) -> Option<&str> {
    reference::parse_exact(token)
        .filter(|parsed| parsed.scheme == scheme)
        .map(|parsed| parsed.identifier)
}

impl LinkResolver for StoreLinkResolver {
    fn resolve_node_uri(
        &self,
        token: &str,
        context_node: &Node,
        request: &RequestContext,
    ) -> Result<Option<String>> {
        let Some(id) = token_identifier(token, ReferenceScheme::Node) else {
            debug!(%token, "not a node reference token");
            return Ok(None);
        };

        let Some(target) = self.store.node(&NodeId::new(id))? else {
            debug!(%token, "link target not found");
            return Ok(None);
        };

        if !target.published || target.stage_id != context_node.stage_id {
            debug!(
                %token,
                target_stage = %target.stage_id,
                context_stage = %context_node.stage_id,
                "link target not visible from context node"
            );
            return Ok(None);
        }

        let Some(path) = target.uri_path.as_deref() else {
            debug!(%token, "link target is not a document");
            return Ok(None);
        };

        let uri = request
            .uri_for_path(path)
            .with_context(|| format!("failed to build URI for path '{path}'"))?;
        Ok(Some(uri))
    }

    fn resolve_asset_uri(&self, token: &str, request: &RequestContext) -> Result<Option<String>> {
        let Some(id) = token_identifier(token, ReferenceScheme::Asset) else {
            debug!(%token, "not an asset reference token");
            return Ok(None);
        };

        let Some(asset) = self.store.asset(&AssetId::new(id))? else {
            debug!(%token, "asset not found");
            return Ok(None);
        };

        let path = self.assets.public_resource_uri(&asset.resource)?;
        let uri = request
            .uri_for_path(&path)
            .with_context(|| format!("failed to build URI for path '{path}'"))?;
        Ok(Some(uri))
    }
}

impl std::fmt::Debug for StoreLinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLinkResolver").finish_non_exhaustive()
    }
}
