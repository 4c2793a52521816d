//! Property converter.
//!
//! Turns a node's typed properties into API-serializable values:
//! assets become URI + metadata records, node references are inlined up to
//! the configured depth, and reference tokens in strings become URIs.

use std::sync::Arc;

use anyhow::Context;
use indexmap::IndexMap;
use tracing::debug;

use super::error::ConvertError;
use super::reference::{self, ReferenceScheme, ReferenceToken};
use super::value::{AssetRecord, ConvertedProperties, ConvertedValue};
use super::RequestContext;
use crate::models::{Asset, Node, NodeId, PropertyValue, ThumbnailConfiguration};
use crate::services::{AssetResolver, LinkResolver};
use crate::settings::ConverterSettings;
use crate::store::NodeStore;

/// Converts node properties using the configured collaborators.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct PropertyConverter {
    settings: ConverterSettings,
    store: Arc<dyn NodeStore>,
    assets: Arc<dyn AssetResolver>,
    links: Arc<dyn LinkResolver>,
}

impl PropertyConverter {
    /// Create a new property converter.
    pub fn new(
        settings: ConverterSettings,
        store: Arc<dyn NodeStore>,
        assets: Arc<dyn AssetResolver>,
        links: Arc<dyn LinkResolver>,
    ) -> Self {
        Self {
            settings,
            store,
            assets,
            links,
        }
    }

    /// Convert the properties of the request's context node.
    pub fn evaluate(&self, request: &RequestContext) -> Result<ConvertedProperties, ConvertError> {
        self.convert_node(&request.context_node, 0, request)
    }

    /// Convert every property of `node`, keeping declaration order.
    pub fn convert_node(
        &self,
        node: &Node,
        depth: u32,
        request: &RequestContext,
    ) -> Result<ConvertedProperties, ConvertError> {
        node.properties
            .iter()
            .map(|(name, value)| -> Result<_, ConvertError> {
                Ok((name.clone(), self.convert_value(value, depth, request)?))
            })
            .collect()
    }

    /// Convert a single property value.
    ///
    /// Only node references increase `depth`; collections are traversed at
    /// the depth of their owner. Empty collections are returned as-is.
    pub fn convert_value(
        &self,
        value: &PropertyValue,
        depth: u32,
        request: &RequestContext,
    ) -> Result<ConvertedValue, ConvertError> {
        let converted = match value {
            PropertyValue::Asset(asset) => ConvertedValue::Asset(self.convert_asset(asset, request)?),
            PropertyValue::List(items) if !items.is_empty() => ConvertedValue::List(
                items
                    .iter()
                    .map(|item| self.convert_value(item, depth, request))
                    .collect::<Result<_, _>>()?,
            ),
            PropertyValue::Map(entries) if !entries.is_empty() => ConvertedValue::Map(
                entries
                    .iter()
                    .map(|(key, item)| -> Result<_, ConvertError> {
                        Ok((key.clone(), self.convert_value(item, depth, request)?))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            PropertyValue::Reference(id) => self.convert_reference(id, depth, request)?,
            PropertyValue::String(text) => self.convert_string(text, request)?,
            PropertyValue::List(_) => ConvertedValue::List(Vec::new()),
            PropertyValue::Map(_) => ConvertedValue::Map(IndexMap::new()),
            PropertyValue::Null => ConvertedValue::Null,
            PropertyValue::Bool(b) => ConvertedValue::Bool(*b),
            PropertyValue::Integer(i) => ConvertedValue::Integer(*i),
            PropertyValue::Float(f) => ConvertedValue::Float(*f),
        };

        Ok(converted)
    }

    fn convert_asset(
        &self,
        asset: &Asset,
        request: &RequestContext,
    ) -> Result<AssetRecord, ConvertError> {
        let asset_error = |source: anyhow::Error| ConvertError::Asset {
            asset: asset.id.clone(),
            source,
        };

        let (src, width, height) = if asset.is_image_like() {
            let config = ThumbnailConfiguration::bounded(
                self.settings.image_maximum_width,
                self.settings.image_maximum_height,
            );
            let thumbnail = self
                .assets
                .thumbnail_uri_and_size(asset, &config, request)
                .map_err(asset_error)?;
            (thumbnail.src, Some(thumbnail.width), Some(thumbnail.height))
        } else {
            let path = self
                .assets
                .public_resource_uri(&asset.resource)
                .map_err(asset_error)?;
            let src = request
                .uri_for_path(&path)
                .with_context(|| format!("failed to build URI for path '{path}'"))
                .map_err(asset_error)?;
            (src, None, None)
        };

        Ok(AssetRecord {
            src,
            width,
            height,
            title: asset.title.clone(),
            caption: asset.caption.clone(),
            copyright_notice: asset.copyright_notice.clone(),
        })
    }

    fn convert_reference(
        &self,
        id: &NodeId,
        depth: u32,
        request: &RequestContext,
    ) -> Result<ConvertedValue, ConvertError> {
        let Some(limit) = self.settings.reference_depth() else {
            debug!(node = %id, "reference recursion disabled, suppressing reference");
            return Ok(ConvertedValue::Null);
        };

        if depth >= limit {
            debug!(node = %id, depth, limit, "reference depth reached, suppressing reference");
            return Ok(ConvertedValue::Null);
        }

        let target = self.store.node(id).map_err(|source| ConvertError::Store {
            node: id.clone(),
            source,
        })?;

        match target {
            Some(node) => Ok(ConvertedValue::Node(self.convert_node(&node, depth + 1, request)?)),
            None => {
                debug!(node = %id, "referenced node not found");
                Ok(ConvertedValue::Null)
            }
        }
    }

    fn convert_string(
        &self,
        text: &str,
        request: &RequestContext,
    ) -> Result<ConvertedValue, ConvertError> {
        if let Some(token) = reference::parse_exact(text) {
            return Ok(self.resolve_token(token, request)?.into());
        }

        let rewritten =
            reference::rewrite_embedded(text, |token| self.resolve_token(token, request))?;
        Ok(ConvertedValue::String(rewritten.into_owned()))
    }

    fn resolve_token(
        &self,
        token: ReferenceToken<'_>,
        request: &RequestContext,
    ) -> Result<Option<String>, ConvertError> {
        let resolved = match token.scheme {
            ReferenceScheme::Node => {
                self.links
                    .resolve_node_uri(token.uri, &request.context_node, request)
            }
            ReferenceScheme::Asset => self.links.resolve_asset_uri(token.uri, request),
        }
        .map_err(|source| ConvertError::Link {
            token: token.uri.to_string(),
            source,
        })?;

        if resolved.is_none() {
            debug!(%token, "reference token could not be resolved");
        }
        Ok(resolved)
    }
}

impl std::fmt::Debug for PropertyConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyConverter")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
