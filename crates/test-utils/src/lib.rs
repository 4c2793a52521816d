//! Trovato test utilities.
//!
//! Helpers for integration testing: node and asset fixtures, stub
//! collaborators for the property converter, and assertion utilities.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use url::Url;
use uuid::Uuid;

use trovato_content_api::models::{
    Asset, AssetId, AssetKind, Node, NodeId, PropertyValue, Resource, Thumbnail,
    ThumbnailConfiguration,
};
use trovato_content_api::services::{AssetResolver, LinkResolver};
use trovato_content_api::store::InMemoryNodeStore;
use trovato_content_api::{ConverterSettings, PropertyConverter, RequestContext};

/// Base URI used by [`request_for`].
pub const TEST_BASE_URI: &str = "https://example.com/";

/// Create a test node with default values.
pub fn test_node(node_type: &str) -> TestNode {
    TestNode {
        node: Node::new(NodeId::new(Uuid::now_v7().to_string()), node_type),
    }
}

/// A test node builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestNode {
    node: Node,
}

impl TestNode {
    /// Set a custom ID.
    pub fn with_id(mut self, id: &str) -> Self {
        self.node.id = NodeId::new(id);
        self
    }

    /// Give the node a public path (makes it linkable).
    pub fn with_path(mut self, path: &str) -> Self {
        self.node.uri_path = Some(path.to_string());
        self
    }

    /// Set as unpublished.
    pub fn unpublished(mut self) -> Self {
        self.node.published = false;
        self
    }

    /// Set stage.
    pub fn with_stage(mut self, stage_id: &str) -> Self {
        self.node.stage_id = stage_id.to_string();
        self
    }

    /// Add a single property.
    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.node.properties.insert(name.to_string(), value.into());
        self
    }

    /// Add a reference property.
    pub fn with_reference(self, name: &str, target: &str) -> Self {
        self.with_property(name, PropertyValue::Reference(NodeId::new(target)))
    }

    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Create an image asset with intrinsic dimensions.
pub fn test_image(id: &str, width: u32, height: u32) -> Asset {
    Asset {
        id: AssetId::new(id),
        kind: AssetKind::Image { width, height },
        resource: Resource {
            uri: format!("local://2024/01/{id}.jpg"),
            filename: format!("{id}.jpg"),
            media_type: "image/jpeg".to_string(),
        },
        title: format!("Title of {id}"),
        caption: format!("Caption of {id}"),
        copyright_notice: format!("(c) {id}"),
    }
}

/// Create a non-image asset.
pub fn test_document(id: &str) -> Asset {
    Asset {
        id: AssetId::new(id),
        kind: AssetKind::Document,
        resource: Resource {
            uri: format!("local://2024/01/{id}.pdf"),
            filename: format!("{id}.pdf"),
            media_type: "application/pdf".to_string(),
        },
        title: format!("Title of {id}"),
        caption: String::new(),
        copyright_notice: String::new(),
    }
}

/// Build a request context for `node` with [`TEST_BASE_URI`].
#[allow(clippy::expect_used)]
pub fn request_for(node: Arc<Node>) -> RequestContext {
    let base = Url::parse(TEST_BASE_URI).expect("valid test base URI");
    RequestContext::new(node, base)
}

/// Asset resolver returning predictable URIs.
///
/// Thumbnails report the configured maximum box as their size, so tests can
/// see which configuration the converter passed in.
#[derive(Debug, Default)]
pub struct StubAssetResolver {
    failing: bool,
}

impl StubAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver whose every call fails.
    pub fn failing() -> Self {
        Self { failing: true }
    }
}

impl AssetResolver for StubAssetResolver {
    fn thumbnail_uri_and_size(
        &self,
        asset: &Asset,
        config: &ThumbnailConfiguration,
        _request: &RequestContext,
    ) -> Result<Thumbnail> {
        if self.failing {
            return Err(anyhow!("thumbnail generation failed for {}", asset.id));
        }
        Ok(Thumbnail {
            src: format!("/thumbnails/{}/{}", config.style_name(), asset.resource.filename),
            width: config.maximum_width.unwrap_or_default(),
            height: config.maximum_height.unwrap_or_default(),
        })
    }

    fn public_resource_uri(&self, resource: &Resource) -> Result<String> {
        if self.failing {
            return Err(anyhow!("resource {} not published", resource.uri));
        }
        Ok(format!("/resources/{}", resource.filename))
    }
}

/// Scripted outcome for a reference token.
#[derive(Debug, Clone)]
pub enum LinkOutcome {
    Resolved(String),
    Unresolvable,
    Fault(String),
}

/// A call recorded by [`ScriptedLinkResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLink {
    pub token: String,
    /// Context node passed for node tokens; `None` for asset tokens.
    pub context_node: Option<NodeId>,
}

/// Link resolver with scripted outcomes that records every call.
///
/// Tokens without a script are unresolvable.
#[derive(Debug, Default)]
pub struct ScriptedLinkResolver {
    outcomes: HashMap<String, LinkOutcome>,
    calls: Mutex<Vec<RecordedLink>>,
}

impl ScriptedLinkResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolves(mut self, token: &str, uri: &str) -> Self {
        self.outcomes
            .insert(token.to_string(), LinkOutcome::Resolved(uri.to_string()));
        self
    }

    pub fn unresolvable(mut self, token: &str) -> Self {
        self.outcomes
            .insert(token.to_string(), LinkOutcome::Unresolvable);
        self
    }

    pub fn faults(mut self, token: &str, message: &str) -> Self {
        self.outcomes
            .insert(token.to_string(), LinkOutcome::Fault(message.to_string()));
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedLink> {
        self.calls.lock().clone()
    }

    fn answer(&self, token: &str, context_node: Option<NodeId>) -> Result<Option<String>> {
        self.calls.lock().push(RecordedLink {
            token: token.to_string(),
            context_node,
        });

        match self.outcomes.get(token) {
            Some(LinkOutcome::Resolved(uri)) => Ok(Some(uri.clone())),
            Some(LinkOutcome::Fault(message)) => Err(anyhow!("{message}")),
            Some(LinkOutcome::Unresolvable) | None => Ok(None),
        }
    }
}

impl LinkResolver for ScriptedLinkResolver {
    fn resolve_node_uri(
        &self,
        token: &str,
        context_node: &Node,
        _request: &RequestContext,
    ) -> Result<Option<String>> {
        self.answer(token, Some(context_node.id.clone()))
    }

    fn resolve_asset_uri(&self, token: &str, _request: &RequestContext) -> Result<Option<String>> {
        self.answer(token, None)
    }
}

/// Wire a converter around a store and stub collaborators.
pub fn converter(
    settings: ConverterSettings,
    store: InMemoryNodeStore,
    assets: StubAssetResolver,
    links: Arc<ScriptedLinkResolver>,
) -> PropertyConverter {
    PropertyConverter::new(settings, Arc::new(store), Arc::new(assets), links)
}

/// Assertion helpers for JSON output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON object has exactly the given keys, in order.
    pub fn keys_eq(value: &Value, expected: &[&str]) {
        let keys: Vec<&str> = value
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, expected, "key mismatch in {value}");
    }

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value lacks a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to NOT have key '{key}', got: {value}"
        );
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = test_node("page")
            .with_id("home")
            .with_path("/")
            .unpublished()
            .with_property("title", "Home")
            .with_reference("next", "about")
            .build();

        assert_eq!(node.id.as_str(), "home");
        assert_eq!(node.uri_path.as_deref(), Some("/"));
        assert!(!node.published);
        assert_eq!(node.property("title"), Some(&PropertyValue::from("Home")));
        assert_eq!(
            node.property("next"),
            Some(&PropertyValue::Reference(NodeId::new("about")))
        );
    }

    #[test]
    fn test_nodes_get_unique_ids() {
        assert_ne!(test_node("page").id(), test_node("page").id());
    }

    #[test]
    fn test_asset_fixtures() {
        assert!(test_image("img", 10, 20).is_image_like());
        assert!(!test_document("doc").is_image_like());
    }

    #[test]
    fn scripted_resolver_records_calls() {
        let resolver = ScriptedLinkResolver::new()
            .resolves("node://a", "/a")
            .faults("node://b", "boom");
        let home = Arc::new(test_node("page").with_id("home").build());
        let request = request_for(Arc::clone(&home));

        assert_eq!(
            resolver
                .resolve_node_uri("node://a", &home, &request)
                .unwrap()
                .as_deref(),
            Some("/a")
        );
        assert!(resolver.resolve_node_uri("node://b", &home, &request).is_err());
        assert!(
            resolver
                .resolve_asset_uri("asset://c", &request)
                .unwrap()
                .is_none()
        );

        let calls = resolver.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].context_node, Some(NodeId::new("home")));
        assert_eq!(calls[2].context_node, None);
    }

    #[test]
    fn stub_asset_resolver_reports_box() {
        let resolver = StubAssetResolver::new();
        let image = test_image("img", 4000, 3000);
        let request = request_for(Arc::new(test_node("page").build()));
        let thumb = resolver
            .thumbnail_uri_and_size(&image, &ThumbnailConfiguration::bounded(640, 480), &request)
            .unwrap();
        assert_eq!((thumb.width, thumb.height), (640, 480));
        assert_eq!(thumb.src, "/thumbnails/640x480/img.jpg");
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"name": "test", "value": 42});
        assert::has_key(&json, "name");
        assert::lacks_key(&json, "missing");
        assert::keys_eq(&json, &["name", "value"]);
    }
}
