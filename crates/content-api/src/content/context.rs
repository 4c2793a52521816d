//! Per-request context for property conversion.

use std::sync::Arc;

use url::Url;

use crate::models::Node;

/// Request context threaded through a conversion.
///
/// Only reference resolution reads it: node tokens are resolved relative to
/// `context_node` (the node the request is rendering), never relative to the
/// node whose properties are being converted.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Node being rendered by the current request.
    pub context_node: Arc<Node>,
    /// Base URI used when absolute URIs are requested.
    pub base_uri: Url,
    /// Emit absolute URIs instead of root-relative paths.
    pub absolute_uris: bool,
}

impl RequestContext {
    pub fn new(context_node: Arc<Node>, base_uri: Url) -> Self {
        Self {
            context_node,
            base_uri,
            absolute_uris: false,
        }
    }

    /// Set whether resolved URIs should be absolute.
    pub fn with_absolute_uris(mut self, absolute: bool) -> Self {
        self.absolute_uris = absolute;
        self
    }

    /// Turn a root-relative path into the URI form requested.
    pub fn uri_for_path(&self, path: &str) -> Result<String, url::ParseError> {
        if self.absolute_uris {
            Ok(self.base_uri.join(path)?.to_string())
        } else {
            Ok(path.to_string())
        }
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::NodeId;

    fn context() -> RequestContext {
        RequestContext::new(
            Arc::new(Node::new(NodeId::new("home"), "page")),
            Url::parse("https://example.com/").unwrap(),
        )
    }

    #[test]
    fn relative_by_default() {
        assert_eq!(context().uri_for_path("/about").unwrap(), "/about");
    }

    #[test]
    fn absolute_joins_base() {
        let ctx = context().with_absolute_uris(true);
        assert_eq!(
            ctx.uri_for_path("/about").unwrap(),
            "https://example.com/about"
        );
    }
}
