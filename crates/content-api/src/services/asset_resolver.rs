//! Asset URI resolution.
//!
//! Image-like assets are served as derivatives sized by a thumbnail
//! configuration; other assets are served from their public resource URL.

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::content::RequestContext;
use crate::models::{Asset, Resource, Thumbnail, ThumbnailConfiguration};

/// Storage scheme handled by [`StorageAssetResolver`].
const LOCAL_SCHEME: &str = "local://";

/// Computes display URIs for assets.
pub trait AssetResolver: Send + Sync {
    /// Thumbnail URI and output size for an image-like asset.
    fn thumbnail_uri_and_size(
        &self,
        asset: &Asset,
        config: &ThumbnailConfiguration,
        request: &RequestContext,
    ) -> Result<Thumbnail>;

    /// Direct public URI of a stored resource.
    fn public_resource_uri(&self, resource: &Resource) -> Result<String>;
}

/// Resolver for assets kept in local file storage.
///
/// Originals are served from `{files_url}/{path}`; derivatives from
/// `{files_url}/styles/{style}/{path}`.
#[derive(Debug, Clone)]
pub struct StorageAssetResolver {
    files_url: String,
}

impl StorageAssetResolver {
    /// Create a resolver serving files below `files_url` (e.g. `/files`).
    pub fn new(files_url: impl Into<String>) -> Self {
        Self {
            files_url: files_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Derivative path for a style, mirroring the original's storage path.
    pub fn derivative_path(&self, style_name: &str, resource: &Resource) -> Result<String> {
        let path = storage_path(&resource.uri)?;
        Ok(format!("{}/styles/{style_name}/{path}", self.files_url))
    }
}

/// Extract the relative path of a `local://` storage URI.
///
/// Rejects paths containing `..` components.
fn storage_path(uri: &str) -> Result<&str> {
    let path = uri
        .strip_prefix(LOCAL_SCHEME)
        .with_context(|| format!("unsupported storage URI '{uri}', must start with {LOCAL_SCHEME}"))?;

    for component in std::path::Path::new(path).components() {
        if matches!(component, std::path::Component::ParentDir) {
            bail!("directory traversal not allowed in storage URI");
        }
    }
    Ok(path.trim_start_matches('/'))
}

impl AssetResolver for StorageAssetResolver {
    fn thumbnail_uri_and_size(
        &self,
        asset: &Asset,
        config: &ThumbnailConfiguration,
        request: &RequestContext,
    ) -> Result<Thumbnail> {
        let (original_width, original_height) = asset
            .image_dimensions()
            .with_context(|| format!("asset '{}' is not an image", asset.id))?;

        let (width, height) = config.fit(original_width, original_height);
        let path = self.derivative_path(&config.style_name(), &asset.resource)?;
        let src = request
            .uri_for_path(&path)
            .with_context(|| format!("failed to build thumbnail URI from '{path}'"))?;

        debug!(asset = %asset.id, %src, width, height, "thumbnail resolved");

        Ok(Thumbnail { src, width, height })
    }

    fn public_resource_uri(&self, resource: &Resource) -> Result<String> {
        let path = storage_path(&resource.uri)?;
        Ok(format!("{}/{path}", self.files_url))
    }
}
