//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::content::PropertyConverter;
use crate::services::{AssetResolver, StorageAssetResolver, StoreLinkResolver};
use crate::settings::ConverterSettings;
use crate::store::{InMemoryNodeStore, NodeStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Read-only node store.
    store: Arc<dyn NodeStore>,

    /// Property converter (stateless across requests).
    converter: PropertyConverter,

    /// Base URI for absolute links.
    base_uri: Url,

    /// Node and asset counts of the loaded graph, for health reporting.
    node_count: usize,
    asset_count: usize,
}

impl AppState {
    /// Load the content graph and settings and wire the converter.
    pub fn new(config: &Config) -> Result<Self> {
        let store = InMemoryNodeStore::load(&config.content_graph_path).with_context(|| {
            format!(
                "failed to load content graph from {}",
                config.content_graph_path.display()
            )
        })?;

        let settings = match &config.settings_path {
            Some(path) => ConverterSettings::load(path)?,
            None => ConverterSettings::default(),
        };

        info!(
            nodes = store.node_count(),
            assets = store.asset_count(),
            image_maximum_width = settings.image_maximum_width,
            image_maximum_height = settings.image_maximum_height,
            reference_depth = ?settings.reference_depth(),
            "Content graph and settings loaded"
        );

        let base_uri = Url::parse(&config.site_url).context("SITE_URL must be a valid URL")?;

        Ok(Self::from_store(
            store,
            settings,
            StorageAssetResolver::new(&config.files_url),
            base_uri,
        ))
    }

    /// Wire state around an already-built store.
    pub fn from_store(
        store: InMemoryNodeStore,
        settings: ConverterSettings,
        assets: StorageAssetResolver,
        base_uri: Url,
    ) -> Self {
        let node_count = store.node_count();
        let asset_count = store.asset_count();

        let store: Arc<dyn NodeStore> = Arc::new(store);
        let assets: Arc<dyn AssetResolver> = Arc::new(assets);
        let links = Arc::new(StoreLinkResolver::new(
            Arc::clone(&store),
            Arc::clone(&assets),
        ));
        let converter = PropertyConverter::new(settings, Arc::clone(&store), assets, links);

        Self {
            inner: Arc::new(AppStateInner {
                store,
                converter,
                base_uri,
                node_count,
                asset_count,
            }),
        }
    }

    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.inner.store
    }

    pub fn converter(&self) -> &PropertyConverter {
        &self.inner.converter
    }

    pub fn base_uri(&self) -> &Url {
        &self.inner.base_uri
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count
    }

    pub fn asset_count(&self) -> usize {
        self.inner.asset_count
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("converter", &self.inner.converter)
            .field("base_uri", &self.inner.base_uri)
            .finish_non_exhaustive()
    }
}
