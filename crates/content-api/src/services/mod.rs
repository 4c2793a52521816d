//! Collaborators of the property converter.
//!
//! - AssetResolver: thumbnail and public URIs for media assets
//! - LinkResolver: URIs for `node://` and `asset://` reference tokens

mod asset_resolver;
mod link_resolver;

pub use asset_resolver::{AssetResolver, StorageAssetResolver};
pub use link_resolver::{LinkResolver, StoreLinkResolver};
