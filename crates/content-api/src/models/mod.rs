//! Content models.
//!
//! Nodes, their typed property values, and the media assets they embed.

mod asset;
mod node;

pub use asset::{Asset, AssetId, AssetKind, Resource, Thumbnail, ThumbnailConfiguration};
pub use node::{Node, NodeId, Properties, PropertyValue};
