//! Property conversion error types.
//!
//! An unresolvable reference is not an error (it converts to null). These
//! variants cover hard faults only; a failed collaborator call aborts the
//! whole conversion.

use thiserror::Error;

use crate::models::{AssetId, NodeId};

/// Errors that abort a property conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The asset resolver failed for an embedded asset.
    #[error("asset '{asset}': resolution failed")]
    Asset {
        asset: AssetId,
        #[source]
        source: anyhow::Error,
    },

    /// The link resolver failed for a reference token.
    #[error("reference '{token}': resolution failed")]
    Link {
        token: String,
        #[source]
        source: anyhow::Error,
    },

    /// The node store failed while loading a referenced node.
    #[error("node '{node}': store lookup failed")]
    Store {
        node: NodeId,
        #[source]
        source: anyhow::Error,
    },
}
