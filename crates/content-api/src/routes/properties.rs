//! Node properties endpoint.
//!
//! `GET /api/nodes/{id}/properties` returns the converted properties of a
//! node as JSON. `?absolute=true` switches resolved links to absolute URIs.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::content::{ConvertedProperties, RequestContext};
use crate::error::{AppError, AppResult};
use crate::models::NodeId;
use crate::state::AppState;

/// Query parameters for the properties endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PropertiesQuery {
    #[serde(default)]
    pub absolute: bool,
}

/// Converted properties of a single node.
async fn node_properties(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<PropertiesQuery>, QueryRejection>,
) -> AppResult<Json<ConvertedProperties>> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let id = NodeId::new(id);
    let node = state.store().node(&id)?.ok_or(AppError::NotFound)?;

    debug!(node = %id, absolute = query.absolute, "converting node properties");

    let request =
        RequestContext::new(node, state.base_uri().clone()).with_absolute_uris(query.absolute);
    let properties = state.converter().evaluate(&request)?;

    Ok(Json(properties))
}

/// Create the properties router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/nodes/{id}/properties", get(node_properties))
}
