//! HTTP route handlers.

pub mod health;
pub mod properties;

use axum::Router;

use crate::state::AppState;

/// Build the API router (without middleware layers).
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(properties::router())
}
