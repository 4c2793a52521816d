//! Trovato Content API Library
//!
//! Converts content node properties into plain, API-serializable
//! structures. The `content-api` binary serves them over HTTP.

pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;
pub mod store;

pub use config::Config;
pub use content::{ConvertError, ConvertedProperties, ConvertedValue, PropertyConverter, RequestContext};
pub use settings::ConverterSettings;
pub use state::AppState;
