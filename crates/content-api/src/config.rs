//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Path to the JSON content graph served by the API.
    pub content_graph_path: PathBuf,

    /// Path to the converter settings YAML file. Defaults apply when unset.
    pub settings_path: Option<PathBuf>,

    /// Base URL for serving stored files (default: /files).
    pub files_url: String,

    /// Public site URL used for absolute URIs.
    pub site_url: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let content_graph_path = env::var("CONTENT_GRAPH_PATH")
            .map(PathBuf::from)
            .context("CONTENT_GRAPH_PATH environment variable is required")?;

        let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);

        let files_url = env::var("FILES_URL").unwrap_or_else(|_| "/files".to_string());

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            content_graph_path,
            settings_path,
            files_url,
            site_url,
            cors_allowed_origins,
        })
    }
}
