//! Development server for inkpost.
//!
//! Serves the blog straight from source: every page request creates a fresh
//! rendering environment, resolves the configured template, renders the page
//! and splices it into the shell read from disk. Template and shell edits
//! show up on the next request without a restart. Posts are loaded once at
//! startup.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use inkpost_config::SiteConfig;
//! use inkpost_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 5173,
//!         site: SiteConfig::default(),
//!         shell_path: PathBuf::from("index.html"),
//!         static_dir: PathBuf::from("."),
//!         version: "0.1.0".to_owned(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router
//!                        │
//!                        ├─► render_page middleware (/, /index.html, /post/*)
//!                        │       │
//!                        │       └─► with_environment ──► template ──► shell splice
//!                        │
//!                        └─► ServeDir (everything else)
//! ```
//!
//! [`run_preview`] serves an already generated site instead, mapping page
//! URLs onto the files below the output directory.

mod app;
mod error;
mod handlers;
mod middleware;
mod preview;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use inkpost_config::SiteConfig;
use inkpost_content::ContentStore;
use inkpost_render::GeneratorMetaTransform;

pub use error::ServerError;
pub use state::DevRenderer;

/// Default port of the preview server.
pub const PREVIEW_PORT: u16 = 4173;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content directory and template references.
    pub site: SiteConfig,
    /// Page shell, read on every request.
    pub shell_path: PathBuf,
    /// Directory for files the page renderer does not own.
    pub static_dir: PathBuf,
    /// Application version, written into the generator meta tag.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5173,
            site: SiteConfig::default(),
            shell_path: PathBuf::from("index.html"),
            static_dir: PathBuf::from("."),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let documents = ContentStore::new(&config.site.content_dir).snapshot();
    tracing::info!(
        count = documents.len(),
        content_dir = %config.site.content_dir.display(),
        "Loaded posts"
    );

    let renderer = DevRenderer::new(documents, config.site.clone(), config.shell_path.clone())
        .with_transform(GeneratorMetaTransform::new(&format!(
            "inkpost {}",
            config.version
        )));

    let app = app::create_router(Arc::new(renderer), &config.static_dir);
    serve(app, &config.host, config.port).await
}

/// Preview server configuration.
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Generated site to serve.
    pub out_dir: PathBuf,
}

/// Serve a generated site until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_preview(config: PreviewConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.out_dir.is_dir() {
        tracing::warn!(out_dir = %config.out_dir.display(), "Output directory does not exist");
    }
    let app = preview::create_preview_router(&config.out_dir);
    serve(app, &config.host, config.port).await
}

async fn serve(app: axum::Router, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from_str(&format!("{host}:{port}"))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C, stopping server");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from inkpost config.
///
/// Files the renderer declines are served from the directory holding the
/// shell, so assets referenced by the shell resolve the same way they do in
/// the generated site.
///
/// # Arguments
///
/// * `config` - inkpost configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &inkpost_config::Config, version: String) -> ServerConfig {
    let static_dir = config
        .shell_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        site: config.site.clone(),
        shell_path: config.shell_path.clone(),
        static_dir,
        version,
    }
}

/// Create preview configuration from inkpost config.
///
/// The configured server port belongs to the development server, so the
/// preview listens on `port` or [`PREVIEW_PORT`].
#[must_use]
pub fn preview_config_from_config(config: &inkpost_config::Config, port: Option<u16>) -> PreviewConfig {
    PreviewConfig {
        host: config.server.host.clone(),
        port: port.unwrap_or(PREVIEW_PORT),
        out_dir: config.site.out_dir.clone(),
    }
}

#[cfg(test)]
mod tests {
    use inkpost_config::{CliSettings, Config};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_server_config_from_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("inkpost.toml");
        std::fs::write(&config_path, "[server]\nport = 9000\n").unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        let server = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9000);
        assert_eq!(server.shell_path, dir.path().join("index.html"));
        assert_eq!(server.static_dir, dir.path());
        assert_eq!(server.site.content_dir, dir.path().join("src/content"));
        assert_eq!(server.version, "1.2.3");
    }

    #[test]
    fn test_server_config_respects_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("inkpost.toml");
        std::fs::write(&config_path, "").unwrap();
        let cli = CliSettings {
            port: Some(4000),
            host: Some("0.0.0.0".to_owned()),
            ..Default::default()
        };

        let config = Config::load(Some(&config_path), Some(&cli)).unwrap();
        let server = server_config_from_config(&config, String::new());

        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 4000);
    }

    #[test]
    fn test_preview_config_from_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("inkpost.toml");
        std::fs::write(&config_path, "[server]\nport = 9000\n\n[build]\nout_dir = \"public\"\n").unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        let preview = preview_config_from_config(&config, None);
        assert_eq!(preview.host, "127.0.0.1");
        assert_eq!(preview.port, PREVIEW_PORT);
        assert_eq!(preview.out_dir, dir.path().join("public"));

        let preview = preview_config_from_config(&config, Some(8080));
        assert_eq!(preview.port, 8080);
    }
}
