//! Preview a built site.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use folio_static::SiteConfig;
use tower_http::services::ServeDir;

use crate::config::load_config;

/// Run the serve command.
///
/// Serves `dir`, or the configured output directory, under the configured URL
/// prefix so links in the built pages resolve.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let root = site_root(&config, dir);

    if !root.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            root.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let mount = mount_path(&config.build.url_prefix);
    let app = match &mount {
        Some(path) => Router::new().nest_service(path, ServeDir::new(&root)),
        None => Router::new().fallback_service(ServeDir::new(&root)),
    };

    let url = format!("http://{}{}/", addr, mount.as_deref().unwrap_or(""));
    tracing::info!("Serving {} at {}", root.display(), url);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    if open {
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

fn site_root(config: &SiteConfig, dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| config.build.output_dir.clone())
}

/// Route the output directory is nested under, or `None` for the root.
fn mount_path(url_prefix: &str) -> Option<String> {
    let trimmed = url_prefix.trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}
