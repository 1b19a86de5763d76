//! Development server implementation.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use folio_static::{Generator, SiteConfig};
use tower_http::services::ServeDir;

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// WebSocket endpoint browsers connect to.
pub const RELOAD_PATH: &str = "/__reload";

/// Client script injected by themes when live reload is on.
pub const RELOAD_SCRIPT_PATH: &str = "/__reload.js";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site to build and serve
    pub site: SiteConfig,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Quiet period between a change and the rebuild it triggers
    pub debounce: Duration,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            debounce: Duration::from_millis(100),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    hub: ReloadHub,
}

/// Development server.
///
/// Builds the site, serves the output directory, and rebuilds on every
/// change under the source directory.
pub struct DevServer {
    config: DevServerConfig,
    generator: Arc<Generator>,
}

impl DevServer {
    pub fn new(mut config: DevServerConfig) -> Self {
        config.site.build.live_reload = true;
        Self {
            config,
            generator: Arc::new(Generator::new()),
        }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let host_port = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = host_port
            .parse()
            .map_err(|_| ServerError::InvalidAddress(host_port.clone()))?;

        let hub = ReloadHub::new();
        let site = self.config.site.clone();

        rebuild(&self.generator, &site, &hub).await;

        let watch_paths = vec![site.build.source_dir.clone()];
        let (watcher, mut rx) = FileWatcher::new(&watch_paths, self.config.debounce)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let generator = Arc::clone(&self.generator);
        let watch_hub = hub.clone();
        let watch_site = site.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&generator, &watch_site, &watch_hub, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let state = Arc::new(ServerState { hub });
        let app = router(state, &site.build.output_dir);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

fn router(state: Arc<ServerState>, output_dir: &Path) -> Router {
    Router::new()
        .route(RELOAD_PATH, get(ws_handler))
        .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
        .fallback_service(ServeDir::new(output_dir))
        .with_state(state)
}

/// Handle file watch events.
async fn handle_watch_event(
    generator: &Generator,
    site: &SiteConfig,
    hub: &ReloadHub,
    event: WatchEvent,
) {
    match &event {
        WatchEvent::Changed(path) => tracing::info!("Changed: {}", path.display()),
        WatchEvent::Removed(path) => tracing::info!("Removed: {}", path.display()),
    }

    rebuild(generator, site, hub).await;
}

/// Run a full build and tell browsers about the outcome.
async fn rebuild(generator: &Generator, site: &SiteConfig, hub: &ReloadHub) {
    match generator.generate(site.clone()).await {
        Ok(result) => {
            generator.wait_idle().await;
            tracing::info!(
                "Built {} pages in {}ms",
                result.pages,
                result.duration_ms
            );
            hub.send(ReloadMessage::Reload);
        }
        Err(e) => {
            tracing::error!("Build failed: {}", e);
            hub.send(ReloadMessage::BuildFailed {
                message: e.to_string(),
            });
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward reload messages to one browser.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    if send_json(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_json(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

/// Handler for the reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    let script = reload_client_script(RELOAD_PATH);
    ([("content-type", "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use folio_static::BuildConfig;

    fn site(root: &Path) -> SiteConfig {
        SiteConfig {
            build: BuildConfig {
                source_dir: root.join("content"),
                output_dir: root.join("dist"),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());

        assert_eq!(server.config.port, 7777);
        assert!(server.config.site.build.live_reload);
    }

    #[tokio::test]
    async fn rebuild_broadcasts_reload() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("content")).unwrap();
        fs::write(temp.path().join("content/index.md"), "---\ntitle: Home\n---\n# Hi").unwrap();
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        rebuild(&Generator::new(), &site(temp.path()), &hub).await;

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
        assert!(temp.path().join("dist/index.html").exists());
    }

    #[tokio::test]
    async fn failed_rebuild_reports_error() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("content")).unwrap();
        fs::write(temp.path().join("content/index.md"), "---\ntitle: Home\n").unwrap();
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        rebuild(&Generator::new(), &site(temp.path()), &hub).await;

        match rx.try_recv().unwrap() {
            ReloadMessage::BuildFailed { message } => assert!(message.contains("index.md")),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
