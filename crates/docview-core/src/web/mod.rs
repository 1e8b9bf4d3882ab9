//! Embedded web API for Docview.
//!
//! ## Starting the server
//!
//! ```bash
//! docview serve                          # Default port 8080, localhost only
//! docview serve --port 9000 --public     # Listen on all interfaces
//! docview serve --uploads ./uploads      # Also serve files under the upload prefix
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | /api/health | Liveness and version |
//! | POST | /api/preview | Classify, resolve, convert and render a document |
//! | GET | /api/preview/events | Preview phases (SSE) |
//! | GET | {upload_prefix}/* | Uploaded files (when an uploads directory is set) |

pub mod error;
pub mod handlers;
pub mod sse;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::config::WebConfig;
use crate::convert::DocumentConverter;
use crate::error::Result;
use crate::resolve::UrlResolver;

pub use state::{AppState, SharedState};

/// Maximum accepted request body (preview requests are tiny).
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind to localhost only
    pub localhost_only: bool,
    /// Directory served under the upload prefix
    pub uploads_dir: Option<PathBuf>,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self::from(&WebConfig::default())
    }
}

impl From<&WebConfig> for WebServerConfig {
    fn from(config: &WebConfig) -> Self {
        Self {
            port: config.port,
            localhost_only: config.localhost_only,
            uploads_dir: config.uploads_dir.clone(),
        }
    }
}

impl WebServerConfig {
    /// Get the bind address for the server.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        if self.localhost_only {
            SocketAddr::from(([127, 0, 0, 1], self.port))
        } else {
            SocketAddr::from(([0, 0, 0, 0], self.port))
        }
    }
}

/// The web server instance.
pub struct WebServer {
    config: WebServerConfig,
    state: SharedState,
}

impl std::fmt::Debug for WebServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WebServer {
    /// Create a new web server.
    #[must_use]
    pub fn new(
        config: WebServerConfig,
        converter: Arc<dyn DocumentConverter>,
        resolver: UrlResolver,
    ) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(converter, resolver)),
        }
    }

    /// Get the server configuration.
    #[must_use]
    pub const fn config(&self) -> &WebServerConfig {
        &self.config
    }

    /// Build the router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state), self.config.uploads_dir.clone())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn start<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Starting web server on {}", listener.local_addr()?);
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Addresses the server is reachable at.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        let mut addrs = vec![format!("http://localhost:{}", self.config.port)];
        if !self.config.localhost_only {
            addrs.push(format!("http://0.0.0.0:{}", self.config.port));
        }
        addrs
    }
}

/// Build the API router.
pub fn build_router(state: SharedState, uploads_dir: Option<PathBuf>) -> Router {
    let upload_prefix = state.resolver.upload_prefix().to_string();

    let mut router = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/preview", post(handlers::create_preview))
        .route("/api/preview/events", get(sse::preview_events));

    if let Some(dir) = uploads_dir {
        if upload_prefix.starts_with('/') {
            tracing::debug!(prefix = %upload_prefix, dir = %dir.display(), "serving uploads");
            router = router.nest_service(&upload_prefix, ServeDir::new(dir));
        } else if upload_prefix.is_empty() {
            router = router.fallback_service(ServeDir::new(dir));
        } else {
            tracing::warn!(
                prefix = %upload_prefix,
                "upload prefix is not root-relative, uploads directory not served"
            );
        }
    }

    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
