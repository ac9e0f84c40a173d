//! HTTP server
//!
//! Axum-based server for browsing, searching and downloading the indexed tree.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::HttpConfig;

use super::handlers::AppState;
use super::routes::create_router;

/// HTTP server
pub struct HttpServer {
    config: HttpConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: HttpConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.listen_addr();
        TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {}", addr))
    }

    /// Serve on `listener` until `shutdown` fires.
    ///
    /// After the signal no new connections are accepted; in-flight requests
    /// keep running until they finish or the caller gives up on this future.
    pub async fn run(
        &self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        let app = create_router(self.state.clone()).layer(TraceLayer::new_for_http());

        if let Ok(addr) = listener.local_addr() {
            info!("HTTP server listening on http://{}", addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
