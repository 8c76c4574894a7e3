use std::future::Future;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::AppState;

/// Bulletin board HTTP server.
pub struct BbsServer {
    config: ServerConfig,
    state: AppState,
}

impl BbsServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), self.config.max_body_size)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        tracing::info!("BBS server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("BBS server stopped");
        Ok(())
    }
}
