//! Main server implementation
//!
//! Wires the balancer, artifact store and connection manager into an axum
//! router using dependency injection.

use std::future::Future;
use std::sync::Arc;

use axum::{Router, routing::get};
use shared::logging;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::core::GroupBalancer;
use crate::error::{ServerError, ServerResult};
use crate::relay::EventRelay;
use crate::state::ServerState;
use crate::traits::{ArtifactStore, WebSocketManager};
use crate::web::handlers::{health_check, root_handler, status_handler, websocket_handler};

/// Experiment server with injected services
pub struct ExperimentServer<S, W> {
    state: Arc<ServerState>,
    relay: EventRelay<S, W>,
}

impl<S, W> Clone for ExperimentServer<S, W> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            relay: self.relay.clone(),
        }
    }
}

impl<S, W> ExperimentServer<S, W>
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    pub fn new(state: Arc<ServerState>, balancer: GroupBalancer, artifact_store: S, websocket_manager: W) -> Self {
        let relay = EventRelay::new(balancer, Arc::new(artifact_store), Arc::new(websocket_manager), state.clone());
        Self { state, relay }
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    pub fn relay(&self) -> &EventRelay<S, W> {
        &self.relay
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            // WebSocket routes
            .route("/", get(root_handler::<S, W>))
            .route("/ws", get(websocket_handler::<S, W>))
            // API routes
            .route("/api/status", get(status_handler::<S, W>))
            .route("/health", get(health_check::<S, W>));

        // Experiment UI, when configured
        let router = match &self.state.static_dir {
            Some(static_dir) => router.fallback_service(ServeDir::new(static_dir)),
            None => router,
        };

        router
            .layer(ServiceBuilder::new().layer(CorsLayer::permissive()).into_inner())
            .with_state(self.clone())
    }

    /// Bind the configured listening address
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let address = self.state.bind_address;
        TcpListener::bind(address).await.map_err(|source| ServerError::BindFailed {
            address: address.to_string(),
            source,
        })
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        let router = self.build_router();

        logging::log_success(&format!("Listening on http://{local_addr} (WebSocket on / and /ws)"));

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))
    }

    /// Bind and serve
    pub async fn run<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        self.serve(listener, shutdown).await
    }
}
