//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use std::path::PathBuf;

use async_trait::async_trait;
use shared::{ConnectionId, ParticipantId, ParticipantRecord, ServerEvent};
use tokio::sync::mpsc;

use crate::error::ServerResult;

/// WebSocket connection management service trait
#[mockall::automock]
#[async_trait]
pub trait WebSocketManager: Send + Sync {
    /// Register a connection's outbound channel
    async fn add_client(&self, connection_id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> ServerResult<()>;

    /// Forget a connection
    async fn remove_client(&self, connection_id: ConnectionId) -> ServerResult<()>;

    /// Send a message to one connection only
    async fn send_to_client(&self, connection_id: ConnectionId, message: ServerEvent) -> ServerResult<()>;

    /// Get count of active connections
    async fn client_count(&self) -> usize;

    /// Get list of active connection IDs
    async fn active_clients(&self) -> Vec<ConnectionId>;
}

/// Durable storage for final participant records
#[mockall::automock]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `record` as the artifact for `participant`, replacing any earlier one.
    /// Returns the path written.
    async fn save(&self, participant: &ParticipantId, record: &ParticipantRecord) -> ServerResult<PathBuf>;

    /// Where the artifact for `participant` lives
    fn artifact_path(&self, participant: &ParticipantId) -> PathBuf;
}
