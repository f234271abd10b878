//! WebSocket connection management service
//!
//! Tracks the outbound channel of every live browser connection so replies
//! can be routed to the one connection that asked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{ConnectionId, ServerEvent, conn_debug, conn_info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};

use crate::error::{ServerError, ServerResult};
use crate::traits::WebSocketManager;

#[derive(Debug)]
struct ClientConnection {
    sender: mpsc::Sender<ServerEvent>,
    connected_at: DateTime<Utc>,
}

/// Real WebSocket manager implementation
#[derive(Clone, Default)]
pub struct RealWebSocketManager {
    clients: Arc<RwLock<HashMap<ConnectionId, ClientConnection>>>,
}

impl RealWebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    async fn drop_client(&self, connection_id: ConnectionId) {
        let mut clients = self.clients.write().await;
        if clients.remove(&connection_id).is_some() {
            conn_info!(connection_id, "🗑️ Removed disconnected client during send");
        }
    }
}

#[async_trait]
impl WebSocketManager for RealWebSocketManager {
    async fn add_client(&self, connection_id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> ServerResult<()> {
        let connection = ClientConnection {
            sender,
            connected_at: Utc::now(),
        };

        let total = {
            let mut clients = self.clients.write().await;
            clients.insert(connection_id, connection);
            clients.len()
        };

        conn_info!(connection_id, "👋 Added WebSocket client ({} active)", total);
        Ok(())
    }

    async fn remove_client(&self, connection_id: ConnectionId) -> ServerResult<()> {
        let mut clients = self.clients.write().await;
        if let Some(connection) = clients.remove(&connection_id) {
            let seconds = (Utc::now() - connection.connected_at).num_seconds();
            conn_info!(connection_id, "👋 Removed WebSocket client after {}s ({} active)", seconds, clients.len());
        }
        Ok(())
    }

    async fn send_to_client(&self, connection_id: ConnectionId, message: ServerEvent) -> ServerResult<()> {
        // Clone the sender so the lock is not held while sending
        let sender = {
            let clients = self.clients.read().await;
            clients.get(&connection_id).map(|connection| connection.sender.clone())
        };

        let Some(sender) = sender else {
            return Err(ServerError::ConnectionNotFound(connection_id.to_string()));
        };

        match sender.try_send(message) {
            Ok(()) => {
                conn_debug!(connection_id, "📤 Queued reply");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(ServerError::websocket("Client channel full")),
            Err(TrySendError::Closed(_)) => {
                self.drop_client(connection_id).await;
                Err(ServerError::websocket("Client disconnected"))
            }
        }
    }

    async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }

    async fn active_clients(&self) -> Vec<ConnectionId> {
        self.clients.read().await.keys().copied().collect()
    }
}
