//! WebSocket connection handler
//!
//! Handles WebSocket connections from the experiment UI

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use shared::{ConnectionId, ServerEvent, conn_debug, conn_error, conn_info, conn_warn};
use tokio::sync::mpsc;

use crate::relay::EventRelay;
use crate::server_impl::ExperimentServer;
use crate::traits::{ArtifactStore, WebSocketManager};

/// Replies queued per connection before sends start failing
const OUTBOUND_BUFFER: usize = 32;

/// WebSocket upgrade handler
pub async fn websocket_handler<S, W>(ws: WebSocketUpgrade, State(server): State<ExperimentServer<S, W>>) -> Response
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    upgrade(ws, &server)
}

pub(crate) fn upgrade<S, W>(ws: WebSocketUpgrade, server: &ExperimentServer<S, W>) -> Response
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    let relay = server.relay().clone();
    ws.on_upgrade(move |socket| handle_websocket(socket, relay))
}

/// Handle individual WebSocket connection
async fn handle_websocket<S, W>(socket: WebSocket, relay: EventRelay<S, W>)
where
    S: ArtifactStore,
    W: WebSocketManager,
{
    let connection_id = ConnectionId::new();
    conn_info!(connection_id, "🔗 New WebSocket connection");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(OUTBOUND_BUFFER);

    if let Err(e) = relay.websocket_manager().add_client(connection_id, tx).await {
        conn_error!(connection_id, "Failed to register WebSocket client: {}", e);
        return;
    }

    let outgoing_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    conn_error!(connection_id, "Failed to serialize reply: {}", e);
                    continue;
                }
            };

            if let Err(e) = sender.send(Message::Text(json)).await {
                conn_warn!(connection_id, "Failed to send reply: {}", e);
                break;
            }
        }

        conn_debug!(connection_id, "Outgoing message task ended");
    });

    // Frames from one connection are handled strictly in order
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                conn_warn!(connection_id, "WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                conn_debug!(connection_id, "📨 Received: {}", text);
                relay.handle_text(connection_id, &text).await;
            }
            Message::Binary(_) => {
                conn_warn!(connection_id, "Received binary message - not supported");
            }
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                conn_info!(connection_id, "Client requested close");
                break;
            }
        }
    }

    if let Err(e) = relay.websocket_manager().remove_client(connection_id).await {
        conn_error!(connection_id, "Failed to remove client: {}", e);
    }
    outgoing_task.abort();

    conn_info!(connection_id, "👋 WebSocket connection closed");
}
