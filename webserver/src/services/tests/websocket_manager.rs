//! Tests for the WebSocketManager service

use super::fixtures::*;
use crate::error::ServerError;
use crate::services::RealWebSocketManager;
use crate::traits::WebSocketManager;
use shared::{ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn test_add_and_remove_clients() {
    let manager = RealWebSocketManager::new();
    let first = ConnectionId::new();
    let second = ConnectionId::new();

    let (tx1, _rx1) = mpsc::channel(8);
    let (tx2, _rx2) = mpsc::channel(8);
    manager.add_client(first, tx1).await.unwrap();
    manager.add_client(second, tx2).await.unwrap();
    assert_eq!(manager.client_count().await, 2);

    manager.remove_client(first).await.unwrap();
    assert_eq!(manager.active_clients().await, vec![second]);

    // Removing twice is harmless
    manager.remove_client(first).await.unwrap();
    assert_eq!(manager.client_count().await, 1);
}

#[tokio::test]
async fn test_send_reaches_only_target_client() {
    let manager = RealWebSocketManager::new();
    let requester = ConnectionId::new();
    let bystander = ConnectionId::new();

    let (tx1, mut rx1) = mpsc::channel(8);
    let (tx2, mut rx2) = mpsc::channel(8);
    manager.add_client(requester, tx1).await.unwrap();
    manager.add_client(bystander, tx2).await.unwrap();

    manager.send_to_client(requester, group_reply("Control")).await.unwrap();

    let received = timeout(Duration::from_millis(100), rx1.recv())
        .await
        .expect("Requester should receive the reply")
        .expect("Channel should stay open");
    assert_eq!(received, group_reply("Control"));

    let nothing = timeout(Duration::from_millis(50), rx2.recv()).await;
    assert!(nothing.is_err(), "Bystander should not receive anything");
}

#[tokio::test]
async fn test_send_to_unknown_client_fails() {
    let manager = RealWebSocketManager::new();
    let result = manager.send_to_client(ConnectionId::new(), group_reply("Control")).await;
    assert!(matches!(result, Err(ServerError::ConnectionNotFound(_))));
}

#[tokio::test]
async fn test_send_to_closed_client_drops_it() {
    let manager = RealWebSocketManager::new();
    let connection_id = ConnectionId::new();

    let (tx, rx) = mpsc::channel(8);
    manager.add_client(connection_id, tx).await.unwrap();
    drop(rx);

    let result = manager.send_to_client(connection_id, group_reply("Control")).await;
    assert!(matches!(result, Err(ServerError::WebSocket(_))));
    assert_eq!(manager.client_count().await, 0);
}

#[tokio::test]
async fn test_full_channel_is_reported() {
    let manager = RealWebSocketManager::new();
    let connection_id = ConnectionId::new();

    let (tx, _rx) = mpsc::channel(1);
    manager.add_client(connection_id, tx).await.unwrap();

    manager.send_to_client(connection_id, group_reply("Control")).await.unwrap();
    let result = manager
        .send_to_client(
            connection_id,
            ServerEvent::SubmissionRejected {
                reason: "missing".to_string(),
            },
        )
        .await;

    assert!(matches!(result, Err(ServerError::WebSocket(_))));
    // Still registered; the reader is merely slow
    assert_eq!(manager.client_count().await, 1);
}
