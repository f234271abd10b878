//! Test helper utilities for experiment server integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use experiment_server::core::GroupBalancer;
use experiment_server::{ExperimentServer, RealArtifactStore, RealWebSocketManager, ServerState};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use shared::{GroupSet, ServerEvent};
use tempfile::TempDir;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::time::{Duration, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

pub type TestSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub type TestExperimentServer = ExperimentServer<RealArtifactStore, RealWebSocketManager>;

/// A server running on an ephemeral port with its own data directory
pub struct TestServer {
    pub addr: SocketAddr,
    pub server: TestExperimentServer,
    data_dir: TempDir,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(GroupSet::default(), None).await
    }

    pub async fn start_with(groups: GroupSet, static_dir: Option<PathBuf>) -> Self {
        let data_dir = TempDir::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(ServerState::new(addr, data_dir.path().to_path_buf(), static_dir));
        let server = ExperimentServer::new(
            state,
            GroupBalancer::new(groups),
            RealArtifactStore::new(data_dir.path()),
            RealWebSocketManager::new(),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(server.clone().serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            server,
            data_dir,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    pub async fn connect(&self) -> TestSocket {
        self.connect_path("/ws").await
    }

    pub async fn connect_path(&self, path: &str) -> TestSocket {
        let (socket, _) = connect_async(format!("ws://{}{}", self.addr, path)).await.unwrap();
        socket
    }

    /// Issue a GET through the router and decode the JSON body
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .server
            .build_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn stored_files(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(self.data_dir()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        names
    }

    pub async fn read_artifact(&self, file_name: &str) -> Value {
        let content = tokio::fs::read_to_string(self.data_dir().join(file_name)).await.unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

pub async fn send_text(socket: &mut TestSocket, text: impl Into<String>) {
    socket.send(Message::Text(text.into())).await.unwrap();
}

/// Next server event, or `None` if nothing arrives within `timeout_ms`
pub async fn recv_event(socket: &mut TestSocket, timeout_ms: u64) -> Option<ServerEvent> {
    loop {
        let next = timeout(Duration::from_millis(timeout_ms), socket.next()).await.ok()??;
        match next.ok()? {
            Message::Text(text) => return Some(serde_json::from_str(&text).unwrap()),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}

/// Helper to wait for async conditions with timeout
pub async fn wait_for_condition<F, Fut>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if condition().await {
            return true;
        }

        if start.elapsed() > timeout {
            return false;
        }

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
