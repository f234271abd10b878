//! HTTP API handlers
//!
//! Health and status endpoints plus the root route, which doubles as the
//! WebSocket endpoint because deployed clients connect to the bare host.

use axum::{
    Json,
    extract::{State, WebSocketUpgrade},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use crate::server_impl::ExperimentServer;
use crate::state::SubmissionStats;
use crate::traits::{ArtifactStore, WebSocketManager};
use crate::web::handlers::websocket;

/// Counter for one experimental group
#[derive(Debug, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: u64,
}

/// Body of `GET /api/status`
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub active_connections: usize,
    pub groups: Vec<GroupCount>,
    pub total_assigned: u64,
    pub submissions: SubmissionStats,
    pub telemetry_events: u64,
    pub malformed_messages: u64,
}

/// `GET /`: upgrade WebSocket requests, otherwise point at the UI
pub async fn root_handler<S, W>(ws: Option<WebSocketUpgrade>, State(server): State<ExperimentServer<S, W>>) -> Response
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    if let Some(ws) = ws {
        return websocket::upgrade(ws, &server);
    }

    if server.state().static_dir.is_some() {
        return Redirect::temporary("/index.html").into_response();
    }

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "websocket": "/ws",
    }))
    .into_response()
}

/// Health check endpoint
pub async fn health_check<S, W>(State(server): State<ExperimentServer<S, W>>) -> Json<Value>
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "uptime_seconds": server.state().get_uptime_seconds(),
    }))
}

/// Group counters and submission statistics
pub async fn status_handler<S, W>(State(server): State<ExperimentServer<S, W>>) -> Json<StatusReport>
where
    S: ArtifactStore + 'static,
    W: WebSocketManager + 'static,
{
    let relay = server.relay();
    let counts = relay.group_counts().await;
    let total_assigned = counts.iter().map(|(_, count)| count).sum();

    let state = server.state();
    Json(StatusReport {
        status: "running",
        uptime_seconds: state.get_uptime_seconds(),
        active_connections: relay.websocket_manager().client_count().await,
        groups: counts
            .into_iter()
            .map(|(label, count)| GroupCount {
                group: label.to_string(),
                count,
            })
            .collect(),
        total_assigned,
        submissions: state.submission_stats(),
        telemetry_events: state.telemetry_count(),
        malformed_messages: state.malformed_count(),
    })
}
