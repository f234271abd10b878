//! Event relay and recorder
//!
//! Turns decoded browser frames into balancer calls, private replies and
//! stored artifacts. One relay is shared by every connection; each
//! connection's task calls it sequentially for its own frames.

use std::path::PathBuf;
use std::sync::Arc;

use shared::{
    ClientEvent, ConnectionId, GroupLabel, ParticipantId, ParticipantRecord, ServerEvent, conn_debug, conn_error,
    conn_info, conn_warn,
};
use tokio::sync::Mutex;

use crate::core::GroupBalancer;
use crate::state::ServerState;
use crate::traits::{ArtifactStore, WebSocketManager};

/// Reason sent back when a final submission carries no usable identifier
pub const MISSING_PARTICIPANT_ID: &str = "participantId is missing or empty";

/// What handling one inbound frame amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    GroupAssigned(GroupLabel),
    Saved { participant: ParticipantId, path: PathBuf },
    Rejected,
    WriteFailed { participant: ParticipantId },
    Telemetry(String),
    Malformed,
}

pub struct EventRelay<S, W> {
    balancer: Arc<Mutex<GroupBalancer>>,
    store: Arc<S>,
    websocket_manager: Arc<W>,
    state: Arc<ServerState>,
}

impl<S, W> Clone for EventRelay<S, W> {
    fn clone(&self) -> Self {
        Self {
            balancer: self.balancer.clone(),
            store: self.store.clone(),
            websocket_manager: self.websocket_manager.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S, W> EventRelay<S, W>
where
    S: ArtifactStore,
    W: WebSocketManager,
{
    pub fn new(balancer: GroupBalancer, store: Arc<S>, websocket_manager: Arc<W>, state: Arc<ServerState>) -> Self {
        Self {
            balancer: Arc::new(Mutex::new(balancer)),
            store,
            websocket_manager,
            state,
        }
    }

    pub fn websocket_manager(&self) -> &Arc<W> {
        &self.websocket_manager
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Current counters in group order
    pub async fn group_counts(&self) -> Vec<(GroupLabel, u64)> {
        self.balancer.lock().await.counts()
    }

    /// Decode and handle one text frame. Never fails; problems are logged.
    pub async fn handle_text(&self, connection_id: ConnectionId, text: &str) -> DispatchOutcome {
        match ClientEvent::decode(text) {
            Ok(event) => self.dispatch(connection_id, event).await,
            Err(e) => {
                conn_warn!(connection_id, "⚠️ Ignoring malformed message: {}", e);
                self.state.record_malformed();
                DispatchOutcome::Malformed
            }
        }
    }

    pub async fn dispatch(&self, connection_id: ConnectionId, event: ClientEvent) -> DispatchOutcome {
        match event {
            ClientEvent::RequestGroup => self.assign_group(connection_id).await,
            ClientEvent::FinalSubmission { record } => self.record_submission(connection_id, record).await,
            ClientEvent::Telemetry { event, payload } => {
                conn_info!(connection_id, event = %event, "📍 Telemetry: {}", event);
                if let Some(payload) = payload {
                    conn_debug!(connection_id, "📍 {} payload: {}", event, payload);
                }
                self.state.record_telemetry();
                DispatchOutcome::Telemetry(event)
            }
        }
    }

    async fn assign_group(&self, connection_id: ConnectionId) -> DispatchOutcome {
        // Scan and increment under one lock
        let (group, counts) = {
            let mut balancer = self.balancer.lock().await;
            let group = balancer.assign();
            (group, balancer.counts())
        };

        conn_info!(
            connection_id,
            group = %group,
            "🎲 Assigned group '{}' (counts: {})",
            group,
            format_counts(&counts)
        );

        let reply = ServerEvent::GroupAssigned { group: group.clone() };
        if let Err(e) = self.websocket_manager.send_to_client(connection_id, reply).await {
            conn_warn!(connection_id, "Failed to deliver group assignment: {}", e);
        }

        DispatchOutcome::GroupAssigned(group)
    }

    async fn record_submission(&self, connection_id: ConnectionId, record: ParticipantRecord) -> DispatchOutcome {
        let Some(participant) = record.participant_id() else {
            conn_error!(connection_id, "❌ Final submission without participantId, nothing stored");
            self.state.record_rejected();

            let reply = ServerEvent::SubmissionRejected {
                reason: MISSING_PARTICIPANT_ID.to_string(),
            };
            if let Err(e) = self.websocket_manager.send_to_client(connection_id, reply).await {
                conn_warn!(connection_id, "Failed to deliver rejection: {}", e);
            }
            return DispatchOutcome::Rejected;
        };

        match self.store.save(&participant, &record).await {
            Ok(path) => {
                conn_info!(
                    connection_id,
                    participant = %participant,
                    "💾 Stored {} fields for participant '{}' at {}",
                    record.len(),
                    participant,
                    path.display()
                );
                self.state.record_saved();
                DispatchOutcome::Saved { participant, path }
            }
            Err(e) => {
                conn_error!(
                    connection_id,
                    participant = %participant,
                    error = %e,
                    "❌ Failed to store data for participant '{}': {}",
                    participant,
                    e
                );
                self.state.record_failed();
                DispatchOutcome::WriteFailed { participant }
            }
        }
    }
}

fn format_counts(counts: &[(GroupLabel, u64)]) -> String {
    counts
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
