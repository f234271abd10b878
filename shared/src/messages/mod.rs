//! Browser ↔ server WebSocket protocol
//!
//! Every frame is a JSON object with an `event` string. Inbound frames are
//! decoded into [`ClientEvent`]; replies are [`ServerEvent`] values sent only
//! to the connection that asked.

pub mod client;
pub mod server;

pub use client::ClientEvent;
pub use server::ServerEvent;

/// Group request as sent by the deployed clients
pub const EVENT_REQUEST_GROUP: &str = "SOLICITAR_GRUPO";

/// Alternate spelling of the group request
pub const EVENT_REQUEST_GROUP_ASSIGNMENT: &str = "REQUEST_GROUP_ASSIGNMENT";

/// Final submission carrying the whole participant record
pub const EVENT_FINAL_SUBMISSION: &str = "FIN_EXPERIMENTO";

pub const EVENT_GROUP_ASSIGNED: &str = "GROUP_ASSIGNED";

pub const EVENT_SUBMISSION_REJECTED: &str = "SUBMISSION_REJECTED";
