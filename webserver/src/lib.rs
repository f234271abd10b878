//! Experiment relay server
//!
//! Assigns browser participants to balanced experimental groups over a
//! WebSocket connection and stores each participant's final data as a JSON
//! file.

pub mod config;
pub mod core;
pub mod error;
pub mod relay;
pub mod server_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod web;

// Re-export main types
pub use config::{Args, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use relay::{DispatchOutcome, EventRelay};
pub use server_impl::ExperimentServer;
pub use state::ServerState;

// Re-export trait definitions
pub use traits::{ArtifactStore, WebSocketManager};

// Re-export service implementations
pub use services::{RealArtifactStore, RealWebSocketManager};
