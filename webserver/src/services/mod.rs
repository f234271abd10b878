//! Service implementations
//!
//! Real implementations of all service traits for production use

pub mod artifact_store;
pub mod websocket_manager;

#[cfg(test)]
mod tests;

pub use artifact_store::RealArtifactStore;
pub use websocket_manager::RealWebSocketManager;
