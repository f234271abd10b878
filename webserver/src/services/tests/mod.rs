//! Service tests for the experiment server

pub mod websocket_manager;
