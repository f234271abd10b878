pub mod api;
pub mod websocket;

pub use api::{health_check, root_handler, status_handler};
pub use websocket::websocket_handler;
