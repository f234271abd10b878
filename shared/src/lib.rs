//! Shared types for the experiment relay
//!
//! Protocol messages exchanged with the browser UI, the domain types they
//! carry, and the logging helpers used by the server process.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{ClientEvent, ServerEvent};
