//! Shared error types for the experiment relay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Malformed message: {message}")]
    MalformedMessage { message: String },

    #[error("Invalid group set: {reason}")]
    InvalidGroupSet { reason: String },
}

impl SharedError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage { message: message.into() }
    }

    pub fn invalid_groups(reason: impl Into<String>) -> Self {
        Self::InvalidGroupSet { reason: reason.into() }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
