//! Error taxonomy for the relay.
//!
//! Per-update conditions (`UnknownChat`, `NoMembers`, `StoreUnavailable`, `SendFailed`)
//! are reported and dropped. `TransportAuthFailure` and a `StoreUnavailable` raised
//! during startup terminate the process.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("Message in unknown chat with ID {0}")]
    UnknownChat(i64),

    #[error("No members found in the chat with ID {0}")]
    NoMembers(i64),

    #[error("Membership store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to authenticate with the chat transport: {0}")]
    TransportAuthFailure(String),

    #[error("Failed to send message to chat {chat_id}: {reason}")]
    SendFailed { chat_id: i64, reason: String },
}

impl From<rusqlite::Error> for RelayError {
    fn from(error: rusqlite::Error) -> Self {
        RelayError::StoreUnavailable(error.to_string())
    }
}

impl RelayError {
    /// Extracts a `RelayError` from an `anyhow` error, classifying anything else as a store failure.
    pub fn from_store(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<RelayError>() {
            Some(relay) => relay.clone(),
            None => RelayError::StoreUnavailable(format!("{error:#}")),
        }
    }
}
