//! Event bus errors. Most are per-subscriber (lagged, unknown thread);
//! `ProtocolVersionMismatch` is the one fatal-to-the-producer variant.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EventBusError>;

#[derive(Debug, Error, Clone)]
pub enum EventBusError {
    #[error("event carries protocol_version {found:?}, this bus only accepts {expected:?}")]
    ProtocolVersionMismatch { expected: String, found: String },

    /// Terminal: sent once to a subscriber whose buffer exceeded the
    /// high-water mark, then the subscriber is dropped. It must
    /// re-subscribe with `last_seq_id`.
    #[error("subscriber exceeded the buffer high-water mark after seq_id {last_seq_id}")]
    SubscriberLagged { last_seq_id: u64 },

    #[error("no event log for thread {0:?}")]
    UnknownThread(String),
}

impl EventBusError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EventBusError::ProtocolVersionMismatch { .. } => "ProtocolVersionMismatch",
            EventBusError::SubscriberLagged { .. } => "SubscriberLagged",
            EventBusError::UnknownThread(_) => "UnknownThread",
        }
    }
}
