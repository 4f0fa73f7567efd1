//! Error types for the conversation core.

use mustashar_core::error::{GatewayError, MustasharError};

/// Errors from the conversation session.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("query exceeds maximum length of {0} characters")]
    QueryTooLong(usize),
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("no incomplete answer to continue")]
    NothingToContinue,
    #[error("stale result for a reset session")]
    StaleResult,
    #[error("gateway error: {0}")]
    Gateway(String),
}

impl From<GatewayError> for ChatError {
    fn from(err: GatewayError) -> Self {
        ChatError::Gateway(err.to_string())
    }
}

impl From<ChatError> for MustasharError {
    fn from(err: ChatError) -> Self {
        MustasharError::Chat(err.to_string())
    }
}
