use thiserror::Error;

/// Top-level error type for the Mustashar system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// MustasharError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MustasharError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MustasharError {
    fn from(err: toml::de::Error) -> Self {
        MustasharError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MustasharError {
    fn from(err: toml::ser::Error) -> Self {
        MustasharError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MustasharError {
    fn from(err: serde_json::Error) -> Self {
        MustasharError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Mustashar operations.
pub type Result<T> = std::result::Result<T, MustasharError>;

/// Errors from a remote gateway call.
///
/// Both remote collaborators (analysis and speech) are consumed through a
/// narrow request/response contract; every transport failure, non-success
/// status, or malformed body maps onto one of these variants. All of them
/// are recoverable: the owning component returns to `Idle` and the session
/// remains usable for a retry.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Request(String),

    #[error("gateway returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),
}

impl From<GatewayError> for MustasharError {
    fn from(err: GatewayError) -> Self {
        MustasharError::Gateway(err.to_string())
    }
}
