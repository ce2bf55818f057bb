//! Transport error types.

/// Errors from a single provider HTTP call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request body or headers could not be encoded
    #[error("failed to encode request: {0}")]
    Encoding(String),

    /// Connection, timeout, or body-read failure
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a status outside 200-299
    #[error("API error {status}: {body}")]
    Protocol { status: u16, body: String },
}

impl TransportError {
    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}
