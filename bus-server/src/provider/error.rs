//! Provider error types.

use crate::transport::TransportError;

/// Why a provider could not take part in a round.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP call itself failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response envelope could not be decoded
    #[error("JSON parse error: {message}")]
    Envelope {
        message: String,
        body: Option<String>,
    },
}

impl ProviderError {
    /// Envelope error keeping a short prefix of the offending body.
    pub(crate) fn envelope(message: impl Into<String>, body: &[u8]) -> Self {
        ProviderError::Envelope {
            message: message.into(),
            body: Some(String::from_utf8_lossy(body).chars().take(500).collect()),
        }
    }
}
