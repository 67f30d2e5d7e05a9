//! Errors returned by the gateway client.

use vidinsight_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 500 from the results endpoint.
    #[error("Gateway reported an internal error for {url}")]
    ServerError { url: String },

    #[error("Gateway request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Malformed result document from {url}: {source}")]
    Document {
        url: String,
        #[source]
        source: CoreError,
    },

    #[error("Storage rejected the upload with status {status}")]
    UploadRejected { status: u16 },
}

impl GatewayError {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        GatewayError::Transport {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn decode(url: &str, message: impl Into<String>) -> Self {
        GatewayError::Decode {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// The gateway answered but the body was not what we expected.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            GatewayError::Decode { .. } | GatewayError::Document { .. }
        )
    }
}
