//! Error types module
//!
//! Errors raised by the domain layer: file validation, route parsing and decoding
//! of the analysis document. Network failures live in the api-client crate.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid file type: expected video/mp4, got {0}")]
    InvalidFileType(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Malformed analysis document: {0}")]
    MalformedDocument(String),

    #[error("Malformed {section} section: {source}")]
    MalformedSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
