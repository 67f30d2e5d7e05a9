use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keys::{generate_unique_key, route_id_for_key};
use crate::validation::{content_type_for_path, validate_content_type};

/// A file picked by the user, before validation.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. Content type is inferred from the extension unless given.
    pub fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self, CoreError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", path.display()),
                )
            })?
            .to_string();
        let mime_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for_path(path));
        let bytes = std::fs::read(path)?;

        Ok(Self {
            name,
            mime_type,
            bytes: Bytes::from(bytes),
        })
    }
}

/// An accepted MP4 with its generated storage key.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub original_name: String,
    pub generated_key: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadCandidate {
    /// Validate the selection and derive a unique key for it.
    pub fn from_selection(file: SelectedFile) -> Result<Self, CoreError> {
        validate_content_type(&file.mime_type)?;
        let generated_key = generate_unique_key(&file.name);

        Ok(Self {
            original_name: file.name,
            generated_key,
            mime_type: file.mime_type,
            bytes: file.bytes,
        })
    }

    pub fn route_id(&self) -> &str {
        route_id_for_key(&self.generated_key)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Body of `POST /url`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadUrlRequest {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&UploadCandidate> for UploadUrlRequest {
    fn from(candidate: &UploadCandidate) -> Self {
        Self {
            key: candidate.generated_key.clone(),
            name: Some(candidate.original_name.clone()),
        }
    }
}

/// Pre-signed write URL for one object. Consumed once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadUrlResponse {
    pub url: String,
}

/// The gateway wraps the URL as `{ "body": { "url": ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlEnvelope {
    pub body: UploadUrlResponse,
}
