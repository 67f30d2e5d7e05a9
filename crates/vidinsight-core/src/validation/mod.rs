//! Validation modules
//!
//! File-type checks for the upload page.

use std::path::Path;

use crate::constants::ACCEPTED_CONTENT_TYPE;
use crate::error::CoreError;

/// Only `video/mp4` is accepted.
pub fn validate_content_type(content_type: &str) -> Result<(), CoreError> {
    if content_type.trim().eq_ignore_ascii_case(ACCEPTED_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(CoreError::InvalidFileType(content_type.to_string()))
    }
}

/// Infer a MIME type from the file extension, the way a browser file picker does.
pub fn content_type_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
