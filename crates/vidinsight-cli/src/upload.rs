//! Upload page: pick an MP4, request a pre-signed URL, PUT the bytes, open the results.

use std::sync::Arc;

use vidinsight_api_client::{Gateway, GatewayError};
use vidinsight_core::{CoreError, Route, SelectedFile, UploadCandidate, UploadUrlRequest};

use crate::shell::Shell;

pub const REJECTED_FILE_ALERT: &str = "Please upload an MP4 file.";
pub const UPLOAD_FAILED_ALERT: &str = "File upload failed.";
pub const UPLOAD_ERROR_ALERT: &str = "An error occurred during upload.";

pub const DROP_PROMPT: &str = "Drop MP4 file here or click to upload";
pub const ANALYZE_LABEL: &str = "Analyze";
pub const UPLOADING_LABEL: &str = "Uploading...";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to obtain upload URL: {0}")]
    UploadUrl(#[source] GatewayError),

    #[error("Storage rejected the upload with status {status}")]
    Rejected { status: u16 },

    #[error("Failed to transfer video: {0}")]
    Transfer(#[source] GatewayError),

    #[error("Generated key does not form a valid route: {0}")]
    Route(#[source] CoreError),
}

impl UploadError {
    /// Alert shown to the user for this failure.
    pub fn alert_message(&self) -> &'static str {
        match self {
            UploadError::Rejected { .. } => UPLOAD_FAILED_ALERT,
            _ => UPLOAD_ERROR_ALERT,
        }
    }
}

#[derive(Debug, Default)]
struct UploadState {
    selected: Option<UploadCandidate>,
    drag_active: bool,
    analyzing: bool,
}

/// Clears the analyzing flag when the sequence ends, however it ends.
struct AnalyzingGuard<'a>(&'a mut bool);

impl<'a> AnalyzingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct UploadPage<S> {
    gateway: Arc<dyn Gateway>,
    shell: S,
    state: UploadState,
}

impl<S: Shell> UploadPage<S> {
    pub fn new(gateway: Arc<dyn Gateway>, shell: S) -> Self {
        Self {
            gateway,
            shell,
            state: UploadState::default(),
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Accept `file` if it is an MP4; otherwise alert and leave the page unchanged.
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        match UploadCandidate::from_selection(file) {
            Ok(candidate) => {
                tracing::info!(
                    name = %candidate.original_name,
                    key = %candidate.generated_key,
                    bytes = candidate.size(),
                    "File selected"
                );
                self.state.selected = Some(candidate);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "File rejected");
                self.shell.alert(REJECTED_FILE_ALERT);
                false
            }
        }
    }

    pub fn drag_enter(&mut self) {
        self.state.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.state.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.state.drag_active = false;
    }

    /// A drop behaves like picking the file.
    pub fn drop_file(&mut self, file: Option<SelectedFile>) -> bool {
        self.state.drag_active = false;
        match file {
            Some(file) => self.select_file(file),
            None => false,
        }
    }

    pub fn is_drag_active(&self) -> bool {
        self.state.drag_active
    }

    pub fn is_uploaded(&self) -> bool {
        self.state.selected.is_some()
    }

    pub fn is_analyzing(&self) -> bool {
        self.state.analyzing
    }

    pub fn can_analyze(&self) -> bool {
        self.is_uploaded() && !self.state.analyzing
    }

    pub fn selected(&self) -> Option<&UploadCandidate> {
        self.state.selected.as_ref()
    }

    pub fn display_text(&self) -> &str {
        self.state
            .selected
            .as_ref()
            .map(|c| c.original_name.as_str())
            .unwrap_or(DROP_PROMPT)
    }

    pub fn button_label(&self) -> &'static str {
        if self.state.analyzing {
            UPLOADING_LABEL
        } else {
            ANALYZE_LABEL
        }
    }

    /// Run the upload sequence for the selected file.
    ///
    /// Returns the route navigated to, or `None` when nothing was selected or the
    /// sequence failed (the failure has been alerted). The selection is kept either way.
    pub async fn analyze(&mut self) -> Option<Route> {
        if self.state.analyzing {
            return None;
        }
        let Some(candidate) = self.state.selected.clone() else {
            tracing::debug!("Analyze requested without a selected file");
            return None;
        };

        tracing::info!(key = %candidate.generated_key, label = UPLOADING_LABEL, "Starting upload");
        let outcome = {
            let _analyzing = AnalyzingGuard::engage(&mut self.state.analyzing);
            upload_sequence(self.gateway.as_ref(), &candidate).await
        };

        match outcome {
            Ok(route) => {
                tracing::info!(key = %candidate.generated_key, route = %route, "Upload complete");
                self.shell.navigate(route.clone());
                Some(route)
            }
            Err(e) => {
                tracing::error!(key = %candidate.generated_key, error = %e, "Upload failed");
                self.shell.alert(e.alert_message());
                None
            }
        }
    }
}

async fn upload_sequence(
    gateway: &dyn Gateway,
    candidate: &UploadCandidate,
) -> Result<Route, UploadError> {
    let request = UploadUrlRequest::from(candidate);
    let upload = gateway
        .request_upload_url(&request)
        .await
        .map_err(UploadError::UploadUrl)?;

    gateway
        .upload_video(&upload.url, candidate.bytes.clone())
        .await
        .map_err(|e| match e {
            GatewayError::UploadRejected { status } => UploadError::Rejected { status },
            other => UploadError::Transfer(other),
        })?;

    Route::for_key(&candidate.generated_key).map_err(UploadError::Route)
}
