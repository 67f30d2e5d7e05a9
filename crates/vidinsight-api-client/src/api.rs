//! Domain methods for the gateway client.
//!
//! Request/response types come from `vidinsight_core::models`.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use vidinsight_core::constants::ACCEPTED_CONTENT_TYPE;
use vidinsight_core::models::UploadUrlEnvelope;
use vidinsight_core::{AnalysisResult, UploadUrlRequest, UploadUrlResponse};

use crate::{GatewayClient, GatewayError};

impl GatewayClient {
    /// Request a pre-signed upload URL. Expects `{ "body": { "url": ... } }`.
    pub async fn post_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<UploadUrlResponse, GatewayError> {
        let url = self.build_url("/url");
        tracing::debug!(key = %request.key, "Requesting upload URL");

        let response = self
            .client()
            .post(&url)
            .timeout(self.request_timeout())
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::transport(&url, e))?;

        let response = ensure_success(&url, response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(&url, e))?;

        let envelope: UploadUrlEnvelope = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::decode(&url, format!("missing body.url: {}", e)))?;

        Ok(envelope.body)
    }

    /// PUT the video bytes to a pre-signed URL. Any non-2xx answer is a rejection.
    ///
    /// No overall deadline: a large video on a slow uplink may take minutes.
    pub async fn put_object(&self, upload_url: &str, bytes: Bytes) -> Result<(), GatewayError> {
        let size = bytes.len();
        let response = self
            .client()
            .put(upload_url)
            .header(CONTENT_TYPE, ACCEPTED_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .map_err(|e| GatewayError::transport(upload_url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Storage rejected upload");
            return Err(GatewayError::UploadRejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(bytes = size, "Upload stored");
        Ok(())
    }

    /// Fetch the result document for a route id.
    ///
    /// HTTP 500 is the gateway's error signal. Other statuses still carry a JSON body,
    /// which is decoded like a success.
    pub async fn get_result(&self, id: &str) -> Result<AnalysisResult, GatewayError> {
        let url = self.build_url(&format!("/results/{}", id));

        let response = self
            .client()
            .get(&url)
            .timeout(self.request_timeout())
            .send()
            .await
            .map_err(|e| GatewayError::transport(&url, e))?;

        let status = response.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return Err(GatewayError::ServerError { url });
        }
        if !status.is_success() {
            tracing::warn!(id, status = status.as_u16(), "Result fetch returned non-success status");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::transport(&url, e))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| GatewayError::decode(&url, format!("body is not JSON: {}", e)))?;

        AnalysisResult::from_value(value).map_err(|source| GatewayError::Document { url, source })
    }
}

async fn ensure_success(url: &str, response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(GatewayError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}
