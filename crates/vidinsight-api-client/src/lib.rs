//! HTTP client for the Vidinsight gateway.
//!
//! Provides a minimal client over the gateway base URL, the [`Gateway`] trait the
//! pages are written against, and the domain methods (upload URL, storage PUT,
//! result fetch).

pub mod api;
pub mod error;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use vidinsight_core::constants::CONNECT_TIMEOUT;
use vidinsight_core::{AnalysisResult, ClientConfig, UploadUrlRequest, UploadUrlResponse};

pub use error::GatewayError;

/// Operations the upload and result pages need from the outside world.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `POST /url`: ask for a pre-signed write URL for `request.key`.
    async fn request_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<UploadUrlResponse, GatewayError>;

    /// `PUT {upload_url}` with the raw video bytes.
    async fn upload_video(&self, upload_url: &str, bytes: Bytes) -> Result<(), GatewayError>;

    /// `GET /results/{id}`.
    async fn fetch_result(&self, id: &str) -> Result<AnalysisResult, GatewayError>;
}

/// HTTP client for the gateway.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl GatewayClient {
    /// `request_timeout` bounds gateway calls only; storage uploads are bounded by
    /// the connect timeout alone.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(request_timeout))
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        Self::new(&config.gateway_url, config.http_timeout)
    }

    /// Create client from environment: VIDINSIGHT_API_GATEWAY_URL (or API_GATEWAY_URL).
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()?;
        Ok(Self::from_config(&config)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn request_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<UploadUrlResponse, GatewayError> {
        self.post_upload_url(request).await
    }

    async fn upload_video(&self, upload_url: &str, bytes: Bytes) -> Result<(), GatewayError> {
        self.put_object(upload_url, bytes).await
    }

    async fn fetch_result(&self, id: &str) -> Result<AnalysisResult, GatewayError> {
        self.get_result(id).await
    }
}
