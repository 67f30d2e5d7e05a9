//! In-memory gateway and shell for page tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use vidinsight_api_client::{Gateway, GatewayError};
use vidinsight_core::{AnalysisResult, Route, UploadUrlRequest, UploadUrlResponse};

use crate::shell::Shell;

/// Scripted answer for one result fetch.
#[derive(Debug, Clone)]
pub enum Scripted {
    Document(Value),
    ServerError,
    NotJson,
}

pub struct FakeGateway {
    upload_url: Option<String>,
    put_status: u16,
    results: Mutex<HashMap<String, VecDeque<Scripted>>>,
    delays: HashMap<String, Duration>,
    pub url_requests: Mutex<Vec<UploadUrlRequest>>,
    pub puts: Mutex<Vec<(String, Bytes)>>,
    pub fetched_ids: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            upload_url: Some("https://x/y".to_string()),
            put_status: 200,
            results: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            url_requests: Mutex::new(Vec::new()),
            puts: Mutex::new(Vec::new()),
            fetched_ids: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// `None` makes `/url` answer with a body that has no `body.url`.
    pub fn with_upload_url(mut self, url: Option<&str>) -> Self {
        self.upload_url = url.map(str::to_string);
        self
    }

    pub fn with_put_status(mut self, status: u16) -> Self {
        self.put_status = status;
        self
    }

    /// Answers for `id`, in order. The last one repeats.
    pub fn with_results(self, id: &str, answers: Vec<Scripted>) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(id.to_string(), answers.into_iter().collect());
        self
    }

    pub fn with_delay(mut self, id: &str, delay: Duration) -> Self {
        self.delays.insert(id.to_string(), delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.url_requests.lock().unwrap().len()
            + self.puts.lock().unwrap().len()
            + self.fetch_count()
    }

    fn next_answer(&self, id: &str) -> Scripted {
        let mut results = self.results.lock().unwrap();
        match results.get_mut(id) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Scripted::Document(json!({}))),
            None => Scripted::Document(json!({})),
        }
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn request_upload_url(
        &self,
        request: &UploadUrlRequest,
    ) -> Result<UploadUrlResponse, GatewayError> {
        self.url_requests.lock().unwrap().push(request.clone());
        match &self.upload_url {
            Some(url) => Ok(UploadUrlResponse { url: url.clone() }),
            None => Err(GatewayError::Decode {
                url: "fake://url".to_string(),
                message: "missing body.url".to_string(),
            }),
        }
    }

    async fn upload_video(&self, upload_url: &str, bytes: Bytes) -> Result<(), GatewayError> {
        self.puts
            .lock()
            .unwrap()
            .push((upload_url.to_string(), bytes));
        if (200..300).contains(&self.put_status) {
            Ok(())
        } else {
            Err(GatewayError::UploadRejected {
                status: self.put_status,
            })
        }
    }

    async fn fetch_result(&self, id: &str) -> Result<AnalysisResult, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched_ids.lock().unwrap().push(id.to_string());
        let answer = self.next_answer(id);

        if let Some(delay) = self.delays.get(id) {
            tokio::time::sleep(*delay).await;
        }

        let url = format!("fake://results/{}", id);
        match answer {
            Scripted::Document(value) => AnalysisResult::from_value(value)
                .map_err(|source| GatewayError::Document { url, source }),
            Scripted::ServerError => Err(GatewayError::ServerError { url }),
            Scripted::NotJson => Err(GatewayError::Decode {
                url,
                message: "body is not JSON".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingShell {
    pub alerts: Mutex<Vec<String>>,
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingShell {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Shell for RecordingShell {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
