//! In-memory fakes shared by the `net` tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::error::ApiError;
use super::http::{ApiClient, HttpRequest, HttpResponse, HttpTransport};
use super::storage::{MemoryStorage, SessionStore};
use crate::config::AppConfig;

/// Transport that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest, _timeout_ms: u32) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".to_owned())))
    }
}

/// API client over a scripted transport and fresh in-memory storage.
pub fn scripted_client() -> (ApiClient, Arc<ScriptedTransport>, MemoryStorage) {
    let transport = ScriptedTransport::new();
    let storage = MemoryStorage::new();
    let config = AppConfig::from_values(Some("https://api.test/v1"), None, None);
    let client = ApiClient::new(&config, SessionStore::new(Arc::new(storage.clone())), transport.clone());
    (client, transport, storage)
}
