//! Thin HTTP client for the backend REST API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, raced against a
//! `gloo-timers` timeout. Server-side (SSR) and tests: the transport is
//! swapped for `OfflineTransport` or an in-memory fake.
//!
//! DESIGN
//! ======
//! `ApiClient` owns the base URL, the fixed timeout, the session store and a
//! transport. It reads the token on every call, so logins and logouts take
//! effect without rebuilding the client. Requests are fire-and-fail-once:
//! no retry, no backoff.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::error::ApiError;
use super::storage::SessionStore;
use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully-resolved outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and waits at most `timeout_ms` for the full body.
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest, timeout_ms: u32) -> Result<HttpResponse, ApiError>;
}

/// Browser fetch via `gloo-net`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest, timeout_ms: u32) -> Result<HttpResponse, ApiError> {
        use futures::future::{Either, select};
        use gloo_net::http::{Method as GlooMethod, RequestBuilder};

        let method = match request.method {
            Method::Get => GlooMethod::GET,
            Method::Post => GlooMethod::POST,
            Method::Put => GlooMethod::PUT,
            Method::Patch => GlooMethod::PATCH,
            Method::Delete => GlooMethod::DELETE,
        };
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let exchange = async move {
            let resp = built.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = resp.status();
            let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
            Ok::<_, ApiError>(HttpResponse { status, body })
        };
        let timeout = gloo_timers::future::TimeoutFuture::new(timeout_ms);

        match select(Box::pin(exchange), Box::pin(timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ApiError::Timeout(timeout_ms)),
        }
    }
}

/// Transport used where no browser is available (SSR).
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineTransport;

#[async_trait(?Send)]
impl HttpTransport for OfflineTransport {
    async fn send(&self, request: HttpRequest, _timeout_ms: u32) -> Result<HttpResponse, ApiError> {
        let _ = request;
        Err(ApiError::Network("not available on server".to_owned()))
    }
}

/// Per-call request options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout_ms: u32,
    session: SessionStore,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: SessionStore, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            timeout_ms: config.request_timeout_ms,
            session,
            transport,
        }
    }

    /// Client wired to `localStorage` and the platform transport.
    pub fn for_browser(config: &AppConfig) -> Self {
        #[cfg(feature = "hydrate")]
        let transport: Arc<dyn HttpTransport> = Arc::new(GlooTransport);
        #[cfg(not(feature = "hydrate"))]
        let transport: Arc<dyn HttpTransport> = Arc::new(OfflineTransport);

        Self::new(config, SessionStore::browser(), transport)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the body with any `{ "data": … }` envelope
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for non-2xx responses and the transport's
    /// error for network failures and timeouts.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        self.request_raw(path, options).await.map(unwrap_envelope)
    }

    /// Same as `request`, but the decoded body is returned as-is.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn request_raw(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self.build_request(path, options)?;
        let method = request.method;
        let response = self.transport.send(request, self.timeout_ms).await?;

        if !(200..300).contains(&response.status) {
            let err = ApiError::from_response(response.status, &response.body);
            leptos::logging::warn!("{} {path} failed: {err}", method.as_str());
            return Err(err);
        }
        decode_body(&response.body)
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        let body = match options.body {
            Some(value) => {
                headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
                Some(serde_json::to_string(&value).map_err(|e| ApiError::Decode(e.to_string()))?)
            }
            None => None,
        };
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        headers.extend(options.headers);

        Ok(HttpRequest { method: options.method, url: join_url(&self.base_url, path), headers, body })
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::Get)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::Post).json(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::Put).json(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::Patch).json(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(Method::Delete)).await
    }
}

/// Join the API root and a resource path. Absolute URLs pass through.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Decode a 2xx body. Empty bodies (e.g. 204) decode to `null`.
fn decode_body(raw: &str) -> Result<Value, ApiError> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Strip the conventional `{ "data": … }` envelope when present.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}
