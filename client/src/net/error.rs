//! Normalized REST error shape and the user-facing formatter.
//!
//! ERROR HANDLING
//! ==============
//! Every failure coming out of `net::http` is one `ApiError`. Call sites never
//! inspect raw responses; they either match on the variant or hand the error to
//! `format_api_error` and surface the string as a toast or inline message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Errors produced by REST calls against the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status {
        status: u16,
        /// Backend-supplied `message`/`error`, or a generic status line.
        message: String,
        /// Raw response body (parsed JSON, or a JSON string when not JSON).
        body: Value,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The fixed client-level timeout elapsed first.
    #[error("Request timed out after {0} ms")]
    Timeout(u32),

    /// A 2xx body could not be decoded into the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// Client-side failure that carries its own message verbatim.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// HTTP status for backend-reported errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body for backend-reported errors.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// `true` for 401/403 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Build a status error from a raw response body.
    pub fn from_response(status: u16, raw_body: &str) -> Self {
        let body = serde_json::from_str::<Value>(raw_body).unwrap_or_else(|_| Value::String(raw_body.to_owned()));
        let message = backend_message(&body).unwrap_or_else(|| generic_status_message(status));
        Self::Status { status, message, body }
    }
}

/// Pull a human-readable message out of a backend error body.
///
/// Prefers `message`, then `error` (either a string or an object with its own
/// `message`). Blank strings count as absent.
pub fn backend_message(body: &Value) -> Option<String> {
    let non_blank = |v: &Value| v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned);

    if let Some(msg) = body.get("message").and_then(non_blank) {
        return Some(msg);
    }
    match body.get("error") {
        Some(Value::String(_)) => body.get("error").and_then(non_blank),
        Some(nested @ Value::Object(_)) => nested.get("message").and_then(non_blank),
        _ => None,
    }
}

fn generic_status_message(status: u16) -> String {
    format!("Request failed with status {status}")
}

/// Turn an optional error into the string shown to the user.
///
/// Backend messages win over everything else; a missing error (or one whose
/// text is empty) yields `fallback`.
pub fn format_api_error(error: Option<&ApiError>, fallback: &str) -> String {
    let Some(error) = error else {
        return fallback.to_owned();
    };
    let text = error.to_string();
    if text.trim().is_empty() { fallback.to_owned() } else { text }
}
