//! Live-classroom join tokens.
//!
//! The backend mints a short-lived video token per class; the client never
//! sees the video service's API key.

#[cfg(test)]
#[path = "classroom_test.rs"]
mod classroom_test;

use serde_json::{Value, json};

use super::api::Resource;
use super::auth::extract_token;
use super::error::ApiError;
use super::http::{ApiClient, Method, RequestOptions};

/// Credentials for one classroom connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassroomAccess {
    pub token: String,
    /// Signaling URL override; `None` uses `AppConfig::livekit_url`.
    pub url: Option<String>,
}

impl ClassroomAccess {
    pub fn signaling_url<'a>(&'a self, default_url: &'a str) -> &'a str {
        self.url.as_deref().unwrap_or(default_url)
    }
}

pub fn join_path(class_id: &str) -> String {
    format!("{}/join", Resource::Classes.item_path(class_id))
}

pub fn access_from(body: &Value) -> Option<ClassroomAccess> {
    let token = extract_token(body)?;
    let scope = body.get("data").filter(|d| d.is_object()).unwrap_or(body);
    let url = ["url", "serverUrl", "livekitUrl"]
        .iter()
        .find_map(|key| scope.get(*key)?.as_str())
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned);
    Some(ClassroomAccess { token, url })
}

/// Ask the backend for a video token for `class_id`.
///
/// # Errors
///
/// The request error, or `ApiError::Other` when the response carries no token.
pub async fn join_class(api: &ApiClient, class_id: &str) -> Result<ClassroomAccess, ApiError> {
    let options = RequestOptions::new(Method::Post).json(json!({}));
    let body = api.request_raw(&join_path(class_id), options).await?;
    access_from(&body).ok_or_else(|| ApiError::Other("Classroom response did not include a token".to_owned()))
}
