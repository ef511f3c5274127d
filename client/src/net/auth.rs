//! Sign-in, registration, sign-out and session restore against the backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! These flows are the only writers of the stored bearer token. The Leptos
//! layer (`util::auth`) calls them and mirrors the outcome into `AuthState`.
//!
//! ERROR HANDLING
//! ==============
//! A profile fetch that fails after a token was stored removes that token
//! again, so "token present" never outlives a rejected session.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde_json::{Value, json};

use super::error::ApiError;
use super::http::{ApiClient, Method, RequestOptions};
use super::types::{Role, Session, User};

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const LOGOUT_PATH: &str = "/auth/logout";
const PROFILE_PATH: &str = "/auth/me";

/// Fields collected by the student registration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

impl Registration {
    /// Request body. The role is always `student`; other roles are created by
    /// admins.
    pub fn to_payload(&self) -> Value {
        let mut body = json!({
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "password": self.password,
            "role": Role::Student.as_str(),
        });
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.trim().is_empty()) {
            body["phone"] = json!(phone.trim());
        }
        body
    }
}

/// Result of checking the stored token on startup.
#[derive(Clone, Debug, PartialEq)]
pub enum RestoreOutcome {
    /// Nothing stored; no request was made.
    Anonymous,
    Authenticated(Session),
    /// The stored token was rejected and has been removed.
    Expired(ApiError),
}

/// Find the bearer token in a login/registration response.
///
/// Accepts `token`, `access_token` and `accessToken`, at the top level or
/// inside a `data` envelope.
pub fn extract_token(body: &Value) -> Option<String> {
    let scopes = [Some(body), body.get("data")];
    scopes.into_iter().flatten().find_map(|scope| {
        ["token", "access_token", "accessToken"]
            .iter()
            .find_map(|key| scope.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    })
}

/// Find an embedded user object in a login/registration response.
pub fn extract_user(body: &Value) -> Option<User> {
    let candidates = [body.get("user"), body.get("data").and_then(|d| d.get("user"))];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| serde_json::from_value::<User>(v.clone()).ok())
}

/// Load the current user's profile with the stored token.
///
/// # Errors
///
/// Returns the request error, or `ApiError::Decode` for an unusable profile.
pub async fn fetch_profile(api: &ApiClient) -> Result<User, ApiError> {
    let body = api.get(PROFILE_PATH).await?;
    let profile = body.get("user").cloned().unwrap_or(body);
    serde_json::from_value(profile).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Sign in with email and password.
///
/// # Errors
///
/// Returns the backend error (e.g. "Invalid credentials"), or
/// `ApiError::Other` when the response carries no token.
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<Session, ApiError> {
    let options = RequestOptions::new(Method::Post).json(json!({ "email": email, "password": password }));
    let body = api.request_raw(LOGIN_PATH, options).await?;
    establish_session(api, &body).await
}

/// Register a student account and sign it in.
///
/// # Errors
///
/// See [`login`].
pub async fn register_student(api: &ApiClient, registration: &Registration) -> Result<Session, ApiError> {
    let options = RequestOptions::new(Method::Post).json(registration.to_payload());
    let body = api.request_raw(REGISTER_PATH, options).await?;
    establish_session(api, &body).await
}

async fn establish_session(api: &ApiClient, body: &Value) -> Result<Session, ApiError> {
    let token = extract_token(body).ok_or_else(|| ApiError::Other("Sign-in response did not include a token".to_owned()))?;
    api.session().set_token(&token);

    match fetch_profile(api).await {
        Ok(user) => Ok(Session { token, user }),
        Err(err) => {
            if let Some(user) = extract_user(body) {
                leptos::logging::warn!("profile fetch failed after sign-in, using embedded user: {err}");
                return Ok(Session { token, user });
            }
            api.session().clear_token();
            Err(err)
        }
    }
}

/// Sign out. The backend call is best-effort; the local token is always
/// removed.
pub async fn logout(api: &ApiClient) {
    if api.session().token().is_some() {
        if let Err(err) = api.post(LOGOUT_PATH, json!({})).await {
            leptos::logging::warn!("logout request failed: {err}");
        }
    }
    api.session().clear_token();
}

/// Check the stored token on startup. Makes at most one request.
pub async fn restore(api: &ApiClient) -> RestoreOutcome {
    let Some(token) = api.session().token() else {
        return RestoreOutcome::Anonymous;
    };
    match fetch_profile(api).await {
        Ok(user) => RestoreOutcome::Authenticated(Session { token, user }),
        Err(err) => {
            leptos::logging::warn!("stored session rejected: {err}");
            api.session().clear_token();
            RestoreOutcome::Expired(err)
        }
    }
}
