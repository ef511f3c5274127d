use super::*;
use serde_json::json;

// =============================================================
// from_response
// =============================================================

#[test]
fn from_response_prefers_backend_message() {
    let err = ApiError::from_response(401, r#"{"message":"Invalid credentials"}"#);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.body(), Some(&json!({ "message": "Invalid credentials" })));
}

#[test]
fn from_response_falls_back_to_error_field() {
    let err = ApiError::from_response(422, r#"{"error":"Email already taken"}"#);
    assert_eq!(err.to_string(), "Email already taken");
}

#[test]
fn from_response_reads_nested_error_message() {
    let err = ApiError::from_response(400, r#"{"error":{"message":"Bad season"}}"#);
    assert_eq!(err.to_string(), "Bad season");
}

#[test]
fn from_response_uses_generic_message_for_non_json_body() {
    let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
    assert_eq!(err.to_string(), "Request failed with status 502");
    assert_eq!(err.body(), Some(&json!("<html>Bad Gateway</html>")));
}

#[test]
fn from_response_ignores_blank_message() {
    let err = ApiError::from_response(500, r#"{"message":"   "}"#);
    assert_eq!(err.to_string(), "Request failed with status 500");
}

#[test]
fn unauthorized_detection() {
    assert!(ApiError::from_response(401, "").is_unauthorized());
    assert!(ApiError::from_response(403, "").is_unauthorized());
    assert!(!ApiError::from_response(404, "").is_unauthorized());
    assert!(!ApiError::Network("offline".to_owned()).is_unauthorized());
}

// =============================================================
// format_api_error
// =============================================================

#[test]
fn format_api_error_returns_backend_message() {
    let err = ApiError::from_response(400, r#"{"message":"X"}"#);
    assert_eq!(format_api_error(Some(&err), "Something went wrong"), "X");
}

#[test]
fn format_api_error_returns_plain_error_text() {
    let err = ApiError::Other("Y".to_owned());
    assert_eq!(format_api_error(Some(&err), "Something went wrong"), "Y");
}

#[test]
fn format_api_error_returns_fallback_for_none() {
    assert_eq!(format_api_error(None, "Something went wrong"), "Something went wrong");
}

#[test]
fn format_api_error_returns_fallback_for_empty_text() {
    let err = ApiError::Other(String::new());
    assert_eq!(format_api_error(Some(&err), "fallback"), "fallback");
}

#[test]
fn format_api_error_describes_transport_failures() {
    assert_eq!(format_api_error(Some(&ApiError::Timeout(30_000)), "f"), "Request timed out after 30000 ms");
    assert_eq!(format_api_error(Some(&ApiError::Network("offline".to_owned())), "f"), "Network error: offline");
}
