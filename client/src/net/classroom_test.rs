use super::*;
use crate::net::http::Method;
use crate::net::test_support::scripted_client;
use futures::executor::block_on;

#[test]
fn join_path_encodes_class_id() {
    assert_eq!(join_path("cls 1"), "/classes/cls%201/join");
}

#[test]
fn access_reads_token_and_optional_url() {
    let access = access_from(&json!({ "data": { "token": "vid", "serverUrl": "wss://rtc.test" } })).unwrap();
    assert_eq!(access.token, "vid");
    assert_eq!(access.signaling_url("ws://default"), "wss://rtc.test");

    let bare = access_from(&json!({ "accessToken": "vid" })).unwrap();
    assert_eq!(bare.url, None);
    assert_eq!(bare.signaling_url("ws://default"), "ws://default");
}

#[test]
fn join_class_posts_with_bearer() {
    let (api, transport, _storage) = scripted_client();
    api.session().set_token("session-tok");
    transport.respond(200, r#"{"token":"video-tok"}"#);

    let access = block_on(join_class(&api, "c9")).unwrap();

    assert_eq!(access.token, "video-tok");
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.test/v1/classes/c9/join");
    assert_eq!(request.header("authorization"), Some("Bearer session-tok"));
}

#[test]
fn join_class_without_token_is_an_error() {
    let (api, transport, _storage) = scripted_client();
    transport.respond(200, r#"{"ok":true}"#);

    let err = block_on(join_class(&api, "c9")).unwrap_err();

    assert_eq!(err, ApiError::Other("Classroom response did not include a token".to_owned()));
}

#[test]
fn join_class_forbidden_propagates_backend_message() {
    let (api, transport, _storage) = scripted_client();
    transport.respond(403, r#"{"message":"Not enrolled in this class"}"#);

    let err = block_on(join_class(&api, "c9")).unwrap_err();

    assert_eq!(err.to_string(), "Not enrolled in this class");
}
