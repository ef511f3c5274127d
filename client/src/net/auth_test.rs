use super::*;
use crate::net::storage::{KeyValueStore, TOKEN_KEY};
use crate::net::test_support::scripted_client;
use futures::executor::block_on;

const PROFILE: &str = r#"{"data":{"id":"u1","email":"a@b.com","firstName":"Ada","role":"lecturer"}}"#;

// =============================================================
// Token / user extraction
// =============================================================

#[test]
fn extract_token_accepts_known_shapes() {
    assert_eq!(extract_token(&json!({ "token": "a" })).as_deref(), Some("a"));
    assert_eq!(extract_token(&json!({ "access_token": "b" })).as_deref(), Some("b"));
    assert_eq!(extract_token(&json!({ "data": { "accessToken": "c" } })).as_deref(), Some("c"));
}

#[test]
fn extract_token_rejects_blank_or_missing() {
    assert_eq!(extract_token(&json!({ "token": "  " })), None);
    assert_eq!(extract_token(&json!({ "ok": true })), None);
}

#[test]
fn extract_user_reads_nested_user() {
    let user = extract_user(&json!({ "data": { "user": { "id": "9", "role": "admin" } } })).unwrap();
    assert_eq!(user.id, "9");
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn registration_payload_forces_student_role() {
    let reg = Registration {
        first_name: "Grace".to_owned(),
        last_name: "Hopper".to_owned(),
        email: "g@h.io".to_owned(),
        password: "secret1".to_owned(),
        phone: Some(" ".to_owned()),
    };
    let payload = reg.to_payload();
    assert_eq!(payload["role"], json!("student"));
    assert_eq!(payload["firstName"], json!("Grace"));
    assert!(payload.get("phone").is_none());
}

// =============================================================
// login
// =============================================================

#[test]
fn login_stores_token_and_loads_profile() {
    let (api, transport, storage) = scripted_client();
    transport.respond(200, r#"{"token":"tok-1"}"#);
    transport.respond(200, PROFILE);

    let session = block_on(login(&api, "a@b.com", "pw")).unwrap();

    assert_eq!(session.token, "tok-1");
    assert_eq!(session.user.role, Role::Lecturer);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-1"));

    let sent = transport.requests();
    assert_eq!(sent[0].url, "https://api.test/v1/auth/login");
    assert_eq!(sent[1].url, "https://api.test/v1/auth/me");
    assert_eq!(sent[1].header("Authorization"), Some("Bearer tok-1"));
}

#[test]
fn login_surfaces_backend_message() {
    let (api, transport, storage) = scripted_client();
    transport.respond(401, r#"{"message":"Invalid credentials"}"#);

    let err = block_on(login(&api, "a@b.com", "wrong")).unwrap_err();

    assert_eq!(crate::net::error::format_api_error(Some(&err), "Login failed"), "Invalid credentials");
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn login_without_token_is_an_error() {
    let (api, transport, _) = scripted_client();
    transport.respond(200, r#"{"ok":true}"#);

    let err = block_on(login(&api, "a@b.com", "pw")).unwrap_err();

    assert_eq!(err, ApiError::Other("Sign-in response did not include a token".to_owned()));
}

#[test]
fn login_falls_back_to_embedded_user_when_profile_fails() {
    let (api, transport, storage) = scripted_client();
    transport.respond(200, r#"{"token":"t","user":{"id":"u2","role":"admin"}}"#);
    transport.respond(500, "{}");

    let session = block_on(login(&api, "a@b.com", "pw")).unwrap();

    assert_eq!(session.user.role, Role::Admin);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("t"));
}

#[test]
fn login_clears_token_when_profile_fails_without_fallback() {
    let (api, transport, storage) = scripted_client();
    transport.respond(200, r#"{"token":"t"}"#);
    transport.respond(401, r#"{"message":"Token invalid"}"#);

    let err = block_on(login(&api, "a@b.com", "pw")).unwrap_err();

    assert_eq!(err.to_string(), "Token invalid");
    assert_eq!(storage.get(TOKEN_KEY), None);
}

#[test]
fn register_student_posts_student_role() {
    let (api, transport, _) = scripted_client();
    transport.respond(201, r#"{"data":{"token":"new"}}"#);
    transport.respond(200, r#"{"id":"u3","email":"n@e.w","role":"student"}"#);

    let reg = Registration { email: "n@e.w".to_owned(), password: "secret1".to_owned(), ..Registration::default() };
    let session = block_on(register_student(&api, &reg)).unwrap();

    assert_eq!(session.token, "new");
    let body: Value = serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["role"], json!("student"));
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_token_even_when_backend_fails() {
    let (api, transport, storage) = scripted_client();
    api.session().set_token("tok");
    transport.respond(500, "{}");

    block_on(logout(&api));

    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn logout_without_token_skips_backend() {
    let (api, transport, _) = scripted_client();
    block_on(logout(&api));
    assert_eq!(transport.request_count(), 0);
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_without_token_makes_no_request() {
    let (api, transport, _) = scripted_client();
    assert_eq!(block_on(restore(&api)), RestoreOutcome::Anonymous);
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn restore_with_valid_token_fetches_profile_once() {
    let (api, transport, _) = scripted_client();
    api.session().set_token("tok");
    transport.respond(200, PROFILE);

    let outcome = block_on(restore(&api));

    let RestoreOutcome::Authenticated(session) = outcome else {
        panic!("expected authenticated, got {outcome:?}");
    };
    assert_eq!(session.token, "tok");
    assert_eq!(session.user.id, "u1");
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn restore_with_rejected_token_removes_it() {
    let (api, transport, storage) = scripted_client();
    api.session().set_token("stale");
    transport.respond(401, r#"{"message":"jwt expired"}"#);

    let outcome = block_on(restore(&api));

    assert!(matches!(outcome, RestoreOutcome::Expired(_)));
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn restore_accepts_document_store_profiles() {
    let profiles = [
        r#"{"_id":"u1","id":"u1","email":"a@b.com","role":"admin"}"#,
        r#"{"id":"u1","email":null,"role":"student"}"#,
        r#"{"id":"u1","email":"a@b.com","role":{"name":"lecturer"}}"#,
    ];
    for profile in profiles {
        let (api, transport, storage) = scripted_client();
        api.session().set_token("tok");
        transport.respond(200, profile);

        let outcome = block_on(restore(&api));

        let RestoreOutcome::Authenticated(session) = outcome else {
            panic!("expected authenticated for {profile}, got {outcome:?}");
        };
        assert_eq!(session.user.id, "u1");
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok"));
    }
}
