use super::*;
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::state::auth::AuthPhase;

fn session() -> Session {
    let user: User = serde_json::from_value(serde_json::json!({ "id": 7, "email": "l@example.com", "role": "lecturer" }))
        .unwrap();
    Session { token: "tok".to_owned(), user }
}

#[test]
fn authenticated_restore_signs_in() {
    let mut state = AuthState::pending();
    apply_restore(&mut state, RestoreOutcome::Authenticated(session()));
    assert_eq!(state.phase(), AuthPhase::Authenticated);
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("7"));
}

#[test]
fn missing_token_restore_is_anonymous_not_loading() {
    let mut state = AuthState::pending();
    apply_restore(&mut state, RestoreOutcome::Anonymous);
    assert_eq!(state, AuthState::default());
}

#[test]
fn expired_restore_clears_restoring_token() {
    let mut state = AuthState::pending();
    state.restoring("stale".to_owned());
    apply_restore(&mut state, RestoreOutcome::Expired(ApiError::from_response(401, r#"{"message":"jwt expired"}"#)));
    assert_eq!(state.phase(), AuthPhase::Anonymous);
    assert!(state.token.is_none());
}
