use super::*;

fn student() -> User {
    serde_json::from_value(serde_json::json!({ "id": "u1", "email": "s@example.com", "role": "student" })).unwrap()
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_no_user() {
    let state = AuthState::default();
    assert!(state.user.is_none());
    assert!(state.token.is_none());
}

#[test]
fn auth_state_default_not_loading() {
    let state = AuthState::default();
    assert!(!state.loading);
    assert_eq!(state.phase(), AuthPhase::Anonymous);
}

#[test]
fn pending_state_is_loading() {
    assert_eq!(AuthState::pending().phase(), AuthPhase::Loading);
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn restoring_then_signed_in_is_authenticated() {
    let mut state = AuthState::default();
    state.restoring("tok".to_owned());
    assert_eq!(state.phase(), AuthPhase::Loading);

    state.signed_in(Session { token: "tok".to_owned(), user: student() });
    assert_eq!(state.phase(), AuthPhase::Authenticated);
    assert!(state.is_authenticated());
    assert_eq!(state.role(), Some(Role::Student));
}

#[test]
fn signed_out_clears_everything() {
    let mut state = AuthState::default();
    state.signed_in(Session { token: "tok".to_owned(), user: student() });
    state.signed_out();
    assert_eq!(state, AuthState::default());
    assert_eq!(state.phase(), AuthPhase::Anonymous);
}

#[test]
fn user_without_token_is_not_authenticated() {
    let state = AuthState { user: Some(student()), token: None, loading: false };
    assert_eq!(state.phase(), AuthPhase::Anonymous);
}
